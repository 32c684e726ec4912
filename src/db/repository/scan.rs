use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Scan, ScanModality};

use super::{fmt_ts, parse_json_col, parse_ts};

pub fn insert_scan(conn: &Connection, scan: &Scan) -> Result<(), DatabaseError> {
    let location_json = scan
        .tumor_location
        .as_ref()
        .map(|v| v.to_string());

    conn.execute(
        "INSERT INTO scans (id, patient_id, modality, storage_url, tumor_detected, tumor_location_json, tumor_size_cm, malignancy_score, growth_rate, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            scan.id.to_string(),
            scan.patient_id,
            scan.modality.as_str(),
            scan.storage_url,
            scan.tumor_detected as i32,
            location_json,
            scan.tumor_size_cm,
            scan.malignancy_score,
            scan.growth_rate,
            fmt_ts(&scan.uploaded_at),
        ],
    )?;
    Ok(())
}

/// All scans for a patient in chronological upload order.
pub fn get_scans_by_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<Scan>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, modality, storage_url, tumor_detected, tumor_location_json, tumor_size_cm, malignancy_score, growth_rate, uploaded_at
         FROM scans
         WHERE patient_id = ?1
         ORDER BY uploaded_at ASC",
    )?;
    let rows = stmt.query_map(params![patient_id], row_to_scan)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_latest_scan(
    conn: &Connection,
    patient_id: &str,
) -> Result<Option<Scan>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, modality, storage_url, tumor_detected, tumor_location_json, tumor_size_cm, malignancy_score, growth_rate, uploaded_at
         FROM scans
         WHERE patient_id = ?1
         ORDER BY uploaded_at DESC, rowid DESC
         LIMIT 1",
    )?;
    let mut rows = stmt.query_map(params![patient_id], row_to_scan)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

fn row_to_scan(row: &rusqlite::Row) -> Result<Scan, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let modality_str: String = row.get(2)?;
    let location_json: Option<String> = row.get(5)?;
    let uploaded_str: String = row.get(9)?;

    Ok(Scan {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: row.get(1)?,
        modality: ScanModality::from_str(&modality_str).unwrap_or(ScanModality::Other),
        storage_url: row.get(3)?,
        tumor_detected: row.get::<_, i32>(4)? != 0,
        tumor_location: location_json.map(|s| parse_json_col(5, &s)).transpose()?,
        tumor_size_cm: row.get(6)?,
        malignancy_score: row.get(7)?,
        growth_rate: row.get(8)?,
        uploaded_at: parse_ts(9, &uploaded_str)?,
    })
}
