use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Biomarker, BiomarkerTrend};

use super::{fmt_ts, parse_ts};

pub fn insert_biomarker(conn: &Connection, marker: &Biomarker) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO biomarkers (id, patient_id, marker_type, value, unit, normal_low, normal_high, trend, recorded_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            marker.id.to_string(),
            marker.patient_id,
            marker.marker_type,
            marker.value,
            marker.unit,
            marker.normal_low,
            marker.normal_high,
            marker.trend.as_str(),
            fmt_ts(&marker.recorded_at),
            fmt_ts(&marker.created_at),
        ],
    )?;
    Ok(())
}

/// Time series for one assay, chronological.
pub fn get_biomarkers_by_type(
    conn: &Connection,
    patient_id: &str,
    marker_type: &str,
) -> Result<Vec<Biomarker>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, marker_type, value, unit, normal_low, normal_high, trend, recorded_at, created_at
         FROM biomarkers
         WHERE patient_id = ?1 AND marker_type = ?2
         ORDER BY recorded_at ASC",
    )?;
    let rows = stmt.query_map(params![patient_id, marker_type], row_to_biomarker)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_latest_biomarker(
    conn: &Connection,
    patient_id: &str,
    marker_type: &str,
) -> Result<Option<Biomarker>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, marker_type, value, unit, normal_low, normal_high, trend, recorded_at, created_at
         FROM biomarkers
         WHERE patient_id = ?1 AND marker_type = ?2
         ORDER BY recorded_at DESC, rowid DESC
         LIMIT 1",
    )?;
    let mut rows = stmt.query_map(params![patient_id, marker_type], row_to_biomarker)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

fn row_to_biomarker(row: &rusqlite::Row) -> Result<Biomarker, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let trend_str: String = row.get(7)?;
    let recorded_str: String = row.get(8)?;
    let created_str: String = row.get(9)?;

    Ok(Biomarker {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: row.get(1)?,
        marker_type: row.get(2)?,
        value: row.get(3)?,
        unit: row.get(4)?,
        normal_low: row.get(5)?,
        normal_high: row.get(6)?,
        trend: BiomarkerTrend::from_str(&trend_str).unwrap_or(BiomarkerTrend::Stable),
        recorded_at: parse_ts(8, &recorded_str)?,
        created_at: parse_ts(9, &created_str)?,
    })
}
