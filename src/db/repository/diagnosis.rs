use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{AlternativeDiagnosis, Diagnosis};

use super::{fmt_ts, parse_json_col, parse_ts};

/// Insert a diagnosis artifact. Diagnoses are append-only: every
/// inference run adds a row, nothing is ever overwritten.
pub fn insert_diagnosis(conn: &Connection, diag: &Diagnosis) -> Result<(), DatabaseError> {
    let alternatives_json = serde_json::to_string(&diag.alternative_diagnoses)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    conn.execute(
        "INSERT INTO diagnoses (id, patient_id, primary_diagnosis, confidence, reasoning, alternative_diagnoses_json, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            diag.id.to_string(),
            diag.patient_id,
            diag.primary_diagnosis,
            diag.confidence,
            diag.reasoning,
            alternatives_json,
            fmt_ts(&diag.created_at),
            fmt_ts(&diag.updated_at),
        ],
    )?;
    Ok(())
}

/// All diagnoses for a patient, most recent first.
pub fn get_diagnoses_by_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<Diagnosis>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, primary_diagnosis, confidence, reasoning, alternative_diagnoses_json, created_at, updated_at
         FROM diagnoses
         WHERE patient_id = ?1
         ORDER BY updated_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], row_to_diagnosis)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// The current diagnosis: max by update timestamp, rowid as tiebreak.
/// Always a read-time projection; there is no stored "latest" pointer.
pub fn get_current_diagnosis(
    conn: &Connection,
    patient_id: &str,
) -> Result<Option<Diagnosis>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, primary_diagnosis, confidence, reasoning, alternative_diagnoses_json, created_at, updated_at
         FROM diagnoses
         WHERE patient_id = ?1
         ORDER BY updated_at DESC, rowid DESC
         LIMIT 1",
    )?;
    let mut rows = stmt.query_map(params![patient_id], row_to_diagnosis)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Fetch one specific diagnosis regardless of recency.
pub fn get_diagnosis_by_id(conn: &Connection, id: &Uuid) -> Result<Diagnosis, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, primary_diagnosis, confidence, reasoning, alternative_diagnoses_json, created_at, updated_at
         FROM diagnoses WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id.to_string()], row_to_diagnosis)?;
    match rows.next() {
        Some(row) => Ok(row?),
        None => Err(DatabaseError::NotFound {
            entity_type: "diagnosis".into(),
            id: id.to_string(),
        }),
    }
}

fn row_to_diagnosis(row: &rusqlite::Row) -> Result<Diagnosis, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let alternatives_json: String = row.get(5)?;
    let created_str: String = row.get(6)?;
    let updated_str: String = row.get(7)?;

    let alternative_diagnoses: Vec<AlternativeDiagnosis> = parse_json_col(5, &alternatives_json)?;

    Ok(Diagnosis {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: row.get(1)?,
        primary_diagnosis: row.get(2)?,
        confidence: row.get(3)?,
        reasoning: row.get(4)?,
        alternative_diagnoses,
        created_at: parse_ts(6, &created_str)?,
        updated_at: parse_ts(7, &updated_str)?,
    })
}
