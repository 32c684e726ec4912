use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Prognosis, TreatmentScenario};

use super::{fmt_ts, parse_json_col, parse_ts};

pub fn insert_prognosis(conn: &Connection, prog: &Prognosis) -> Result<(), DatabaseError> {
    let scenarios_json = serde_json::to_string(&prog.treatment_scenarios)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    conn.execute(
        "INSERT INTO prognoses (id, patient_id, one_year_survival, three_year_survival, five_year_survival, treatment_scenarios_json, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            prog.id.to_string(),
            prog.patient_id,
            prog.one_year_survival,
            prog.three_year_survival,
            prog.five_year_survival,
            scenarios_json,
            fmt_ts(&prog.created_at),
            fmt_ts(&prog.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_prognoses_by_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<Prognosis>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, one_year_survival, three_year_survival, five_year_survival, treatment_scenarios_json, created_at, updated_at
         FROM prognoses
         WHERE patient_id = ?1
         ORDER BY updated_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], row_to_prognosis)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_current_prognosis(
    conn: &Connection,
    patient_id: &str,
) -> Result<Option<Prognosis>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, one_year_survival, three_year_survival, five_year_survival, treatment_scenarios_json, created_at, updated_at
         FROM prognoses
         WHERE patient_id = ?1
         ORDER BY updated_at DESC, rowid DESC
         LIMIT 1",
    )?;
    let mut rows = stmt.query_map(params![patient_id], row_to_prognosis)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn get_prognosis_by_id(conn: &Connection, id: &Uuid) -> Result<Prognosis, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, one_year_survival, three_year_survival, five_year_survival, treatment_scenarios_json, created_at, updated_at
         FROM prognoses WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id.to_string()], row_to_prognosis)?;
    match rows.next() {
        Some(row) => Ok(row?),
        None => Err(DatabaseError::NotFound {
            entity_type: "prognosis".into(),
            id: id.to_string(),
        }),
    }
}

fn row_to_prognosis(row: &rusqlite::Row) -> Result<Prognosis, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let scenarios_json: String = row.get(5)?;
    let created_str: String = row.get(6)?;
    let updated_str: String = row.get(7)?;

    let treatment_scenarios: Vec<TreatmentScenario> = parse_json_col(5, &scenarios_json)?;

    Ok(Prognosis {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: row.get(1)?,
        one_year_survival: row.get(2)?,
        three_year_survival: row.get(3)?,
        five_year_survival: row.get(4)?,
        treatment_scenarios,
        created_at: parse_ts(6, &created_str)?,
        updated_at: parse_ts(7, &updated_str)?,
    })
}
