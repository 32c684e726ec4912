use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Alert, AlertSeverity};

use super::{fmt_ts, parse_ts};

pub fn insert_alert(conn: &Connection, alert: &Alert) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO alerts (id, patient_id, severity, message, detail, acknowledged, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            alert.id.to_string(),
            alert.patient_id,
            alert.severity.as_str(),
            alert.message,
            alert.detail,
            alert.acknowledged as i32,
            fmt_ts(&alert.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_alerts_by_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<Alert>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, severity, message, detail, acknowledged, created_at
         FROM alerts
         WHERE patient_id = ?1
         ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], row_to_alert)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_unacknowledged_alerts(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<Alert>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, severity, message, detail, acknowledged, created_at
         FROM alerts
         WHERE patient_id = ?1 AND acknowledged = 0
         ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], row_to_alert)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Acknowledge an alert. Atomic conditional update keyed by id, the
/// only in-place mutation in the artifact store. Idempotent: re-running
/// on an acknowledged alert is a no-op.
pub fn acknowledge_alert(conn: &Connection, alert_id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE alerts SET acknowledged = 1 WHERE id = ?1",
        params![alert_id.to_string()],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "alert".into(),
            id: alert_id.to_string(),
        });
    }
    Ok(())
}

fn row_to_alert(row: &rusqlite::Row) -> Result<Alert, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let severity_str: String = row.get(2)?;
    let created_str: String = row.get(6)?;

    Ok(Alert {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: row.get(1)?,
        severity: AlertSeverity::from_str(&severity_str).unwrap_or(AlertSeverity::Info),
        message: row.get(3)?,
        detail: row.get(4)?,
        acknowledged: row.get::<_, i32>(5)? != 0,
        created_at: parse_ts(6, &created_str)?,
    })
}
