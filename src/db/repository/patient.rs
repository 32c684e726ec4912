use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{Patient, PatientStatus};

use super::{fmt_ts, parse_ts};

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (patient_id, name, age, gender, cancer_type, stage, status, treatment_history, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            patient.patient_id,
            patient.name,
            patient.age,
            patient.gender,
            patient.cancer_type,
            patient.stage,
            patient.status.as_str(),
            patient.treatment_history,
            fmt_ts(&patient.created_at),
            fmt_ts(&patient.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, patient_id: &str) -> Result<Patient, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT patient_id, name, age, gender, cancer_type, stage, status, treatment_history, created_at, updated_at
         FROM patients WHERE patient_id = ?1",
    )?;
    let mut rows = stmt.query_map(params![patient_id], row_to_patient)?;
    match rows.next() {
        Some(row) => Ok(row?),
        None => Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: patient_id.into(),
        }),
    }
}

pub fn patient_exists(conn: &Connection, patient_id: &str) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM patients WHERE patient_id = ?1",
        params![patient_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Update a patient's mutable attributes. The identifier and creation
/// timestamp never change; status transitions are unconstrained.
pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE patients SET name = ?1, age = ?2, gender = ?3, cancer_type = ?4,
         stage = ?5, status = ?6, treatment_history = ?7, updated_at = ?8
         WHERE patient_id = ?9",
        params![
            patient.name,
            patient.age,
            patient.gender,
            patient.cancer_type,
            patient.stage,
            patient.status.as_str(),
            patient.treatment_history,
            fmt_ts(&patient.updated_at),
            patient.patient_id,
        ],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: patient.patient_id.clone(),
        });
    }
    Ok(())
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT patient_id, name, age, gender, cancer_type, stage, status, treatment_history, created_at, updated_at
         FROM patients ORDER BY created_at",
    )?;
    let rows = stmt.query_map([], row_to_patient)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn row_to_patient(row: &rusqlite::Row) -> Result<Patient, rusqlite::Error> {
    let status_str: String = row.get(6)?;
    let created_str: String = row.get(8)?;
    let updated_str: String = row.get(9)?;

    Ok(Patient {
        patient_id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        cancer_type: row.get(4)?,
        stage: row.get(5)?,
        status: PatientStatus::from_str(&status_str).unwrap_or(PatientStatus::Active),
        treatment_history: row.get(7)?,
        created_at: parse_ts(8, &created_str)?,
        updated_at: parse_ts(9, &updated_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn make_patient(patient_id: &str) -> Patient {
        let now = chrono::Local::now().naive_local();
        Patient {
            patient_id: patient_id.to_string(),
            name: "Jordan Hale".to_string(),
            age: 58,
            gender: "female".to_string(),
            cancer_type: "non-small cell lung cancer".to_string(),
            stage: "IIIA".to_string(),
            status: PatientStatus::Active,
            treatment_history: Some("Cisplatin + etoposide, 2 cycles".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_and_get_patient() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &make_patient("PT-0001")).unwrap();

        let p = get_patient(&conn, "PT-0001").unwrap();
        assert_eq!(p.name, "Jordan Hale");
        assert_eq!(p.stage, "IIIA");
        assert_eq!(p.status, PatientStatus::Active);
    }

    #[test]
    fn get_missing_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        let result = get_patient(&conn, "PT-9999");
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn duplicate_identifier_rejected() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &make_patient("PT-0001")).unwrap();
        let result = insert_patient(&conn, &make_patient("PT-0001"));
        assert!(result.is_err());
    }

    #[test]
    fn exists_reflects_store() {
        let conn = open_memory_database().unwrap();
        assert!(!patient_exists(&conn, "PT-0001").unwrap());
        insert_patient(&conn, &make_patient("PT-0001")).unwrap();
        assert!(patient_exists(&conn, "PT-0001").unwrap());
    }

    #[test]
    fn update_changes_status_not_identifier() {
        let conn = open_memory_database().unwrap();
        let mut p = make_patient("PT-0001");
        insert_patient(&conn, &p).unwrap();

        p.status = PatientStatus::Remission;
        p.stage = "IIB".to_string();
        p.updated_at = chrono::Local::now().naive_local();
        update_patient(&conn, &p).unwrap();

        let stored = get_patient(&conn, "PT-0001").unwrap();
        assert_eq!(stored.status, PatientStatus::Remission);
        assert_eq!(stored.stage, "IIB");
        assert_eq!(stored.patient_id, "PT-0001");
    }

    #[test]
    fn update_missing_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        let result = update_patient(&conn, &make_patient("PT-0404"));
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn corrupt_timestamp_column_fails_the_read() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO patients (patient_id, name, age, gender, cancer_type, stage, status, treatment_history, created_at, updated_at)
             VALUES ('PT-0001', 'Jordan Hale', 58, 'female', 'nsclc', 'IIIA', 'active', NULL, 'garbage', 'garbage')",
            [],
        )
        .unwrap();

        // A row with an unparseable timestamp errors rather than
        // reading back as the epoch.
        let result = get_patient(&conn, "PT-0001");
        assert!(matches!(result, Err(DatabaseError::Sqlite(_))));
    }

    #[test]
    fn list_returns_all() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &make_patient("PT-0001")).unwrap();
        insert_patient(&conn, &make_patient("PT-0002")).unwrap();
        assert_eq!(list_patients(&conn).unwrap().len(), 2);
    }
}
