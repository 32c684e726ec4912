use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{OrganAtRisk, RadiationPlan};

use super::{fmt_ts, parse_json_col, parse_ts};

pub fn insert_radiation_plan(conn: &Connection, plan: &RadiationPlan) -> Result<(), DatabaseError> {
    let organs_json = serde_json::to_string(&plan.organs_at_risk)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    conn.execute(
        "INSERT INTO radiation_plans (id, patient_id, beam_angles, total_dose_gy, fractions, tumor_coverage, healthy_tissue_spared, organs_at_risk_json, optimization_method, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            plan.id.to_string(),
            plan.patient_id,
            plan.beam_angles,
            plan.total_dose_gy,
            plan.fractions,
            plan.tumor_coverage,
            plan.healthy_tissue_spared,
            organs_json,
            plan.optimization_method,
            fmt_ts(&plan.created_at),
            fmt_ts(&plan.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_radiation_plans_by_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<RadiationPlan>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, beam_angles, total_dose_gy, fractions, tumor_coverage, healthy_tissue_spared, organs_at_risk_json, optimization_method, created_at, updated_at
         FROM radiation_plans
         WHERE patient_id = ?1
         ORDER BY updated_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], row_to_plan)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_current_radiation_plan(
    conn: &Connection,
    patient_id: &str,
) -> Result<Option<RadiationPlan>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, beam_angles, total_dose_gy, fractions, tumor_coverage, healthy_tissue_spared, organs_at_risk_json, optimization_method, created_at, updated_at
         FROM radiation_plans
         WHERE patient_id = ?1
         ORDER BY updated_at DESC, rowid DESC
         LIMIT 1",
    )?;
    let mut rows = stmt.query_map(params![patient_id], row_to_plan)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn get_radiation_plan_by_id(
    conn: &Connection,
    id: &Uuid,
) -> Result<RadiationPlan, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, beam_angles, total_dose_gy, fractions, tumor_coverage, healthy_tissue_spared, organs_at_risk_json, optimization_method, created_at, updated_at
         FROM radiation_plans WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id.to_string()], row_to_plan)?;
    match rows.next() {
        Some(row) => Ok(row?),
        None => Err(DatabaseError::NotFound {
            entity_type: "radiation_plan".into(),
            id: id.to_string(),
        }),
    }
}

fn row_to_plan(row: &rusqlite::Row) -> Result<RadiationPlan, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let organs_json: String = row.get(7)?;
    let created_str: String = row.get(9)?;
    let updated_str: String = row.get(10)?;

    let organs_at_risk: Vec<OrganAtRisk> = parse_json_col(7, &organs_json)?;

    Ok(RadiationPlan {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: row.get(1)?,
        beam_angles: row.get::<_, i64>(2)? as u32,
        total_dose_gy: row.get(3)?,
        fractions: row.get::<_, i64>(4)? as u32,
        tumor_coverage: row.get(5)?,
        healthy_tissue_spared: row.get(6)?,
        organs_at_risk,
        optimization_method: row.get(8)?,
        created_at: parse_ts(9, &created_str)?,
        updated_at: parse_ts(10, &updated_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_patient;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Patient, PatientStatus};

    fn seed_patient(conn: &Connection, patient_id: &str) {
        let now = chrono::Local::now().naive_local();
        insert_patient(
            conn,
            &Patient {
                patient_id: patient_id.to_string(),
                name: "Ana Reyes".to_string(),
                age: 47,
                gender: "female".to_string(),
                cancer_type: "glioblastoma".to_string(),
                stage: "IV".to_string(),
                status: PatientStatus::Critical,
                treatment_history: None,
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap();
    }

    fn make_plan(patient_id: &str) -> RadiationPlan {
        let ts = chrono::Local::now().naive_local();
        RadiationPlan {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            beam_angles: 9,
            total_dose_gy: 60.0,
            fractions: 30,
            tumor_coverage: 0.97,
            healthy_tissue_spared: 0.88,
            organs_at_risk: vec![
                OrganAtRisk {
                    name: "brainstem".to_string(),
                    dose_gy: 42.1,
                    limit_gy: 54.0,
                },
                OrganAtRisk {
                    name: "optic chiasm".to_string(),
                    dose_gy: 38.7,
                    limit_gy: 54.0,
                },
            ],
            optimization_method: "quantum-annealing beam selection".to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn insert_and_read_back_organs() {
        let conn = open_memory_database().unwrap();
        seed_patient(&conn, "PT-0003");
        insert_radiation_plan(&conn, &make_plan("PT-0003")).unwrap();

        let plan = get_current_radiation_plan(&conn, "PT-0003").unwrap().unwrap();
        assert_eq!(plan.beam_angles, 9);
        assert_eq!(plan.fractions, 30);
        assert_eq!(plan.organs_at_risk.len(), 2);
        assert_eq!(plan.organs_at_risk[0].name, "brainstem");
        assert!((plan.organs_at_risk[0].limit_gy - 54.0).abs() < f64::EPSILON);
    }

    #[test]
    fn plans_accumulate_append_only() {
        let conn = open_memory_database().unwrap();
        seed_patient(&conn, "PT-0003");

        let first = make_plan("PT-0003");
        insert_radiation_plan(&conn, &first).unwrap();
        insert_radiation_plan(&conn, &make_plan("PT-0003")).unwrap();

        let all = get_radiation_plans_by_patient(&conn, "PT-0003").unwrap();
        assert_eq!(all.len(), 2);

        // The first plan is still retrievable by id, untouched.
        let fetched = get_radiation_plan_by_id(&conn, &first.id).unwrap();
        assert_eq!(fetched.id, first.id);
    }

    #[test]
    fn current_is_none_without_plans() {
        let conn = open_memory_database().unwrap();
        seed_patient(&conn, "PT-0003");
        assert!(get_current_radiation_plan(&conn, "PT-0003").unwrap().is_none());
    }
}
