//! Persistence of validated inference results as artifacts.
//!
//! The writer is the only pipeline stage that touches the database.
//! It assigns identity and timestamps, inserts the new row, and hands
//! back exactly what was stored. Appends only; prior artifacts for the
//! same patient are untouched.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository;
use crate::models::{
    AlternativeDiagnosis, Diagnosis, OrganAtRisk, Prognosis, RadiationPlan, TreatmentScenario,
};

use super::validate::{ExtractedDiagnosis, ExtractedPrognosis, ExtractedRadiationPlan};
use super::PipelineError;

/// Reject runs against patient identifiers the store has never seen.
pub fn ensure_patient(conn: &Connection, patient_id: &str) -> Result<(), PipelineError> {
    if repository::patient_exists(conn, patient_id)? {
        Ok(())
    } else {
        Err(PipelineError::UnknownPatient(patient_id.to_string()))
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn write_diagnosis(
    conn: &Connection,
    patient_id: &str,
    extracted: ExtractedDiagnosis,
) -> Result<Diagnosis, PipelineError> {
    let ts = now();
    let diagnosis = Diagnosis {
        id: Uuid::new_v4(),
        patient_id: patient_id.to_string(),
        primary_diagnosis: extracted.primary_diagnosis,
        confidence: extracted.confidence,
        reasoning: extracted.reasoning,
        alternative_diagnoses: extracted
            .alternative_diagnoses
            .into_iter()
            .map(|alt| AlternativeDiagnosis {
                diagnosis: alt.diagnosis,
                confidence: alt.confidence,
            })
            .collect(),
        created_at: ts,
        updated_at: ts,
    };
    repository::insert_diagnosis(conn, &diagnosis)?;
    Ok(diagnosis)
}

pub fn write_prognosis(
    conn: &Connection,
    patient_id: &str,
    extracted: ExtractedPrognosis,
) -> Result<Prognosis, PipelineError> {
    let ts = now();
    let prognosis = Prognosis {
        id: Uuid::new_v4(),
        patient_id: patient_id.to_string(),
        one_year_survival: extracted.one_year_survival,
        three_year_survival: extracted.three_year_survival,
        five_year_survival: extracted.five_year_survival,
        treatment_scenarios: extracted
            .treatment_scenarios
            .into_iter()
            .map(|s| TreatmentScenario {
                name: s.name,
                description: s.description,
                survival_rate: s.survival_rate,
                timeframe: s.timeframe,
            })
            .collect(),
        created_at: ts,
        updated_at: ts,
    };
    repository::insert_prognosis(conn, &prognosis)?;
    Ok(prognosis)
}

pub fn write_radiation_plan(
    conn: &Connection,
    patient_id: &str,
    extracted: ExtractedRadiationPlan,
) -> Result<RadiationPlan, PipelineError> {
    let ts = now();
    let plan = RadiationPlan {
        id: Uuid::new_v4(),
        patient_id: patient_id.to_string(),
        beam_angles: extracted.beam_angles,
        total_dose_gy: extracted.total_dose_gy,
        fractions: extracted.fractions,
        tumor_coverage: extracted.tumor_coverage,
        healthy_tissue_spared: extracted.healthy_tissue_spared,
        organs_at_risk: extracted
            .organs_at_risk
            .into_iter()
            .map(|organ| OrganAtRisk {
                name: organ.name,
                dose_gy: organ.dose_gy,
                limit_gy: organ.limit_gy,
            })
            .collect(),
        optimization_method: extracted.optimization_method,
        created_at: ts,
        updated_at: ts,
    };
    repository::insert_radiation_plan(conn, &plan)?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{get_current_diagnosis, insert_patient};
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Patient, PatientStatus};
    use crate::pipeline::validate::ExtractedAlternative;

    fn seed_patient(conn: &Connection, patient_id: &str) {
        let ts = chrono::Local::now().naive_local();
        insert_patient(
            conn,
            &Patient {
                patient_id: patient_id.to_string(),
                name: "Jordan Hale".to_string(),
                age: 58,
                gender: "female".to_string(),
                cancer_type: "non-small cell lung cancer".to_string(),
                stage: "IIIA".to_string(),
                status: PatientStatus::Active,
                treatment_history: None,
                created_at: ts,
                updated_at: ts,
            },
        )
        .unwrap();
    }

    fn sample_extracted() -> ExtractedDiagnosis {
        ExtractedDiagnosis {
            primary_diagnosis: "Adenocarcinoma".to_string(),
            confidence: 0.87,
            reasoning: Some("Spiculated mass".to_string()),
            alternative_diagnoses: vec![ExtractedAlternative {
                diagnosis: "Granuloma".to_string(),
                confidence: 0.08,
            }],
        }
    }

    #[test]
    fn unknown_patient_is_rejected_before_any_write() {
        let conn = open_memory_database().unwrap();
        let result = ensure_patient(&conn, "PT-0404");
        match result {
            Err(PipelineError::UnknownPatient(id)) => assert_eq!(id, "PT-0404"),
            other => panic!("Expected UnknownPatient, got {other:?}"),
        }
    }

    #[test]
    fn written_diagnosis_is_immediately_readable() {
        let conn = open_memory_database().unwrap();
        seed_patient(&conn, "PT-0001");

        let stored = write_diagnosis(&conn, "PT-0001", sample_extracted()).unwrap();
        assert_eq!(stored.patient_id, "PT-0001");

        let current = get_current_diagnosis(&conn, "PT-0001").unwrap().unwrap();
        assert_eq!(current.id, stored.id);
        assert_eq!(current.primary_diagnosis, "Adenocarcinoma");
        assert_eq!(current.alternative_diagnoses.len(), 1);
    }

    #[test]
    fn writes_append_rather_than_replace() {
        let conn = open_memory_database().unwrap();
        seed_patient(&conn, "PT-0001");

        let first = write_diagnosis(&conn, "PT-0001", sample_extracted()).unwrap();
        let second = write_diagnosis(&conn, "PT-0001", sample_extracted()).unwrap();
        assert_ne!(first.id, second.id);

        let all = crate::db::repository::get_diagnoses_by_patient(&conn, "PT-0001").unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn written_plan_round_trips_organs() {
        let conn = open_memory_database().unwrap();
        seed_patient(&conn, "PT-0001");

        let extracted = ExtractedRadiationPlan {
            beam_angles: 9,
            total_dose_gy: 60.0,
            fractions: 30,
            tumor_coverage: 0.97,
            healthy_tissue_spared: 0.88,
            organs_at_risk: vec![crate::pipeline::validate::ExtractedOrganAtRisk {
                name: "spinal cord".to_string(),
                dose_gy: 41.2,
                limit_gy: 45.0,
            }],
            optimization_method: "simulated-annealing beam selection".to_string(),
        };

        let stored = write_radiation_plan(&conn, "PT-0001", extracted).unwrap();
        let fetched = crate::db::repository::get_radiation_plan_by_id(&conn, &stored.id).unwrap();
        assert_eq!(fetched.organs_at_risk.len(), 1);
        assert_eq!(fetched.organs_at_risk[0].name, "spinal cord");
        assert!((fetched.organs_at_risk[0].limit_gy - 45.0).abs() < f64::EPSILON);
    }
}
