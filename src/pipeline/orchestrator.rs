//! Pipeline entry points.
//!
//! Each run is one pass through the same four stages: build the
//! prompt, call the endpoint, extract and validate the structured
//! result, persist it as an artifact. Any stage failing aborts the run
//! before the write; a failed run leaves the artifact store exactly as
//! it found it.

use rusqlite::Connection;

use crate::inference::{GenerationConfig, TextGenerate};
use crate::models::{Diagnosis, Prognosis, RadiationPlan};

use super::extract::extract_json;
use super::inputs::{
    DiagnosisSummary, OrganConstraint, PatientProfile, ScanFindings, TreatmentOption,
    TumorGeometry,
};
use super::prompt::{build_diagnosis_prompt, build_prognosis_prompt, build_radiation_plan_prompt};
use super::validate::{validate_diagnosis, validate_prognosis, validate_radiation_plan};
use super::writer::{ensure_patient, write_diagnosis, write_prognosis, write_radiation_plan};
use super::PipelineError;

/// Run the diagnosis pipeline for one patient.
pub async fn generate_diagnosis<C: TextGenerate>(
    conn: &Connection,
    client: &C,
    patient: &PatientProfile,
    scans: &[ScanFindings],
) -> Result<Diagnosis, PipelineError> {
    tracing::info!(patient_id = %patient.patient_id, scans = scans.len(), "Starting diagnosis run");
    ensure_patient(conn, &patient.patient_id)?;

    let prompt = build_diagnosis_prompt(patient, scans);
    let response = client.generate(&prompt, &GenerationConfig::structured()).await?;
    let value = extract_json(&response)?;
    let extracted = validate_diagnosis(value)?;
    let stored = write_diagnosis(conn, &patient.patient_id, extracted)?;

    tracing::info!(
        patient_id = %patient.patient_id,
        diagnosis_id = %stored.id,
        confidence = stored.confidence,
        "Diagnosis run complete"
    );
    Ok(stored)
}

/// Run the prognosis pipeline for one patient against an established
/// diagnosis and a set of candidate treatments.
pub async fn generate_prognosis<C: TextGenerate>(
    conn: &Connection,
    client: &C,
    patient: &PatientProfile,
    diagnosis: &DiagnosisSummary,
    treatment_options: &[TreatmentOption],
) -> Result<Prognosis, PipelineError> {
    tracing::info!(
        patient_id = %patient.patient_id,
        treatments = treatment_options.len(),
        "Starting prognosis run"
    );
    ensure_patient(conn, &patient.patient_id)?;

    let prompt = build_prognosis_prompt(patient, diagnosis, treatment_options);
    let response = client.generate(&prompt, &GenerationConfig::structured()).await?;
    let value = extract_json(&response)?;
    let extracted = validate_prognosis(value)?;
    let stored = write_prognosis(conn, &patient.patient_id, extracted)?;

    tracing::info!(
        patient_id = %patient.patient_id,
        prognosis_id = %stored.id,
        "Prognosis run complete"
    );
    Ok(stored)
}

/// Run the radiation-plan pipeline for one patient.
pub async fn generate_radiation_plan<C: TextGenerate>(
    conn: &Connection,
    client: &C,
    patient: &PatientProfile,
    tumor: &TumorGeometry,
    organ_constraints: &[OrganConstraint],
) -> Result<RadiationPlan, PipelineError> {
    tracing::info!(
        patient_id = %patient.patient_id,
        constraints = organ_constraints.len(),
        "Starting radiation-plan run"
    );
    ensure_patient(conn, &patient.patient_id)?;

    let prompt = build_radiation_plan_prompt(patient, tumor, organ_constraints);
    let response = client.generate(&prompt, &GenerationConfig::structured()).await?;
    let value = extract_json(&response)?;
    let extracted = validate_radiation_plan(value)?;
    let stored = write_radiation_plan(conn, &patient.patient_id, extracted)?;

    tracing::info!(
        patient_id = %patient.patient_id,
        plan_id = %stored.id,
        "Radiation-plan run complete"
    );
    Ok(stored)
}
