//! Typed inputs for the pipeline entry points.
//!
//! Everything the Prompt Builder embeds into a prompt crosses this
//! boundary as an explicit struct, not a loosely-typed JSON blob. The
//! structs serialize to camelCase so the model sees the same field
//! style it is asked to produce.

use serde::Serialize;

use crate::models::{Diagnosis, Patient, Scan};

/// Patient attributes relevant to clinical reasoning.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub patient_id: String,
    pub age: u32,
    pub gender: String,
    pub cancer_type: String,
    pub stage: String,
    pub treatment_history: Option<String>,
}

impl From<&Patient> for PatientProfile {
    fn from(p: &Patient) -> Self {
        Self {
            patient_id: p.patient_id.clone(),
            age: p.age,
            gender: p.gender.clone(),
            cancer_type: p.cancer_type.clone(),
            stage: p.stage.clone(),
            treatment_history: p.treatment_history.clone(),
        }
    }
}

/// Findings from one imaging study, as fed to the diagnosis prompt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFindings {
    pub modality: String,
    pub tumor_detected: bool,
    pub tumor_location: Option<serde_json::Value>,
    pub tumor_size_cm: Option<f64>,
    pub malignancy_score: Option<f64>,
    pub growth_rate: Option<f64>,
}

impl From<&Scan> for ScanFindings {
    fn from(s: &Scan) -> Self {
        Self {
            modality: s.modality.as_str().to_string(),
            tumor_detected: s.tumor_detected,
            tumor_location: s.tumor_location.clone(),
            tumor_size_cm: s.tumor_size_cm,
            malignancy_score: s.malignancy_score,
            growth_rate: s.growth_rate,
        }
    }
}

/// Established diagnosis carried into the prognosis prompt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisSummary {
    pub primary_diagnosis: String,
    pub confidence: f64,
    pub reasoning: Option<String>,
}

impl From<&Diagnosis> for DiagnosisSummary {
    fn from(d: &Diagnosis) -> Self {
        Self {
            primary_diagnosis: d.primary_diagnosis.clone(),
            confidence: d.confidence,
            reasoning: d.reasoning.clone(),
        }
    }
}

/// A treatment the oncologist wants scored in the prognosis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentOption {
    pub name: String,
    pub description: String,
}

/// Tumor geometry for radiation-plan optimization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TumorGeometry {
    pub site: String,
    pub size_cm: f64,
    pub location: Option<serde_json::Value>,
}

/// Dose ceiling for one organ at risk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganConstraint {
    pub organ: String,
    pub max_dose_gy: f64,
}
