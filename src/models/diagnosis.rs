use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// AI-generated diagnosis artifact. Append-only: a new inference run
/// inserts a new row; the "current" diagnosis is the most recent by
/// `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: Uuid,
    pub patient_id: String,
    pub primary_diagnosis: String,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    pub reasoning: Option<String>,
    pub alternative_diagnoses: Vec<AlternativeDiagnosis>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeDiagnosis {
    pub diagnosis: String,
    pub confidence: f64,
}
