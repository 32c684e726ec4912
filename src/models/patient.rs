use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::PatientStatus;

/// Canonical patient record. `patient_id` is the stable external
/// identifier every artifact references; it never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub cancer_type: String,
    pub stage: String,
    pub status: PatientStatus,
    pub treatment_history: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
