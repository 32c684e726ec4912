use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ScanModality;

/// One imaging study for a patient. Scans form a time series ordered
/// by `uploaded_at`; rows are never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    pub id: Uuid,
    pub patient_id: String,
    pub modality: ScanModality,
    pub storage_url: String,
    pub tumor_detected: bool,
    /// Structured geometry blob as produced by the imaging pipeline
    /// (location, extent). Opaque to this core.
    pub tumor_location: Option<serde_json::Value>,
    pub tumor_size_cm: Option<f64>,
    pub malignancy_score: Option<f64>,
    pub growth_rate: Option<f64>,
    pub uploaded_at: NaiveDateTime,
}
