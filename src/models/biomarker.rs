use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::BiomarkerTrend;

/// One lab assay measurement. Multiple rows per marker type over time —
/// a true time series, ordered by `recorded_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Biomarker {
    pub id: Uuid,
    pub patient_id: String,
    /// Lab assay name, e.g. "CEA", "CA 15-3", "PSA".
    pub marker_type: String,
    pub value: f64,
    pub unit: String,
    pub normal_low: Option<f64>,
    pub normal_high: Option<f64>,
    pub trend: BiomarkerTrend,
    pub recorded_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}
