use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AlertSeverity;

/// Monitoring alert for a patient. The one entity that is updated in
/// place: `acknowledged` flips via an atomic conditional update, all
/// other fields are immutable after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub patient_id: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub detail: Option<String>,
    pub acknowledged: bool,
    pub created_at: NaiveDateTime,
}
