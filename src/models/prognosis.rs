use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// AI-generated survival prognosis artifact. Append-only, same
/// most-recent-wins selection as Diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prognosis {
    pub id: Uuid,
    pub patient_id: String,
    pub one_year_survival: f64,
    pub three_year_survival: f64,
    pub five_year_survival: f64,
    pub treatment_scenarios: Vec<TreatmentScenario>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentScenario {
    pub name: String,
    pub description: String,
    /// Projected survival rate under this scenario, in [0, 1].
    pub survival_rate: f64,
    /// Human-readable horizon, e.g. "5-year".
    pub timeframe: String,
}
