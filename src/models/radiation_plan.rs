use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// AI-generated radiation-therapy plan artifact. The optimization itself
/// happens at the remote endpoint; this core only records its output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiationPlan {
    pub id: Uuid,
    pub patient_id: String,
    pub beam_angles: u32,
    pub total_dose_gy: f64,
    pub fractions: u32,
    /// Fraction of tumor volume covered by the prescription dose, [0, 1].
    pub tumor_coverage: f64,
    /// Fraction of surrounding healthy tissue spared, [0, 1].
    pub healthy_tissue_spared: f64,
    pub organs_at_risk: Vec<OrganAtRisk>,
    pub optimization_method: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganAtRisk {
    pub name: String,
    pub dose_gy: f64,
    pub limit_gy: f64,
}
