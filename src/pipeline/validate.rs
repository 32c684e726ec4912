//! Structural validation of extracted JSON against the requested
//! result shape.
//!
//! Validation is faithful, not forgiving: a missing required field or
//! a value outside its documented range fails with `SchemaValidation`.
//! Nothing is clamped or coerced here; if clamping is ever wanted it
//! belongs to presentation, not extraction.

use serde::Deserialize;

use super::PipelineError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDiagnosis {
    pub primary_diagnosis: String,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: Option<String>,
    pub alternative_diagnoses: Vec<ExtractedAlternative>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedAlternative {
    pub diagnosis: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPrognosis {
    pub one_year_survival: f64,
    pub three_year_survival: f64,
    pub five_year_survival: f64,
    pub treatment_scenarios: Vec<ExtractedScenario>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedScenario {
    pub name: String,
    pub description: String,
    pub survival_rate: f64,
    pub timeframe: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRadiationPlan {
    pub beam_angles: u32,
    #[serde(rename = "totalDose")]
    pub total_dose_gy: f64,
    pub fractions: u32,
    pub tumor_coverage: f64,
    pub healthy_tissue_spared: f64,
    pub organs_at_risk: Vec<ExtractedOrganAtRisk>,
    pub optimization_method: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedOrganAtRisk {
    pub name: String,
    #[serde(rename = "dose")]
    pub dose_gy: f64,
    #[serde(rename = "limit")]
    pub limit_gy: f64,
}

pub fn validate_diagnosis(value: serde_json::Value) -> Result<ExtractedDiagnosis, PipelineError> {
    let shape: ExtractedDiagnosis = deserialize_shape(value)?;
    check_unit_range("confidence", shape.confidence)?;
    for alt in &shape.alternative_diagnoses {
        check_unit_range("alternativeDiagnoses[].confidence", alt.confidence)?;
    }
    Ok(shape)
}

pub fn validate_prognosis(value: serde_json::Value) -> Result<ExtractedPrognosis, PipelineError> {
    let shape: ExtractedPrognosis = deserialize_shape(value)?;
    check_unit_range("oneYearSurvival", shape.one_year_survival)?;
    check_unit_range("threeYearSurvival", shape.three_year_survival)?;
    check_unit_range("fiveYearSurvival", shape.five_year_survival)?;
    for scenario in &shape.treatment_scenarios {
        check_unit_range("treatmentScenarios[].survivalRate", scenario.survival_rate)?;
    }
    Ok(shape)
}

pub fn validate_radiation_plan(
    value: serde_json::Value,
) -> Result<ExtractedRadiationPlan, PipelineError> {
    let shape: ExtractedRadiationPlan = deserialize_shape(value)?;
    if shape.beam_angles == 0 {
        return Err(PipelineError::SchemaValidation(
            "beamAngles must be a positive integer".into(),
        ));
    }
    if shape.fractions == 0 {
        return Err(PipelineError::SchemaValidation(
            "fractions must be a positive integer".into(),
        ));
    }
    if shape.total_dose_gy <= 0.0 {
        return Err(PipelineError::SchemaValidation(format!(
            "totalDose must be positive, got {}",
            shape.total_dose_gy
        )));
    }
    check_unit_range("tumorCoverage", shape.tumor_coverage)?;
    check_unit_range("healthyTissueSpared", shape.healthy_tissue_spared)?;
    Ok(shape)
}

fn deserialize_shape<T: for<'de> Deserialize<'de>>(
    value: serde_json::Value,
) -> Result<T, PipelineError> {
    serde_json::from_value(value).map_err(|e| PipelineError::SchemaValidation(e.to_string()))
}

fn check_unit_range(field: &str, value: f64) -> Result<(), PipelineError> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(PipelineError::SchemaValidation(format!(
            "{field} out of range [0, 1]: {value}"
        )));
    }
    Ok(())
}
