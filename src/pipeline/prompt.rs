//! Prompt construction for the three structured inference tasks.
//!
//! Each builder is pure formatting: it states the task, embeds the
//! typed inputs as JSON, and spells out the exact output shape with
//! field names and value ranges. Identical inputs always produce an
//! identical prompt.

use super::inputs::{
    DiagnosisSummary, OrganConstraint, PatientProfile, ScanFindings, TreatmentOption,
    TumorGeometry,
};

const OUTPUT_RULES: &str = "\
Respond with ONLY a single JSON object inside a ```json fenced block. \
No prose before or after. Every probability and confidence value is a \
float between 0 and 1 inclusive.";

fn to_json<T: serde::Serialize>(value: &T) -> String {
    // Inputs are plain structs with fixed field order; serialization
    // cannot fail and is deterministic.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Build the diagnosis prompt from patient attributes and scan findings.
pub fn build_diagnosis_prompt(patient: &PatientProfile, scans: &[ScanFindings]) -> String {
    format!(
        r#"You are an oncology decision-support model. Based on the patient
record and imaging findings below, produce the most likely primary
diagnosis with a calibrated confidence and ranked alternatives.

PATIENT:
{patient}

IMAGING FINDINGS (chronological):
{scans}

{rules}

Expected output shape:
```json
{{
  "primaryDiagnosis": "diagnosis label",
  "confidence": 0.0,
  "reasoning": "short clinical rationale",
  "alternativeDiagnoses": [
    {{"diagnosis": "label", "confidence": 0.0}}
  ]
}}
```"#,
        patient = to_json(patient),
        scans = to_json(&scans),
        rules = OUTPUT_RULES,
    )
}

/// Build the prognosis prompt from the patient, their established
/// diagnosis, and the treatments to score.
pub fn build_prognosis_prompt(
    patient: &PatientProfile,
    diagnosis: &DiagnosisSummary,
    treatment_options: &[TreatmentOption],
) -> String {
    format!(
        r#"You are an oncology decision-support model. Estimate survival
probabilities for the patient below and project outcomes for each
candidate treatment scenario.

PATIENT:
{patient}

ESTABLISHED DIAGNOSIS:
{diagnosis}

CANDIDATE TREATMENTS:
{treatments}

{rules}

Expected output shape:
```json
{{
  "oneYearSurvival": 0.0,
  "threeYearSurvival": 0.0,
  "fiveYearSurvival": 0.0,
  "treatmentScenarios": [
    {{
      "name": "scenario name",
      "description": "what the regimen involves",
      "survivalRate": 0.0,
      "timeframe": "e.g. 5-year"
    }}
  ]
}}
```"#,
        patient = to_json(patient),
        diagnosis = to_json(diagnosis),
        treatments = to_json(&treatment_options),
        rules = OUTPUT_RULES,
    )
}

/// Build the radiation-plan prompt from tumor geometry and organ
/// dose constraints.
pub fn build_radiation_plan_prompt(
    patient: &PatientProfile,
    tumor: &TumorGeometry,
    organ_constraints: &[OrganConstraint],
) -> String {
    format!(
        r#"You are a radiation-therapy planning model. Propose a beam
arrangement and fractionation for the tumor below that maximizes tumor
coverage while respecting every organ-at-risk dose limit.

PATIENT:
{patient}

TUMOR:
{tumor}

ORGAN DOSE CONSTRAINTS:
{constraints}

{rules}
"beamAngles" and "fractions" are positive integers; doses are in Gy.

Expected output shape:
```json
{{
  "beamAngles": 0,
  "totalDose": 0.0,
  "fractions": 0,
  "tumorCoverage": 0.0,
  "healthyTissueSpared": 0.0,
  "organsAtRisk": [
    {{"name": "organ", "dose": 0.0, "limit": 0.0}}
  ],
  "optimizationMethod": "method label"
}}
```"#,
        patient = to_json(patient),
        tumor = to_json(tumor),
        constraints = to_json(&organ_constraints),
        rules = OUTPUT_RULES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_patient() -> PatientProfile {
        PatientProfile {
            patient_id: "PT-0001".to_string(),
            age: 58,
            gender: "female".to_string(),
            cancer_type: "non-small cell lung cancer".to_string(),
            stage: "IIIA".to_string(),
            treatment_history: None,
        }
    }

    fn sample_scan() -> ScanFindings {
        ScanFindings {
            modality: "ct".to_string(),
            tumor_detected: true,
            tumor_location: Some(serde_json::json!({"lobe": "right upper"})),
            tumor_size_cm: Some(3.4),
            malignancy_score: Some(0.82),
            growth_rate: None,
        }
    }

    #[test]
    fn diagnosis_prompt_embeds_inputs_and_schema() {
        let prompt = build_diagnosis_prompt(&sample_patient(), &[sample_scan()]);
        assert!(prompt.contains("\"cancerType\": \"non-small cell lung cancer\""));
        assert!(prompt.contains("\"malignancyScore\": 0.82"));
        assert!(prompt.contains("\"primaryDiagnosis\""));
        assert!(prompt.contains("\"alternativeDiagnoses\""));
        assert!(prompt.contains("between 0 and 1"));
    }

    #[test]
    fn diagnosis_prompt_is_deterministic() {
        let a = build_diagnosis_prompt(&sample_patient(), &[sample_scan()]);
        let b = build_diagnosis_prompt(&sample_patient(), &[sample_scan()]);
        assert_eq!(a, b);
    }

    #[test]
    fn prognosis_prompt_lists_treatments() {
        let options = vec![
            TreatmentOption {
                name: "Chemoradiation".to_string(),
                description: "Concurrent platinum doublet with radiation".to_string(),
            },
            TreatmentOption {
                name: "Surgery".to_string(),
                description: "Lobectomy with adjuvant chemotherapy".to_string(),
            },
        ];
        let diagnosis = DiagnosisSummary {
            primary_diagnosis: "Adenocarcinoma".to_string(),
            confidence: 0.87,
            reasoning: None,
        };

        let prompt = build_prognosis_prompt(&sample_patient(), &diagnosis, &options);
        assert!(prompt.contains("Chemoradiation"));
        assert!(prompt.contains("Lobectomy"));
        assert!(prompt.contains("\"oneYearSurvival\""));
        assert!(prompt.contains("\"treatmentScenarios\""));
    }

    #[test]
    fn radiation_prompt_carries_constraints() {
        let tumor = TumorGeometry {
            site: "right upper lobe".to_string(),
            size_cm: 3.4,
            location: None,
        };
        let constraints = vec![OrganConstraint {
            organ: "spinal cord".to_string(),
            max_dose_gy: 45.0,
        }];

        let prompt = build_radiation_plan_prompt(&sample_patient(), &tumor, &constraints);
        assert!(prompt.contains("spinal cord"));
        assert!(prompt.contains("\"maxDoseGy\": 45.0"));
        assert!(prompt.contains("\"beamAngles\""));
        assert!(prompt.contains("\"organsAtRisk\""));
        assert!(prompt.contains("\"optimizationMethod\""));
    }
}
