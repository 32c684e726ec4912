use serde::{Deserialize, Serialize};

/// Generation parameters forwarded to the endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_output_tokens: 2048,
        }
    }
}

impl GenerationConfig {
    /// Low-temperature profile for structured extraction runs, where
    /// schema adherence matters more than fluency.
    pub fn structured() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: 2048,
        }
    }

    /// Conversational profile for the assistant.
    pub fn conversational() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1024,
        }
    }
}

/// One turn of a chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub text: String,
    pub is_user: bool,
}

impl ChatTurn {
    pub fn user(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_user: true,
        }
    }

    pub fn assistant(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_user: false,
        }
    }
}

// ── Wire envelope ───────────────────────────────────────────

/// Request body for POST {endpoint}/v1/models/{model}:generateContent
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize)]
pub(crate) struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

#[derive(Serialize)]
pub(crate) struct Part {
    pub text: String,
}

impl Content {
    pub fn user(text: &str) -> Self {
        Self {
            role: "user",
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    pub fn model(text: &str) -> Self {
        Self {
            role: "model",
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

impl From<&ChatTurn> for Content {
    fn from(turn: &ChatTurn) -> Self {
        if turn.is_user {
            Content::user(&turn.text)
        } else {
            Content::model(&turn.text)
        }
    }
}

/// Response envelope. Only the first candidate's first text part is
/// consumed; everything else is ignored.
#[derive(Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
pub(crate) struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// First candidate text, if the envelope has one.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_config_serializes_camel_case() {
        let json = serde_json::to_string(&GenerationConfig::default()).unwrap();
        assert!(json.contains("\"maxOutputTokens\""));
        assert!(json.contains("\"temperature\""));
    }

    #[test]
    fn chat_turn_maps_to_role() {
        let user: Content = (&ChatTurn::user("hello")).into();
        assert_eq!(user.role, "user");
        let model: Content = (&ChatTurn::assistant("hi")).into();
        assert_eq!(model.role, "model");
    }

    #[test]
    fn first_text_from_well_formed_envelope() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Answer."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_text(), Some("Answer."));
    }

    #[test]
    fn first_text_absent_when_no_candidates() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(parsed.first_text().is_none());

        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.first_text().is_none());
    }

    #[test]
    fn first_text_absent_when_content_missing() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":null}]}"#).unwrap();
        assert!(parsed.first_text().is_none());
    }
}
