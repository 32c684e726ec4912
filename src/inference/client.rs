use crate::config::InferenceConfig;

use super::types::{ChatTurn, Content, GenerateRequest, GenerateResponse, GenerationConfig};
use super::InferenceError;

/// Contract for the text-generation endpoint. The pipeline and the
/// conversational assistant both depend on this seam, which keeps them
/// testable without a live endpoint.
#[allow(async_fn_in_trait)]
pub trait TextGenerate {
    /// Single-prompt generation. Returns the raw response text.
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, InferenceError>;

    /// Conversational generation: the full transcript is forwarded as
    /// context in the endpoint's native turn format.
    async fn chat(
        &self,
        transcript: &[ChatTurn],
        config: &GenerationConfig,
    ) -> Result<String, InferenceError>;
}

/// HTTPS client for the remote generative endpoint.
///
/// One JSON call per pipeline run or chat turn, bearer-authenticated.
/// No retries here; that policy belongs to whoever layers above the
/// pipeline entry points.
pub struct GenerativeClient {
    config: InferenceConfig,
    http: reqwest::Client,
}

impl GenerativeClient {
    pub fn new(config: InferenceConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { config, http }
    }

    pub fn base_url(&self) -> &str {
        &self.config.endpoint
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent",
            self.config.endpoint, self.config.model
        )
    }

    async fn request(
        &self,
        contents: Vec<Content>,
        config: &GenerationConfig,
    ) -> Result<String, InferenceError> {
        let body = GenerateRequest {
            contents,
            generation_config: config.clone(),
        };

        let response = self
            .http
            .post(self.generate_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Transport(format!(
                        "Request timed out after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    InferenceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Transport(format!(
                "Endpoint returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        match parsed.first_text() {
            Some(text) => Ok(text.to_string()),
            None => Err(InferenceError::MalformedResponse(
                "No candidate text in response envelope".into(),
            )),
        }
    }
}

impl TextGenerate for GenerativeClient {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, InferenceError> {
        self.request(vec![Content::user(prompt)], config).await
    }

    async fn chat(
        &self,
        transcript: &[ChatTurn],
        config: &GenerationConfig,
    ) -> Result<String, InferenceError> {
        let contents = transcript.iter().map(Content::from).collect();
        self.request(contents, config).await
    }
}

/// Mock client for testing. Returns a configured outcome and records
/// what it was asked.
pub struct MockTextGenerate {
    outcome: MockOutcome,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Reply(String),
    TransportFailure,
    MalformedEnvelope,
}

impl MockTextGenerate {
    pub fn replying(response: &str) -> Self {
        Self {
            outcome: MockOutcome::Reply(response.to_string()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Prompts (or serialized transcripts) seen so far.
    pub fn seen_prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn resolve(&self, seen: String) -> Result<String, InferenceError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(seen);
        }
        match &self.outcome {
            MockOutcome::Reply(text) => Ok(text.clone()),
            MockOutcome::TransportFailure => {
                Err(InferenceError::Transport("connection refused".into()))
            }
            MockOutcome::MalformedEnvelope => Err(InferenceError::MalformedResponse(
                "No candidate text in response envelope".into(),
            )),
        }
    }
}

impl TextGenerate for MockTextGenerate {
    async fn generate(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String, InferenceError> {
        self.resolve(prompt.to_string())
    }

    async fn chat(
        &self,
        transcript: &[ChatTurn],
        _config: &GenerationConfig,
    ) -> Result<String, InferenceError> {
        let joined = transcript
            .iter()
            .map(|t| {
                let role = if t.is_user { "user" } else { "model" };
                format!("{role}: {}", t.text)
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.resolve(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_configured_reply() {
        let client = MockTextGenerate::replying("generated text");
        let result = client
            .generate("prompt", &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(result, "generated text");
        assert_eq!(client.seen_prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn mock_transport_failure() {
        let client = MockTextGenerate::failing(MockOutcome::TransportFailure);
        let result = client.generate("prompt", &GenerationConfig::default()).await;
        assert!(matches!(result, Err(InferenceError::Transport(_))));
    }

    #[tokio::test]
    async fn mock_chat_sees_whole_transcript() {
        let client = MockTextGenerate::replying("ok");
        let transcript = vec![
            ChatTurn::assistant("Welcome."),
            ChatTurn::user("What changed since the last scan?"),
        ];
        client
            .chat(&transcript, &GenerationConfig::conversational())
            .await
            .unwrap();

        let seen = client.seen_prompts();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("model: Welcome."));
        assert!(seen[0].contains("user: What changed since the last scan?"));
    }

    #[test]
    fn client_constructor_keeps_endpoint() {
        let config = InferenceConfig::new("https://infer.example.com/", "secret", "model-x");
        let client = GenerativeClient::new(config);
        assert_eq!(client.base_url(), "https://infer.example.com");
        assert_eq!(
            client.generate_url(),
            "https://infer.example.com/v1/models/model-x:generateContent"
        );
    }
}
