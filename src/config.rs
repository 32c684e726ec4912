use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Oncoscope";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "oncoscope=info"
}

/// Get the application data directory (~/Oncoscope/ on all platforms)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Oncoscope")
}

/// Default location of the patient/artifact database.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("oncoscope.db")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),
}

/// Connection settings for the remote inference endpoint.
///
/// The credential is always injected by the caller; there is no
/// embedded default key and no global mutable fallback.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base URL of the text-generation service.
    pub endpoint: String,
    /// Bearer credential sent with every request.
    pub api_key: String,
    /// Model identifier appended to the request path.
    pub model: String,
    /// Caller-supplied timeout; exceeding it surfaces as a transport failure.
    pub timeout_secs: u64,
}

impl InferenceConfig {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout_secs: 120,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Read endpoint and credential from the environment. Errors when
    /// either is absent rather than falling back to a baked-in value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = std::env::var("ONCOSCOPE_INFERENCE_URL")
            .map_err(|_| ConfigError::MissingEnv("ONCOSCOPE_INFERENCE_URL"))?;
        let api_key = std::env::var("ONCOSCOPE_API_KEY")
            .map_err(|_| ConfigError::MissingEnv("ONCOSCOPE_API_KEY"))?;
        let model = std::env::var("ONCOSCOPE_MODEL")
            .unwrap_or_else(|_| "oncology-reasoner-1".to_string());
        Ok(Self::new(&endpoint, &api_key, &model))
    }
}
