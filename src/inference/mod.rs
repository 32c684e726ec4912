pub mod types;
pub mod client;

pub use types::*;
pub use client::*;

use thiserror::Error;

/// Failures at the inference-endpoint boundary. Retry policy is the
/// caller's responsibility; nothing here retries automatically.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Network failure, timeout, or non-success HTTP status.
    /// Recoverable: the endpoint may come back.
    #[error("Cannot reach inference endpoint: {0}")]
    Transport(String),

    /// The endpoint answered but the envelope carried no usable
    /// candidate text. Not retryable without changing the request.
    #[error("Unusable inference response: {0}")]
    MalformedResponse(String),
}
