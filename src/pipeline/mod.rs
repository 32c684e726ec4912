pub mod inputs;
pub mod prompt;
pub mod extract;
pub mod validate;
pub mod writer;
pub mod orchestrator;

pub use inputs::*;
pub use prompt::*;
pub use extract::*;
pub use validate::*;
pub use writer::*;
pub use orchestrator::*;

use thiserror::Error;

use crate::db::DatabaseError;
use crate::inference::InferenceError;

/// Failures of a pipeline run. All of these propagate to the entry
/// point uncaught; a failed run writes nothing to the artifact store.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Inference call failed: {0}")]
    Inference(#[from] InferenceError),

    /// No fallback stage recovered parseable JSON. Carries the raw
    /// response text for offline diagnosis.
    #[error("No parseable JSON found in model response")]
    Extraction { raw: String },

    /// JSON parsed but does not match the requested result shape.
    /// Distinct from `Extraction` for telemetry, same user-visible
    /// treatment.
    #[error("Response does not match the requested shape: {0}")]
    SchemaValidation(String),

    #[error("Unknown patient identifier: {0}")]
    UnknownPatient(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
