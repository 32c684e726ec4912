//! Oncoscope core: AI-assisted structured inference for oncology
//! decision support.
//!
//! The crate turns typed clinical inputs into persisted, typed
//! artifacts through a single pipeline: prompt construction,
//! inference against a remote generative endpoint, layered JSON
//! extraction with validation, and an append-only SQLite artifact
//! store. A conversational assistant rides on the same inference
//! client.
//!
//! Clinical judgment stays with the oncologist; everything produced
//! here is decision support, not a decision.

pub mod chat;
pub mod config;
pub mod db;
pub mod inference;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Filter comes from
/// `RUST_LOG` when set, otherwise the crate default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
