//! Conversational assistant sessions.
//!
//! A session owns an ordered transcript and enforces at most one
//! in-flight endpoint call at a time: a submission while a response is
//! pending is rejected outright, never queued. The transcript only
//! ever grows: a failed call leaves the user's turn in place with no
//! assistant reply, and the user may simply resend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use thiserror::Error;

use crate::inference::{ChatTurn, GenerationConfig, InferenceError, TextGenerate};

/// Fixed first assistant turn of every session.
pub const WELCOME_MESSAGE: &str = "Hello, I am your oncology assistant. \
I can discuss this patient's scans, diagnoses, prognosis and treatment \
options. What would you like to know?";

#[derive(Error, Debug)]
pub enum ChatError {
    /// A previous submission is still awaiting its response.
    #[error("A response is already in flight for this session")]
    ResponseInFlight,

    /// Transcript lock poisoned by a panicking thread.
    #[error("Chat session state is corrupted")]
    LockPoisoned,

    #[error("Assistant call failed: {0}")]
    Inference(#[from] InferenceError),
}

/// One conversation with the assistant.
///
/// Shared-reference API: `send` takes `&self` so a session can sit
/// behind an `Arc` and serve transcript reads while a call is pending.
pub struct ChatSession {
    transcript: Mutex<Vec<ChatTurn>>,
    busy: AtomicBool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// New session, transcript pre-seeded with the welcome turn.
    pub fn new() -> Self {
        Self {
            transcript: Mutex::new(vec![ChatTurn::assistant(WELCOME_MESSAGE)]),
            busy: AtomicBool::new(false),
        }
    }

    /// Snapshot of the transcript in submission order.
    pub fn transcript(&self) -> Result<Vec<ChatTurn>, ChatError> {
        self.transcript
            .lock()
            .map(|t| t.clone())
            .map_err(|_| ChatError::LockPoisoned)
    }

    /// Whether a call is currently awaiting its response.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Submit one user message and wait for the assistant's reply.
    ///
    /// The user turn is appended before the endpoint call and stays in
    /// the transcript whether or not the call succeeds. On success the
    /// assistant turn is appended and returned.
    pub async fn send<C: TextGenerate>(
        &self,
        client: &C,
        message: &str,
    ) -> Result<String, ChatError> {
        let _guard = self.begin()?;

        let snapshot = {
            let mut transcript = self.transcript.lock().map_err(|_| ChatError::LockPoisoned)?;
            transcript.push(ChatTurn::user(message));
            transcript.clone()
        };

        tracing::debug!(turns = snapshot.len(), "Forwarding transcript to assistant");
        let reply = client
            .chat(&snapshot, &GenerationConfig::conversational())
            .await?;

        let mut transcript = self.transcript.lock().map_err(|_| ChatError::LockPoisoned)?;
        transcript.push(ChatTurn::assistant(&reply));
        Ok(reply)
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, ChatError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Rejected chat submission while a response is in flight");
            return Err(ChatError::ResponseInFlight);
        }
        Ok(InFlightGuard { session: self })
    }
}

/// Clears the busy flag when the call finishes, on every exit path.
struct InFlightGuard<'a> {
    session: &'a ChatSession,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.session.busy.store(false, Ordering::Release);
    }
}
