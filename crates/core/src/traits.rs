//! Boundary traits for external collaborators
//!
//! The real-time transport, STT/TTS pipeline and LLM vendor APIs stay
//! outside this workspace; they plug in through these two traits.

use async_trait::async_trait;
use thiserror::Error;

use crate::events::OutboundEvent;

/// Request for one extraction call at finalization time.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Bounded conversation transcript (`USER:`/`AGENT:` lines)
    pub transcript: String,
    /// Description of the expected output sections (attention structure)
    pub sections: String,
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("extraction request failed: {0}")]
    Request(String),
    #[error("extraction service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("extraction response malformed: {0}")]
    Malformed(String),
}

/// External service that turns a transcript into structured report text.
///
/// The response is untrusted free text (possibly wrapped in code-fence
/// delimiters); callers must parse it defensively.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, request: ExtractionRequest) -> Result<String, ExtractionError>;
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("delivery failed: {0}")]
    Failed(String),
}

/// Outbound channel to the client. Best-effort: failures are logged by the
/// caller and never block the finalization sequence.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn deliver(&self, event: OutboundEvent) -> Result<(), DeliveryError>;
}
