//! Outbound events for the delivery channel
//!
//! Two event types leave the core: an early "ending" signal so the client
//! stops recording, and the final report payload. Both are best-effort,
//! no acknowledgement is expected.

use serde::{Deserialize, Serialize};

use crate::report::SalesReport;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Interview is closing; upstream capture should stop now.
    ConversationEnding { message: String },
    /// Final structured report.
    ConversationComplete { data: SalesReport },
}

impl OutboundEvent {
    pub fn ending(message: impl Into<String>) -> Self {
        OutboundEvent::ConversationEnding {
            message: message.into(),
        }
    }

    pub fn complete(report: SalesReport) -> Self {
        OutboundEvent::ConversationComplete { data: report }
    }

    /// Topic string for transports that route by topic.
    pub fn topic(&self) -> &'static str {
        match self {
            OutboundEvent::ConversationEnding { .. } => "conversation-ending",
            OutboundEvent::ConversationComplete { .. } => "conversation-complete",
        }
    }
}
