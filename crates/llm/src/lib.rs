//! Report extraction over an LLM vendor API
//!
//! Three pieces, used together at finalization time:
//!
//! - [`prompt::ExtractionPromptBuilder`] — builds the catalog-aware system
//!   prompt with a zero-filled JSON skeleton
//! - [`claude::ClaudeExtractor`] — the messages-API client implementing
//!   [`fieldreport_core::ExtractionService`]
//! - [`response`] — fence stripping and defensive parsing of the output

pub mod claude;
pub mod prompt;
pub mod response;

pub use claude::ClaudeExtractor;
pub use prompt::ExtractionPromptBuilder;
pub use response::{parse_extraction, strip_code_fence};
