//! Core types and boundary traits for the field sales report agent
//!
//! This crate provides the foundational types used across all other crates:
//! - Product catalog entries and the read-only catalog
//! - Conversation turns and roles
//! - Extraction and report payload types
//! - Boundary traits for the external extraction service and delivery channel

pub mod catalog;
pub mod conversation;
pub mod events;
pub mod report;
pub mod traits;

pub use catalog::{Catalog, CatalogEntry};
pub use conversation::{render_transcript, Turn, TurnRole};
pub use events::OutboundEvent;
pub use report::{ExtractedReport, MentionCandidate, MonetaryTotals, SalesReport, SalesTotals};
pub use traits::{
    DeliveryChannel, DeliveryError, ExtractionError, ExtractionRequest, ExtractionService,
};
