//! Configuration loading for field-report deployments
//!
//! Three layers, from most static to most dynamic:
//!
//! - [`project::ProductsFile`] — the product catalog, mandatory, loaded once
//! - [`project::ClientConfig`] — per-client tuning, optional with defaults
//! - [`behavior::AgentBehavior`] — per-session knobs fetched at start with a
//!   bounded wait

pub mod behavior;
pub mod error;
pub mod project;

pub use behavior::{AgentBehavior, QuestionStyle, TerminationPolicy};
pub use error::ConfigError;
pub use project::{ClientConfig, ProductSpec, ProductsFile};
