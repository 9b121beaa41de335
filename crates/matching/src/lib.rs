//! Fuzzy product matching and sales aggregation
//!
//! This crate maps free-form spoken/typed product mentions to canonical
//! catalog entries and accumulates the resolved quantities into report
//! totals:
//!
//! - [`resolver`] — keyword-based scoring of a raw mention against every
//!   catalog entry, with a fixed acceptance threshold
//! - [`aggregator`] — additive per-product totals with report-time zero
//!   back-fill and optional monetary roll-up
//! - [`insights`] — performance metrics and feedback pattern insights for
//!   the managerial summary

pub mod aggregator;
pub mod insights;
pub mod resolver;

pub use aggregator::{monetary_rollup, SalesLedger};
pub use insights::{ProductPerformance, SalesInsights};
pub use resolver::{MatchResult, MentionResolver, ScoreWeights};
