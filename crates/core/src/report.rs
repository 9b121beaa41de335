//! Extraction and report payload types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A free-text product reference with an associated quantity.
///
/// Produced by the extraction step (or live bookkeeping) and consumed
/// immediately by the resolver; quantity validation happens before the
/// candidate is built, the resolver never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionCandidate {
    pub raw_text: String,
    pub quantity: u32,
}

impl MentionCandidate {
    pub fn new(raw_text: impl Into<String>, quantity: u32) -> Self {
        Self {
            raw_text: raw_text.into(),
            quantity,
        }
    }
}

/// Accumulated quantities keyed by canonical product name.
///
/// Keys are always canonical names present in the catalog; at report time
/// the map is zero back-filled so it enumerates the full catalog.
pub type SalesTotals = BTreeMap<String, u32>;

/// Structured output of the extraction service, after defensive parsing.
///
/// Mirrors the wire structure the extraction prompt asks for; every field
/// is optional on the wire, the parser substitutes defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedReport {
    /// Raw product name -> quantity, before fuzzy resolution
    #[serde(default)]
    pub sales: BTreeMap<String, u32>,
    #[serde(default)]
    pub customer_feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_context: Option<String>,
    #[serde(default)]
    pub key_insights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<String>,
}

impl ExtractedReport {
    /// Minimal default substituted when the extraction output cannot be
    /// parsed: empty sales plus an explanatory feedback string.
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            customer_feedback: reason.into(),
            ..Self::default()
        }
    }
}

/// Monetary roll-up over a sales map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonetaryTotals {
    /// Canonical name -> quantity * unit price
    pub amounts: BTreeMap<String, f64>,
    pub total_amount: f64,
    /// Entries sold but carrying no configured price (amount defaulted to 0)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unpriced: Vec<String>,
}

/// Final report payload delivered on the completion event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesReport {
    /// One entry per catalog item, zero-filled where nothing was sold
    pub sales: SalesTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monetary: Option<MonetaryTotals>,
    #[serde(default)]
    pub customer_feedback: String,
    #[serde(default)]
    pub key_insights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_report_is_empty() {
        let report = ExtractedReport::degraded("extraction output unparsable");
        assert!(report.sales.is_empty());
        assert!(report.key_insights.is_empty());
        assert_eq!(report.customer_feedback, "extraction output unparsable");
    }

    #[test]
    fn test_extracted_report_tolerates_missing_fields() {
        let report: ExtractedReport = serde_json::from_str("{}").unwrap();
        assert!(report.sales.is_empty());
        assert_eq!(report.customer_feedback, "");
    }
}
