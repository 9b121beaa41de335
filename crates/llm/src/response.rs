//! Defensive parsing of extraction output
//!
//! Model output is untrusted text: it may wrap the JSON in code fences,
//! emit fractional or negative quantities, or fail to be JSON at all. The
//! parser salvages what it can and substitutes a degraded default instead
//! of propagating an error into the finalization path.

use serde_json::Value;
use tracing::warn;

use fieldreport_core::ExtractedReport;

/// Strip a Markdown code fence (```json ... ``` or ``` ... ```) if present.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parse extraction output into a report, never failing.
///
/// Non-object output or invalid JSON yields `ExtractedReport::degraded`.
/// Inside `sales`, only non-negative integer quantities are kept; anything
/// else is dropped with a warning rather than corrupting the totals.
pub fn parse_extraction(raw: &str) -> ExtractedReport {
    let body = strip_code_fence(raw);

    let mut value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "extraction output is not valid JSON");
            return ExtractedReport::degraded("Rapport indisponible: sortie illisible");
        }
    };

    let Some(obj) = value.as_object_mut() else {
        warn!("extraction output is not a JSON object");
        return ExtractedReport::degraded("Rapport indisponible: sortie illisible");
    };

    if let Some(sales) = obj.get_mut("sales").and_then(Value::as_object_mut) {
        sales.retain(|name, quantity| match quantity.as_u64() {
            Some(q) if q <= u32::MAX as u64 => true,
            _ => {
                warn!(product = %name, value = %quantity, "dropping invalid sale quantity");
                false
            }
        });
    }

    match serde_json::from_value(value) {
        Ok(report) => report,
        Err(err) => {
            warn!(error = %err, "extraction output has unexpected shape");
            ExtractedReport::degraded("Rapport indisponible: sortie illisible")
        }
    }
}
