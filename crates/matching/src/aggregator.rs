//! Sales ledger and report totals
//!
//! Accumulates resolved sales quantities over a session and produces the
//! final report totals. Totals are additive per canonical product and the
//! final map is back-filled with a zero for every catalog product that was
//! never mentioned, so downstream consumers always see the full catalog.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use fieldreport_core::{Catalog, MentionCandidate, MonetaryTotals, SalesTotals};

use crate::resolver::MentionResolver;

/// Per-session accumulator of sales quantities keyed by canonical name.
///
/// Recording order never changes the totals; every record is a plain
/// addition on the target key.
#[derive(Debug, Default)]
pub struct SalesLedger {
    totals: SalesTotals,
    /// Raw mentions that failed to resolve, kept for diagnostics
    unmatched: Vec<MentionCandidate>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a quantity against a canonical product name directly.
    pub fn record(&mut self, canonical_name: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.totals.entry(canonical_name.to_string()).or_insert(0) += quantity;
    }

    /// Record a raw mention, resolving it against the catalog first.
    ///
    /// Mentions that are already exact canonical names take the fast path;
    /// everything else goes through the resolver. Unresolvable mentions are
    /// dropped from the totals but kept for diagnostics, never guessed.
    pub fn record_raw(
        &mut self,
        raw_mention: &str,
        quantity: u32,
        resolver: &MentionResolver,
        catalog: &Catalog,
    ) {
        if let Some(entry) = catalog.by_name(raw_mention.trim()) {
            self.record(&entry.canonical_name, quantity);
            return;
        }

        let result = resolver.resolve(raw_mention, catalog);
        match result.entry {
            Some(entry) => {
                debug!(
                    raw = raw_mention,
                    matched = %entry.canonical_name,
                    score = result.score,
                    "resolved product mention"
                );
                let name = entry.canonical_name.clone();
                self.record(&name, quantity);
            }
            None => {
                warn!(
                    raw = raw_mention,
                    quantity,
                    best_score = result.score,
                    "unresolved product mention dropped from totals"
                );
                self.unmatched.push(MentionCandidate {
                    raw_text: raw_mention.to_string(),
                    quantity,
                });
            }
        }
    }

    pub fn totals(&self) -> &SalesTotals {
        &self.totals
    }

    pub fn unmatched(&self) -> &[MentionCandidate] {
        &self.unmatched
    }

    /// Final report totals: the accumulated quantities with a zero for every
    /// catalog product that never appeared.
    pub fn into_report_totals(mut self, catalog: &Catalog) -> SalesTotals {
        for name in catalog.names() {
            self.totals.entry(name.to_string()).or_insert(0);
        }
        self.totals
    }
}

/// Roll up monetary amounts from final totals and catalog prices.
///
/// Products without a configured price are reported in `unpriced` rather
/// than silently counted as zero revenue.
pub fn monetary_rollup(totals: &SalesTotals, catalog: &Catalog) -> MonetaryTotals {
    let mut amounts = BTreeMap::new();
    let mut total_amount = 0.0;
    let mut unpriced = Vec::new();

    for (name, &quantity) in totals {
        if quantity == 0 {
            continue;
        }
        match catalog.by_name(name).and_then(|e| e.price) {
            Some(price) => {
                let amount = price * quantity as f64;
                total_amount += amount;
                amounts.insert(name.clone(), amount);
            }
            None => unpriced.push(name.clone()),
        }
    }

    MonetaryTotals {
        amounts,
        total_amount,
        unpriced,
    }
}
