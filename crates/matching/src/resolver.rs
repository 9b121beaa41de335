//! Product mention resolver
//!
//! Scores a raw mention string against every catalog entry using a sum of
//! independent keyword signals and keeps the strictly-best entry. The bonus
//! magnitudes and the acceptance threshold are empirically chosen deployment
//! defaults, kept configurable rather than re-derived.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use fieldreport_core::{Catalog, CatalogEntry};

/// Scoring constants for the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Raw mention equals a keyword exactly
    pub keyword_exact: f32,
    /// Raw mention contains a keyword as substring (base)
    pub keyword_contained: f32,
    /// Extra, scaled by `len(keyword)/len(mention)` (rewards keyword-dense mentions)
    pub keyword_density_max: f32,
    /// Keyword contains the raw mention (mention longer than 3 chars)
    pub mention_in_keyword: f32,
    /// A word of the canonical name (longer than 3 chars) appears in the mention
    pub name_word: f32,
    /// A short keyword (3-6 chars) appears in the mention; strong category
    /// signal, applied at most once per entry
    pub short_keyword: f32,
    /// Minimum accumulated score to accept the best match
    pub accept_threshold: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword_exact: 20.0,
            keyword_contained: 10.0,
            keyword_density_max: 5.0,
            mention_in_keyword: 6.0,
            name_word: 5.0,
            short_keyword: 15.0,
            accept_threshold: 3.0,
        }
    }
}

/// Result of resolving one raw mention.
///
/// The score is a heuristic confidence, not a probability; only relative
/// ordering and the acceptance threshold carry meaning. An exact
/// canonical-name match reports `f32::INFINITY`.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub entry: Option<&'a CatalogEntry>,
    pub score: f32,
}

impl<'a> MatchResult<'a> {
    pub fn none(score: f32) -> Self {
        Self { entry: None, score }
    }

    pub fn is_match(&self) -> bool {
        self.entry.is_some()
    }
}

/// Fuzzy mention-to-catalog matcher.
///
/// Pure over its inputs: identical mention + catalog always yield the same
/// result, independent of catalog entry order (ties keep the first-seen
/// entry, replacement requires a strictly greater score).
#[derive(Debug, Clone, Default)]
pub struct MentionResolver {
    weights: ScoreWeights,
    /// Deployment brand terms granting a flat bonus when present in a mention
    brand_terms: Vec<String>,
    brand_bonus: f32,
}

impl MentionResolver {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            weights,
            brand_terms: Vec::new(),
            brand_bonus: 0.0,
        }
    }

    pub fn with_brand_bonus<I, S>(mut self, terms: I, bonus: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brand_terms = terms
            .into_iter()
            .map(|t| t.into().to_lowercase())
            .collect();
        self.brand_bonus = bonus;
        self
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Resolve a raw mention against the catalog.
    ///
    /// Exact case-insensitive canonical-name matches short-circuit as an
    /// automatic accept. Otherwise every entry is scored and the best is
    /// accepted only if it reaches the threshold.
    pub fn resolve<'a>(&self, raw_mention: &str, catalog: &'a Catalog) -> MatchResult<'a> {
        let raw = raw_mention.trim().to_lowercase();
        if raw.is_empty() || catalog.is_empty() {
            return MatchResult::none(0.0);
        }

        if let Some(entry) = catalog.by_name(&raw) {
            return MatchResult {
                entry: Some(entry),
                score: f32::INFINITY,
            };
        }

        let mut best: Option<&CatalogEntry> = None;
        let mut best_score = 0.0_f32;

        for entry in catalog.entries() {
            let score = self.score_entry(&raw, entry);
            if score > best_score {
                best_score = score;
                best = Some(entry);
            }
        }

        if best_score >= self.weights.accept_threshold {
            MatchResult {
                entry: best,
                score: best_score,
            }
        } else {
            MatchResult::none(best_score)
        }
    }

    fn score_entry(&self, raw: &str, entry: &CatalogEntry) -> f32 {
        let w = &self.weights;
        let raw_chars = raw.chars().count();
        let mut score = 0.0_f32;

        for keyword in &entry.keywords {
            let kw = keyword.to_lowercase();
            let kw_chars = kw.chars().count();

            if raw == kw {
                score += w.keyword_exact;
            } else if raw.contains(&kw) {
                let proportion = kw_chars as f32 / raw_chars.max(1) as f32;
                score += w.keyword_contained + proportion * w.keyword_density_max;
            } else if raw_chars > 3 && kw.contains(raw) {
                score += w.mention_in_keyword;
            }
        }

        // Words of the canonical name appearing in the mention
        let name = entry.canonical_name.to_lowercase();
        for word in name.unicode_words() {
            if word.chars().count() > 3 && raw.contains(word) {
                score += w.name_word;
            }
        }

        // Short keywords act as category signals ("frigo", "télé", ...),
        // applied at most once per entry
        for keyword in &entry.keywords {
            let kw = keyword.to_lowercase();
            let kw_chars = kw.chars().count();
            if (3..=6).contains(&kw_chars) && raw.contains(&kw) {
                score += w.short_keyword;
                break;
            }
        }

        if self.brand_bonus != 0.0
            && self.brand_terms.iter().any(|term| raw.contains(term))
        {
            score += self.brand_bonus;
        }

        score
    }
}
