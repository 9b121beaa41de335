//! Post-session sales insights
//!
//! Turns the final totals and free-text customer feedback into a compact
//! analysis: per-product target achievement plus recurring feedback themes
//! detected with a fixed French pattern table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use fieldreport_core::{Catalog, SalesTotals};

/// One product measured against its sales target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPerformance {
    pub name: String,
    pub category: String,
    pub sold: u32,
    pub target: u32,
    /// Percentage of target achieved; 100.0 when no target is configured
    /// and something sold, 0.0 when nothing sold
    pub achievement_pct: f32,
}

impl ProductPerformance {
    pub fn on_target(&self) -> bool {
        self.achievement_pct >= 100.0
    }
}

struct FeedbackPattern {
    theme: &'static str,
    pattern: Regex,
}

static FEEDBACK_PATTERNS: Lazy<Vec<FeedbackPattern>> = Lazy::new(|| {
    [
        ("prix", r"(?i)trop\s+ch[eè]r|prix\s+élevé|ch[eè]r|coûteux|budget"),
        ("intérêt", r"(?i)intéressé|curieux|enthousiaste|emballé"),
        ("hésitation", r"(?i)hésit|réfléchi[rt]|pas\s+sûr|indécis"),
        ("concurrence", r"(?i)concurrent|ailleurs|autre\s+marque|comparé"),
        ("qualité", r"(?i)qualité|solide|fiable|finition"),
        ("promotion", r"(?i)promo|réduction|remise|offre\s+spéciale"),
    ]
    .into_iter()
    .map(|(theme, pattern)| FeedbackPattern {
        theme,
        pattern: Regex::new(pattern).expect("feedback pattern must compile"),
    })
    .collect()
});

/// Aggregated analysis attached to the end-of-session report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesInsights {
    pub performances: Vec<ProductPerformance>,
    pub total_units: u32,
    pub top_seller: Option<String>,
    pub feedback_themes: Vec<String>,
}

impl SalesInsights {
    /// Build insights from the zero-backfilled totals and raw feedback text.
    pub fn generate(totals: &SalesTotals, catalog: &Catalog, feedback: &str) -> Self {
        let mut performances = Vec::with_capacity(catalog.len());
        let mut total_units = 0;
        let mut top: Option<(String, u32)> = None;

        for entry in catalog.entries() {
            let sold = totals.get(&entry.canonical_name).copied().unwrap_or(0);
            total_units += sold;

            let achievement_pct = if entry.target_quantity > 0 {
                sold as f32 / entry.target_quantity as f32 * 100.0
            } else if sold > 0 {
                100.0
            } else {
                0.0
            };

            if sold > 0 && top.as_ref().map_or(true, |(_, best)| sold > *best) {
                top = Some((entry.canonical_name.clone(), sold));
            }

            performances.push(ProductPerformance {
                name: entry.canonical_name.clone(),
                category: entry.category.clone(),
                sold,
                target: entry.target_quantity,
                achievement_pct,
            });
        }

        let feedback_themes = FEEDBACK_PATTERNS
            .iter()
            .filter(|p| p.pattern.is_match(feedback))
            .map(|p| p.theme.to_string())
            .collect();

        Self {
            performances,
            total_units,
            top_seller: top.map(|(name, _)| name),
            feedback_themes,
        }
    }

    /// Products under half of their target, the ones a manager follows up on.
    pub fn struggling(&self) -> impl Iterator<Item = &ProductPerformance> {
        self.performances
            .iter()
            .filter(|p| p.target > 0 && p.achievement_pct < 50.0)
    }

    /// Human-readable summary, one line per product plus the headline stats.
    pub fn format_report(&self) -> String {
        let mut out = format!("Ventes totales: {} unités\n", self.total_units);
        if let Some(top) = &self.top_seller {
            out.push_str(&format!("Meilleure vente: {}\n", top));
        }
        for perf in &self.performances {
            out.push_str(&format!(
                "- {} ({}): {}/{} ({:.0}%)\n",
                perf.name, perf.category, perf.sold, perf.target, perf.achievement_pct
            ));
        }
        if !self.feedback_themes.is_empty() {
            out.push_str(&format!("Thèmes clients: {}\n", self.feedback_themes.join(", ")));
        }
        out
    }
}
