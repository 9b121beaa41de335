//! Extraction prompt assembly
//!
//! The prompt pins the output to a strict JSON shape whose `sales` object
//! already enumerates every catalog product at zero. Models fill in the
//! quantities they heard; anything not in the skeleton gets fuzzy-resolved
//! downstream anyway, but starting zero-filled keeps omissions explicit.

use std::fmt::Write as _;

use fieldreport_core::Catalog;

#[derive(Debug, Clone)]
pub struct ExtractionPromptBuilder {
    product_lines: String,
    skeleton: String,
    extra_sections: Vec<String>,
}

impl ExtractionPromptBuilder {
    pub fn new(catalog: &Catalog) -> Self {
        let mut product_lines = String::new();
        let mut skeleton = String::from("{\n  \"sales\": {\n");
        let last = catalog.len().saturating_sub(1);
        for (i, entry) in catalog.entries().iter().enumerate() {
            let _ = writeln!(
                product_lines,
                "- {} ({}), mots-clés: {}",
                entry.canonical_name,
                entry.category,
                entry.keywords.join(", ")
            );
            let _ = write!(skeleton, "    \"{}\": 0", entry.canonical_name);
            skeleton.push_str(if i == last { "\n" } else { ",\n" });
        }
        skeleton.push_str(
            "  },\n  \"customer_feedback\": \"\",\n  \"emotional_context\": null,\n  \
             \"key_insights\": [],\n  \"event_name\": null,\n  \"time_spent\": null\n}",
        );
        Self {
            product_lines,
            skeleton,
            extra_sections: Vec::new(),
        }
    }

    pub fn with_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_sections = sections.into_iter().map(Into::into).collect();
        self
    }

    /// System prompt sent with every extraction call.
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!(
            "Tu analyses la transcription d'un débrief de vente terrain.\n\
             Extrais les ventes mentionnées et le ressenti du vendeur.\n\n\
             Catalogue produits:\n{}\n\
             Réponds UNIQUEMENT avec un objet JSON de cette forme exacte \
             (quantités entières, 0 si non mentionné):\n{}\n",
            self.product_lines, self.skeleton
        );
        if !self.extra_sections.is_empty() {
            let _ = write!(
                prompt,
                "\nDans key_insights, couvre en priorité: {}.",
                self.extra_sections.join("; ")
            );
        }
        prompt
    }

}
