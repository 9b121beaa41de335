//! Product catalog types
//!
//! The catalog is the canonical list of sellable items for one deployment.
//! It is loaded once before any session starts and shared read-only across
//! all sessions; the resolver only ever borrows it.

use serde::{Deserialize, Serialize};

/// One sellable item with the metadata used for mention matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier
    pub id: String,
    /// Exact product name used in reports
    pub canonical_name: String,
    /// Product category (e.g. "Smartphone", "Téléviseur")
    pub category: String,
    /// Matching keywords, insertion order = priority
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Sales target for the reporting period
    #[serde(default)]
    pub target_quantity: u32,
    /// Unit price, if monetary tracking is enabled for the deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        canonical_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            canonical_name: canonical_name.into(),
            category: category.into(),
            keywords: Vec::new(),
            target_quantity: 0,
            price: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target(mut self, target: u32) -> Self {
        self.target_quantity = target;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

/// Read-only catalog for one deployment.
///
/// Entries are immutable once loaded; the catalog owns them exclusively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by canonical name. Folding is full Unicode:
    /// accented French names ("Écran Géant") must match their lowercased
    /// spoken form.
    pub fn by_name(&self, name: &str) -> Option<&CatalogEntry> {
        let wanted = name.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.canonical_name.to_lowercase() == wanted)
    }

    /// Canonical names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.canonical_name.as_str())
    }
}
