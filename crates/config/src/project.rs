//! Deployment-level configuration
//!
//! A deployment ("project") ships a product catalog file and a client
//! config file. Both are YAML, read once at startup. A missing client
//! config falls back to defaults with a warning; a missing or malformed
//! catalog is a hard error since nothing can be matched without it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use fieldreport_core::{Catalog, CatalogEntry};

use crate::error::ConfigError;

/// One product as declared in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSpec {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub target: u32,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsFile {
    pub products: Vec<ProductSpec>,
}

impl ProductsFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if parsed.products.is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: "catalog declares no products".into(),
            });
        }
        Ok(parsed)
    }

    /// Build the in-memory catalog. A product without an explicit id gets
    /// one derived from its position.
    pub fn into_catalog(self) -> Catalog {
        let entries = self
            .products
            .into_iter()
            .enumerate()
            .map(|(i, spec)| {
                let id = spec.id.unwrap_or_else(|| format!("product-{}", i + 1));
                let mut entry = CatalogEntry::new(id, spec.name, spec.category)
                    .with_keywords(spec.keywords)
                    .with_target(spec.target);
                if let Some(price) = spec.price {
                    entry = entry.with_price(price);
                }
                entry
            })
            .collect();
        Catalog::new(entries)
    }
}

/// Client-specific tuning shared by all sessions of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Terms granting a flat resolver bonus (house brands)
    pub brand_mentions: Vec<String>,
    pub brand_bonus: f32,
    /// Whether the final report carries monetary amounts
    pub monetary_tracking: bool,
    /// Extra sections requested in the extraction output
    pub report_sections: Vec<String>,
    /// Cap on the transcript passed to extraction, in characters
    pub max_transcript_chars: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            brand_mentions: Vec::new(),
            brand_bonus: 0.0,
            monetary_tracking: false,
            report_sections: Vec::new(),
            max_transcript_chars: 24_000,
        }
    }
}

impl ClientConfig {
    /// Load from file, falling back to defaults when the file is absent.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "client config missing, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_file_to_catalog() {
        let yaml = r#"
products:
  - name: Compact Cooker
    category: Cuisine
    keywords: [cooker, linux cooker]
    target: 5
    price: 249.0
  - id: tv-8k
    name: QLED Vision 8K
    category: Téléviseur
"#;
        let file: ProductsFile = serde_yaml::from_str(yaml).unwrap();
        let catalog = file.into_catalog();
        assert_eq!(catalog.len(), 2);

        let cooker = catalog.by_name("Compact Cooker").unwrap();
        assert_eq!(cooker.id, "product-1");
        assert_eq!(cooker.target_quantity, 5);
        assert_eq!(cooker.price, Some(249.0));

        let tv = catalog.by_name("QLED Vision 8K").unwrap();
        assert_eq!(tv.id, "tv-8k");
        assert_eq!(tv.target_quantity, 0);
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert!(!config.monetary_tracking);
        assert_eq!(config.max_transcript_chars, 24_000);
    }

    #[test]
    fn test_client_config_partial_yaml_fills_defaults() {
        let config: ClientConfig = serde_yaml::from_str(
            "brand_mentions: [samsung]\nbrand_bonus: 4.0\nmonetary_tracking: true\n",
        )
        .unwrap();
        assert_eq!(config.brand_mentions, vec!["samsung"]);
        assert_eq!(config.brand_bonus, 4.0);
        assert!(config.monetary_tracking);
        assert_eq!(config.max_transcript_chars, 24_000);
    }

    #[test]
    fn test_missing_client_config_uses_defaults() {
        let config = ClientConfig::load_or_default("/nonexistent/client.yaml").unwrap();
        assert_eq!(config.brand_bonus, 0.0);
    }
}
