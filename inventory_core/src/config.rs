//! Inventory configuration: parsing, normalization, and loading.
//!
//! A TOML-backed configuration that supplies the constants the core treats as
//! injected: the quantity ceiling, the minimum unit value, the note-length
//! cap, the known equipment categories, and the category→prefix table used
//! when suggesting product codes.
//!
//! Key behaviors:
//! - Normalization trims category names and prefixes, uppercases prefixes,
//!   and de-duplicates the category list while preserving order.
//! - Empty names/prefixes and non-positive limits are rejected.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]
//! - [`InventoryConfig::default`] carries the built-in constants and is what
//!   the engine uses when no file is supplied.

use anyhow::{Context, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use toml::from_str;

/// Injected constants for the stock core.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct InventoryConfig {
    /// Hard per-row quantity ceiling; increases past it are rejected.
    pub max_quantity: u32,
    /// Smallest accepted unit value.
    pub min_unit_value: f64,
    /// Longest accepted free-text note on a movement.
    pub max_notes_len: usize,
    /// Known equipment categories (ordered, unique after normalization).
    pub categories: Vec<String>,
    /// Category → code prefix table (e.g., "Notebook" → "NB").
    pub code_prefixes: IndexMap<String, String>,
    /// Prefix used for categories absent from [`Self::code_prefixes`].
    pub default_prefix: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        let code_prefixes: IndexMap<String, String> = [
            ("Notebook", "NB"),
            ("Monitor", "MON"),
            ("Impressora", "IMP"),
            ("Rede", "SW"),
            ("Servidor", "SRV"),
            ("Periférico", "PER"),
            ("Outro", "OUT"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            max_quantity: 1000,
            min_unit_value: 0.01,
            max_notes_len: 500,
            categories: code_prefixes.keys().cloned().collect(),
            code_prefixes,
            default_prefix: "OUT".to_string(),
        }
    }
}

impl InventoryConfig {
    /// Prefix for a category, falling back to [`Self::default_prefix`].
    pub fn prefix_for(&self, category: &str) -> &str {
        self.code_prefixes
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.default_prefix)
    }
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default)]
pub struct NormalizationReport {
    /// Number of prefixes that changed when uppercasing/trimming.
    pub prefixes_rewritten: usize,
    /// Count of removed duplicate categories after trimming.
    pub categories_deduped: usize,
}

/// Normalize a configuration in place.
///
/// What normalization does:
/// - Trim category keys and prefixes; uppercase prefixes
/// - Reject empty names/prefixes after trimming and duplicate prefix keys
/// - De-duplicate `categories`, preserving the first occurrence order
/// - Reject a zero `max_quantity` or non-positive `min_unit_value`
///
/// Returns a [`NormalizationReport`] detailing the changes made.
pub fn normalize_config(cfg: &mut InventoryConfig) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    if cfg.max_quantity == 0 {
        bail!("max_quantity must be at least 1");
    }
    if cfg.min_unit_value <= 0.0 {
        bail!("min_unit_value must be positive");
    }

    let mut rebuilt: IndexMap<String, String> = IndexMap::new();
    for (raw_category, raw_prefix) in std::mem::take(&mut cfg.code_prefixes) {
        let category = raw_category.trim().to_string();
        if category.is_empty() {
            bail!("category name cannot be empty after trimming");
        }
        let prefix = raw_prefix.trim().to_uppercase();
        if prefix.is_empty() {
            bail!("code prefix for '{category}' cannot be empty after trimming");
        }
        if prefix != raw_prefix || category != raw_category {
            report.prefixes_rewritten += 1;
        }
        if rebuilt.insert(category.clone(), prefix).is_some() {
            bail!("duplicate category after normalization: {category}");
        }
    }
    cfg.code_prefixes = rebuilt;

    cfg.default_prefix = cfg.default_prefix.trim().to_uppercase();
    if cfg.default_prefix.is_empty() {
        bail!("default_prefix cannot be empty after trimming");
    }

    let before = cfg.categories.len();
    let mut seen = std::collections::HashSet::new();
    let mut categories = Vec::with_capacity(before);
    for raw in std::mem::take(&mut cfg.categories) {
        let cat = raw.trim().to_string();
        if cat.is_empty() {
            bail!("category list entry cannot be empty after trimming");
        }
        if seen.insert(cat.clone()) {
            categories.push(cat);
        }
    }
    report.categories_deduped = before.saturating_sub(categories.len());
    cfg.categories = categories;

    Ok(report)
}

/// Parse and normalize a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<InventoryConfig> {
    let mut cfg: InventoryConfig = from_str(toml_str).context("failed to parse config TOML")?;
    normalize_config(&mut cfg).context("normalize_config failed")?;
    Ok(cfg)
}

/// Read a configuration TOML file from disk, parse, and normalize it.
///
/// See [`load_config_str`] for details on parsing and normalization.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<InventoryConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
