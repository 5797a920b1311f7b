//! Human-facing titles and descriptions for textures
//!
//! Lookups go through a static override table (category, then file stem).
//! Textures without an override get a generated description.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bundled override table
const BUNDLED_OVERRIDES: &str = include_str!("../data/overrides.toml");

/// A hand-written title and description for one texture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOverride {
    pub title: String,
    pub description: String,
}

/// Where an [`Enrichment`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentSource {
    /// Taken verbatim from the override table
    Override,
    /// Synthesized from the file name
    Generated,
}

/// Title and description for a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub title: String,
    pub description: String,
    pub source: EnrichmentSource,
}

/// Override table: category directory name -> file stem -> text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataOverrides {
    categories: IndexMap<String, IndexMap<String, TextOverride>>,
}

impl MetadataOverrides {
    /// The table compiled into the binary
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_toml_str(BUNDLED_OVERRIDES).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse bundled overrides: {}", e);
            Self::default()
        })
    }

    /// Parse a table from TOML text
    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Read a table from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path).map_err(|e| Error::path_io("reading", path, e))?;
        Self::from_toml_str(&src).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Layer `other` on top of this table; its entries win.
    pub fn extend(&mut self, other: MetadataOverrides) {
        for (category, entries) in other.categories {
            self.categories.entry(category).or_default().extend(entries);
        }
    }

    /// Add or replace one override
    pub fn insert(&mut self, category: impl Into<String>, filename: impl Into<String>, text: TextOverride) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(filename.into(), text);
    }

    /// Number of texture overrides across all categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.values().map(IndexMap::len).sum()
    }

    /// Whether the table holds no texture overrides
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Title and description for `filename` in `category`.
    ///
    /// Never fails: a missing override is the normal case.
    ///
    /// # Example
    /// ```
    /// use texkit::enrich::{EnrichmentSource, MetadataOverrides};
    ///
    /// let table = MetadataOverrides::bundled();
    /// let text = table.lookup("Grain", "Film 35 mm");
    /// assert_eq!(text.title, "Film 35 mm");
    /// assert_eq!(text.description, "Apply film mm effects to your design");
    /// assert_eq!(text.source, EnrichmentSource::Generated);
    /// ```
    #[must_use]
    pub fn lookup(&self, category: &str, filename: &str) -> Enrichment {
        match self.categories.get(category).and_then(|c| c.get(filename)) {
            Some(text) => Enrichment {
                title: text.title.clone(),
                description: text.description.clone(),
                source: EnrichmentSource::Override,
            },
            None => Enrichment {
                title: filename.to_string(),
                description: generate_description(filename),
                source: EnrichmentSource::Generated,
            },
        }
    }
}

/// `"Apply <name> effects to your design"`, with standalone numbers dropped
/// from the name and the rest lower-cased.
#[must_use]
pub fn generate_description(filename: &str) -> String {
    let clean: Vec<&str> = filename
        .split_whitespace()
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .collect();
    format!("Apply {} effects to your design", clean.join(" ").to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bundled_table_parses() {
        let table = MetadataOverrides::bundled();
        assert_eq!(table.len(), 1);
        let text = table.lookup("Grunge", "Grunge 1");
        assert_eq!(text.title, "Grimey as bru");
        assert_eq!(text.description, "Add a gritty, weathered look to your design");
        assert_eq!(text.source, EnrichmentSource::Override);
    }

    #[test]
    fn test_override_is_scoped_to_category() {
        let table = MetadataOverrides::bundled();
        let text = table.lookup("Grain", "Grunge 1");
        assert_eq!(text.source, EnrichmentSource::Generated);
        assert_eq!(text.title, "Grunge 1");
    }

    #[test]
    fn test_generated_description() {
        assert_eq!(generate_description("Grunge 1"), "Apply grunge effects to your design");
        assert_eq!(
            generate_description("Old  Paper 2 Texture"),
            "Apply old paper texture effects to your design"
        );
        // Digits glued to a word are kept
        assert_eq!(generate_description("Grunge7"), "Apply grunge7 effects to your design");
        assert_eq!(generate_description("12"), "Apply  effects to your design");
    }

    #[test]
    fn test_non_ascii_digit_words_are_kept() {
        assert_eq!(generate_description("Grain ٣"), "Apply grain ٣ effects to your design");
    }

    #[test]
    fn test_extend_overrides_bundled() {
        let mut table = MetadataOverrides::bundled();
        let extra = MetadataOverrides::from_toml_str(
            r#"
            [Grunge."Grunge 1"]
            title = "Grime"
            description = "Dirty"

            [Grain.Fine]
            title = "Fine Grain"
            description = "Subtle film grain"
            "#,
        )
        .unwrap();
        table.extend(extra);

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("Grunge", "Grunge 1").title, "Grime");
        assert_eq!(table.lookup("Grain", "Fine").description, "Subtle film grain");
    }

    #[test]
    fn test_malformed_table_is_an_error() {
        assert!(MetadataOverrides::from_toml_str("[Grunge.x]\ntitle = 3").is_err());
    }
}
