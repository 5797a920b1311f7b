//! Catalog document types
//!
//! The on-disk shape is:
//!
//! ```json
//! { "textures": { "<category_key>": { "category": "...", "textures": [ ... ] } } }
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The whole catalog document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Category key -> category record, in file order
    pub textures: IndexMap<String, CategoryRecord>,
}

/// All textures of one category directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Original directory name
    pub category: String,
    /// Texture records, kept sorted by `sequence_number`
    pub textures: Vec<TextureRecord>,
}

/// One texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRecord {
    /// Source file stem; unique within its category
    pub filename: String,
    pub title: String,
    pub default_blend_mode: String,
    pub sequence_number: i64,
    /// Public URL of the full-size texture
    pub file_path: String,
    /// Public URL of the thumbnail
    pub thumbnail_path: String,
    pub description: String,
    /// Fields added by other tools, preserved as-is
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Catalog key for a category directory name (`:` becomes `_`)
#[must_use]
pub fn category_key(dir_name: &str) -> String {
    dir_name.replace(':', "_")
}

impl CategoryRecord {
    /// An empty record for a category directory
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            textures: Vec::new(),
        }
    }

    /// File stems already present
    #[must_use]
    pub fn filenames(&self) -> HashSet<&str> {
        self.textures.iter().map(|t| t.filename.as_str()).collect()
    }

    /// Whether a texture with this file stem is present
    #[must_use]
    pub fn contains(&self, filename: &str) -> bool {
        self.textures.iter().any(|t| t.filename == filename)
    }

    /// Stable sort by sequence number; ties keep their relative order
    pub fn sort(&mut self) {
        self.textures.sort_by_key(|t| t.sequence_number);
    }
}

impl Catalog {
    /// Number of texture records across all categories
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.values().map(|c| c.textures.len()).sum()
    }

    /// The record for a category directory, created empty if missing.
    ///
    /// Returns the record and whether it was just created. Two directories
    /// that map to the same key share one record, which keeps the first name.
    pub fn category_mut(&mut self, dir_name: &str) -> (&mut CategoryRecord, bool) {
        let key = category_key(dir_name);
        let created = match self.textures.get(&key) {
            Some(existing) => {
                if existing.category != dir_name {
                    tracing::warn!(
                        "Directories '{}' and '{}' share catalog key '{}'; merging them",
                        existing.category,
                        dir_name,
                        key
                    );
                }
                false
            }
            None => true,
        };
        let record = self
            .textures
            .entry(key)
            .or_insert_with(|| CategoryRecord::new(dir_name));
        (record, created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(filename: &str, sequence_number: i64) -> TextureRecord {
        TextureRecord {
            filename: filename.to_string(),
            title: filename.to_string(),
            default_blend_mode: "overlay".to_string(),
            sequence_number,
            file_path: String::new(),
            thumbnail_path: String::new(),
            description: String::new(),
            extra: IndexMap::new(),
        }
    }

    #[test]
    fn test_category_key() {
        assert_eq!(category_key("Ink:Paint"), "Ink_Paint");
        assert_eq!(category_key("Lens Effects"), "Lens Effects");
    }

    #[test]
    fn test_sort_is_stable() {
        let mut category = CategoryRecord::new("Grain");
        category.textures = vec![record("b", 2), record("a", 1), record("c", 2), record("d", 1)];
        category.sort();
        let order: Vec<_> = category.textures.iter().map(|t| t.filename.as_str()).collect();
        assert_eq!(order, vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_category_mut_keeps_original_name() {
        let mut catalog = Catalog::default();
        let (record, created) = catalog.category_mut("Ink:Paint");
        assert!(created);
        assert_eq!(record.category, "Ink:Paint");

        let (_, created) = catalog.category_mut("Ink:Paint");
        assert!(!created);
        assert_eq!(catalog.textures.keys().collect::<Vec<_>>(), vec!["Ink_Paint"]);
    }

    #[test]
    fn test_colliding_directory_names_share_a_record() {
        let mut catalog = Catalog::default();
        let (category, _) = catalog.category_mut("Ink:Paint");
        category.textures.push(record("a", 1));

        let (category, created) = catalog.category_mut("Ink_Paint");
        assert!(!created);
        assert_eq!(category.category, "Ink:Paint");
        category.textures.push(record("b", 2));

        assert_eq!(catalog.textures.len(), 1);
        assert_eq!(catalog.texture_count(), 2);
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let json = r#"{"textures":{"Grain":{"category":"Grain","textures":[{
            "filename":"g1","title":"G","default_blend_mode":"overlay","sequence_number":1,
            "file_path":"f","thumbnail_path":"t","description":"d","tags":["film"]}]}}}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let texture = &catalog.textures["Grain"].textures[0];
        assert_eq!(texture.extra["tags"], serde_json::json!(["film"]));

        let out = serde_json::to_string(&catalog).unwrap();
        assert!(out.contains(r#""tags":["film"]"#));
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let json = r#"{"textures":{"Grain":{"category":"Grain","textures":[{"filename":"g1"}]}}}"#;
        assert!(serde_json::from_str::<Catalog>(json).is_err());
    }
}
