//! Catalog persistence
//!
//! The catalog is read whole and written whole. Writes go to a temp file in
//! the destination directory which is then renamed over the old catalog, so
//! readers see either the previous document or the new one.

use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::types::Catalog;
use crate::error::{Error, Result};

/// How the existing catalog was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Parsed from disk
    Loaded,
    /// No file; starting fresh
    Missing,
    /// Zero-length or whitespace-only file; starting fresh
    Empty,
    /// File could not be parsed as a catalog; starting fresh
    Recovered(String),
}

impl LoadOutcome {
    /// Whether an unusable catalog was discarded
    #[must_use]
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

/// Load the catalog at `path`.
///
/// A missing, empty, or malformed file yields an empty catalog; only the
/// malformed case is logged as a warning. Any other read failure is returned.
pub fn load_catalog(path: &Path) -> Result<(Catalog, LoadOutcome)> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No catalog at {}, starting fresh", path.display());
            return Ok((Catalog::default(), LoadOutcome::Missing));
        }
        Err(e) => return Err(Error::path_io("reading", path, e)),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        tracing::debug!("Catalog {} is empty, starting fresh", path.display());
        return Ok((Catalog::default(), LoadOutcome::Empty));
    }

    match serde_json::from_slice::<Catalog>(&bytes) {
        Ok(catalog) => Ok((catalog, LoadOutcome::Loaded)),
        Err(e) => {
            tracing::warn!(
                "Invalid catalog in {} ({}), starting fresh",
                path.display(),
                e
            );
            Ok((Catalog::default(), LoadOutcome::Recovered(e.to_string())))
        }
    }
}

/// Render the catalog exactly as [`save_catalog`] writes it
pub fn render_catalog(catalog: &Catalog) -> Result<String> {
    let mut json = serde_json::to_string_pretty(catalog)?;
    json.push('\n');
    Ok(json)
}

/// Write the catalog to `path`, replacing any previous file in one step.
///
/// On failure the previous file, if any, is left untouched.
pub fn save_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    let json = render_catalog(catalog)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::path_io("creating temp file in", dir, e))?;
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Error::path_io("writing", tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        message: e.error.to_string(),
    })?;

    tracing::debug!("Wrote catalog to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::CategoryRecord;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture_metadata.json");

        let (catalog, outcome) = load_catalog(&path).unwrap();
        assert_eq!(outcome, LoadOutcome::Missing);
        assert!(catalog.textures.is_empty());

        fs::write(&path, "").unwrap();
        assert_eq!(load_catalog(&path).unwrap().1, LoadOutcome::Empty);
    }

    #[test]
    fn test_truncated_file_is_recovered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture_metadata.json");
        fs::write(&path, r#"{"textures": {"Grain": {"category": "Gr"#).unwrap();

        let (catalog, outcome) = load_catalog(&path).unwrap();
        assert!(outcome.is_recovered());
        assert_eq!(catalog, Catalog::default());
    }

    #[test]
    fn test_wrong_schema_is_recovered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture_metadata.json");
        fs::write(&path, r#"{"textures": []}"#).unwrap();
        assert!(load_catalog(&path).unwrap().1.is_recovered());
    }

    #[test]
    fn test_save_uses_two_space_indent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture_metadata.json");
        fs::write(&path, "old").unwrap();

        let mut catalog = Catalog::default();
        catalog
            .textures
            .insert("Grain".to_string(), CategoryRecord::new("Grain"));
        save_catalog(&catalog, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"textures\": {\n    \"Grain\": {\n      \"category\": \"Grain\",\n      \"textures\": []\n    }\n  }\n}\n"
        );
        assert_eq!(load_catalog(&path).unwrap(), (catalog, LoadOutcome::Loaded));

        // No temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_into_missing_directory_fails_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("texture_metadata.json");
        assert!(save_catalog(&Catalog::default(), &path).is_err());
        assert!(!path.exists());
    }
}
