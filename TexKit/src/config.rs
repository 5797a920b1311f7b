//! Library configuration (`texkit.toml`)
//!
//! Every field has a default, so the file is optional and may be partial.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cdn::{CdnPathBuilder, DEFAULT_CDN_BASE};
use crate::enrich::MetadataOverrides;
use crate::error::{Error, Result};
use crate::naming::default_replacements;

/// Config file looked up in the library root
pub const CONFIG_FILE_NAME: &str = "texkit.toml";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn default_textures_dir() -> String {
    "textures".to_string()
}

fn default_thumbnails_dir() -> String {
    "thumbnails".to_string()
}

fn default_catalog_file() -> String {
    "texture_metadata.json".to_string()
}

fn default_cdn_base() -> String {
    DEFAULT_CDN_BASE.to_string()
}

fn default_thumbnail_width() -> u32 {
    800
}

fn default_thumbnail_quality() -> u8 {
    60
}

fn default_max_size_mb() -> f64 {
    19.0
}

/// The full configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TexKitConfig {
    #[serde(default)]
    pub library: LibrarySettings,
    #[serde(default)]
    pub cdn: CdnSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub thumbnails: ThumbnailSettings,
    #[serde(default)]
    pub optimize: OptimizeSettings,
    #[serde(default)]
    pub rename: RenameSettings,
}

/// Directory layout, relative to the library root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySettings {
    #[serde(default = "default_textures_dir")]
    pub textures_dir: String,
    #[serde(default = "default_thumbnails_dir")]
    pub thumbnails_dir: String,
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            textures_dir: default_textures_dir(),
            thumbnails_dir: default_thumbnails_dir(),
            catalog_file: default_catalog_file(),
        }
    }
}

/// Distribution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdnSettings {
    #[serde(default = "default_cdn_base")]
    pub base_url: String,
}

impl Default for CdnSettings {
    fn default() -> Self {
        Self {
            base_url: default_cdn_base(),
        }
    }
}

/// Catalog settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Extra override table layered over the bundled one (relative to the root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<String>,
}

/// Thumbnail settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSettings {
    #[serde(default = "default_thumbnail_width")]
    pub width: u32,
    #[serde(default = "default_thumbnail_quality")]
    pub quality: u8,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            width: default_thumbnail_width(),
            quality: default_thumbnail_quality(),
        }
    }
}

/// Optimizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeSettings {
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: f64,
}

impl Default for OptimizeSettings {
    fn default() -> Self {
        Self {
            max_size_mb: default_max_size_mb(),
        }
    }
}

impl OptimizeSettings {
    /// The size ceiling in bytes
    #[must_use]
    pub fn max_size_bytes(&self) -> u64 {
        mb_to_bytes(self.max_size_mb)
    }
}

/// Renaming settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameSettings {
    /// Literal `[from, to]` replacements applied before spaces become hyphens
    #[serde(default = "default_replacements")]
    pub replacements: Vec<(String, String)>,
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            replacements: default_replacements(),
        }
    }
}

/// Convert megabytes (MiB) to bytes; negative values clamp to zero
#[must_use]
pub fn mb_to_bytes(mb: f64) -> u64 {
    (mb.max(0.0) * BYTES_PER_MB) as u64
}

impl TexKitConfig {
    /// Load the configuration for a library.
    ///
    /// With `explicit` set, that file must exist. Otherwise `texkit.toml` in
    /// `root` is used when present, and defaults when it is not.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = root.join(CONFIG_FILE_NAME);
                if !candidate.is_file() {
                    tracing::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let src = std::fs::read_to_string(&path).map_err(|e| Error::path_io("reading", &path, e))?;
        let config = Self::from_toml_str(&src).map_err(|e| Error::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve the on-disk layout of the library at `root`
    #[must_use]
    pub fn layout(&self, root: &Path) -> LibraryLayout {
        LibraryLayout {
            root: root.to_path_buf(),
            textures_dir: root.join(&self.library.textures_dir),
            thumbnails_dir: root.join(&self.library.thumbnails_dir),
            catalog_path: root.join(&self.library.catalog_file),
        }
    }

    /// URL builder for the configured CDN
    #[must_use]
    pub fn cdn(&self) -> CdnPathBuilder {
        CdnPathBuilder::new(self.cdn.base_url.clone())
    }

    /// The bundled override table plus the configured override file, if any
    pub fn overrides(&self, root: &Path) -> Result<MetadataOverrides> {
        let mut table = MetadataOverrides::bundled();
        if let Some(file) = &self.catalog.overrides {
            table.extend(MetadataOverrides::load(&root.join(file))?);
        }
        Ok(table)
    }
}

/// Resolved paths of a texture library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLayout {
    /// Library root; CDN paths are relative to it
    pub root: PathBuf,
    /// One subdirectory per category
    pub textures_dir: PathBuf,
    /// Thumbnail tree root (`<thumbnails_dir>/textures/<category>/`)
    pub thumbnails_dir: PathBuf,
    /// The JSON catalog
    pub catalog_path: PathBuf,
}

impl LibraryLayout {
    /// Layout with default directory names
    pub fn new(root: impl AsRef<Path>) -> Self {
        TexKitConfig::default().layout(root.as_ref())
    }

    /// Directory holding the thumbnails of one category
    #[must_use]
    pub fn thumbnail_category_dir(&self, category: &str) -> PathBuf {
        self.thumbnails_dir.join("textures").join(category)
    }
}
