//! # TexKit
//!
//! Maintenance tools for a texture library published through a CDN.
//!
//! A library is a directory with one subdirectory per texture category:
//!
//! ```text
//! <root>/
//!   texkit.toml               optional configuration
//!   texture_metadata.json     the catalog
//!   textures/<Category>/*.jpg full-size textures
//!   thumbnails/textures/<Category>/*.jpg
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use texkit::prelude::*;
//!
//! let root = std::path::Path::new("texture-assets");
//! let config = TexKitConfig::load(root, None)?;
//! let layout = config.layout(root);
//!
//! let options = CatalogOptions {
//!     cdn: config.cdn(),
//!     overrides: config.overrides(root)?,
//!     dry_run: false,
//! };
//! let report = update_catalog(&layout, &options, &|_| {})?;
//! println!("Added {} textures", report.stats.textures_added);
//! # Ok::<(), texkit::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `texkit` command-line binary

pub mod catalog;
pub mod cdn;
pub mod config;
pub mod enrich;
pub mod error;
pub mod naming;
pub mod optimize;
pub mod thumbnails;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{BatchResult, ItemFailure, Phase, Progress, ProgressCallback};

    pub use crate::config::{LibraryLayout, TexKitConfig};
    pub use crate::cdn::CdnPathBuilder;
    pub use crate::enrich::{Enrichment, MetadataOverrides, TextOverride};
    pub use crate::naming::{ParsedName, parse_filename, safe_name};

    // Catalog
    pub use crate::catalog::{
        Catalog, CatalogOptions, CategoryRecord, LoadOutcome, TextureRecord, UpdateReport,
        load_catalog, save_catalog, update_catalog,
    };

    // Image batches
    pub use crate::optimize::{OptimizeOptions, OptimizeOutcome, optimize_file, optimize_library};
    pub use crate::thumbnails::{ThumbnailOptions, generate_thumbnails};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
