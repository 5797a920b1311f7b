//! Texture metadata catalog (`texture_metadata.json`)
//!
//! The catalog maps each category directory to the textures it contains,
//! with CDN URLs and display text. Updates are incremental: images already
//! recorded are left alone, new ones are appended, and every category is
//! kept sorted by sequence number.

pub mod store;
pub mod types;
pub mod update;

pub use store::{LoadOutcome, load_catalog, render_catalog, save_catalog};
pub use types::{Catalog, CategoryRecord, TextureRecord, category_key};
pub use update::{CatalogOptions, MergeStats, UpdateReport, build_record, merge_catalog, update_catalog};
