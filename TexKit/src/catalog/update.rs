//! Incremental catalog update
//!
//! Scans each category directory for `.jpg` files the catalog does not know
//! yet, builds records for them, and re-sorts the category. Existing records
//! are never modified or removed.

use std::collections::HashSet;
use std::path::Path;

use super::store::{LoadOutcome, load_catalog, save_catalog};
use super::types::{Catalog, TextureRecord};
use crate::cdn::CdnPathBuilder;
use crate::config::LibraryLayout;
use crate::enrich::MetadataOverrides;
use crate::error::{Error, Result};
use crate::naming::parse_filename;
use crate::types::{ItemFailure, Phase, Progress, ProgressCallback};
use crate::utils::{file_name_str, list_dir};

/// Extension of source images the catalog tracks (matched case-sensitively)
pub const CATALOG_EXTENSION: &str = "jpg";

/// Settings for a catalog update
#[derive(Debug, Clone, Default)]
pub struct CatalogOptions {
    /// URL builder for `file_path` / `thumbnail_path`
    pub cdn: CdnPathBuilder,
    /// Hand-written titles and descriptions
    pub overrides: MetadataOverrides,
    /// Compute everything but do not write the catalog
    pub dry_run: bool,
}

/// Counters from merging a directory tree into a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Category directories visited
    pub categories_seen: usize,
    /// Category records created by this run
    pub categories_created: usize,
    /// Texture records added by this run
    pub textures_added: usize,
    /// Images skipped because the catalog already has them
    pub textures_existing: usize,
    /// Items that could not be processed
    pub failures: Vec<ItemFailure>,
}

/// Summary of a full catalog update
#[derive(Debug, Clone)]
pub struct UpdateReport {
    /// How the previous catalog was obtained
    pub load_outcome: LoadOutcome,
    /// What the merge did
    pub stats: MergeStats,
    /// Whether the catalog file was written
    pub written: bool,
    /// The merged catalog
    pub catalog: Catalog,
}

/// Load, merge and save the catalog of the library at `layout`.
///
/// Unreadable catalog content is discarded with a warning. Failing to list
/// a directory or to write the result aborts the update; the previous
/// catalog file is then left as it was.
pub fn update_catalog(
    layout: &LibraryLayout,
    options: &CatalogOptions,
    progress: ProgressCallback,
) -> Result<UpdateReport> {
    progress(&Progress::with_file(
        Phase::LoadingCatalog,
        0,
        1,
        layout.catalog_path.display().to_string(),
    ));
    let (mut catalog, load_outcome) = load_catalog(&layout.catalog_path)?;

    let stats = merge_catalog(&mut catalog, layout, options, progress)?;

    let written = if options.dry_run {
        tracing::info!("Dry run, not writing {}", layout.catalog_path.display());
        false
    } else {
        progress(&Progress::with_file(
            Phase::WritingCatalog,
            0,
            1,
            layout.catalog_path.display().to_string(),
        ));
        save_catalog(&catalog, &layout.catalog_path)?;
        true
    };

    progress(&Progress::new(Phase::Complete, 1, 1));
    Ok(UpdateReport {
        load_outcome,
        stats,
        written,
        catalog,
    })
}

/// Add records for every uncatalogued image under the texture directory.
pub fn merge_catalog(
    catalog: &mut Catalog,
    layout: &LibraryLayout,
    options: &CatalogOptions,
    progress: ProgressCallback,
) -> Result<MergeStats> {
    let mut stats = MergeStats::default();
    let categories = list_dir(&layout.textures_dir, Path::is_dir)?;
    let total = categories.len();

    for (i, category_path) in categories.iter().enumerate() {
        let Some(category_name) = file_name_str(category_path) else {
            tracing::warn!("Skipping category with non-UTF-8 name: {}", category_path.display());
            stats
                .failures
                .push(ItemFailure::new(category_path, Error::NonUtf8Name(category_path.clone())));
            continue;
        };
        stats.categories_seen += 1;
        progress(&Progress::with_file(Phase::ScanningCategory, i + 1, total, category_name));

        let (record, created) = catalog.category_mut(category_name);
        if created {
            tracing::info!("New category: {}", category_name);
            stats.categories_created += 1;
        }

        let known: HashSet<String> = record.filenames().into_iter().map(str::to_string).collect();
        let images = list_dir(category_path, is_catalog_image)?;
        let mut added = 0;
        for image in &images {
            let stem = image.file_stem().and_then(|s| s.to_str());
            if stem.is_some_and(|s| known.contains(s)) {
                stats.textures_existing += 1;
                continue;
            }

            match build_record(layout, category_name, image, options) {
                Ok(texture) => {
                    progress(&Progress::with_file(
                        Phase::AddingTexture,
                        i + 1,
                        total,
                        texture.filename.clone(),
                    ));
                    tracing::info!("Added {}/{}", category_name, texture.filename);
                    record.textures.push(texture);
                    added += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", image.display(), e);
                    stats.failures.push(ItemFailure::new(image, e));
                }
            }
        }

        record.sort();
        stats.textures_added += added;
        tracing::debug!(
            "{}: {} added, {} total",
            category_name,
            added,
            record.textures.len()
        );
    }

    Ok(stats)
}

/// Build the catalog record for one image.
///
/// `filename` is always the file stem. Title and description come from the
/// override table when it has an entry; otherwise the title is the stem and
/// the description is generated. The parser only supplies blend mode and
/// sequence number.
pub fn build_record(
    layout: &LibraryLayout,
    category: &str,
    image: &Path,
    options: &CatalogOptions,
) -> Result<TextureRecord> {
    let stem = image
        .file_stem()
        .ok_or_else(|| Error::InvalidPath(format!("no file name: {}", image.display())))?
        .to_str()
        .ok_or_else(|| Error::NonUtf8Name(image.to_path_buf()))?;
    let relative = image.strip_prefix(&layout.root).map_err(|_| {
        Error::InvalidPath(format!(
            "{} is outside the library root {}",
            image.display(),
            layout.root.display()
        ))
    })?;

    let parsed = parse_filename(stem);
    let enrichment = options.overrides.lookup(category, stem);
    Ok(TextureRecord {
        filename: stem.to_string(),
        title: enrichment.title,
        default_blend_mode: parsed.default_blend_mode,
        sequence_number: parsed.sequence_number,
        file_path: options.cdn.file_url(relative)?,
        thumbnail_path: options.cdn.thumbnail_url(category, stem),
        description: enrichment.description,
        extra: indexmap::IndexMap::new(),
    })
}

/// Whether `path` is a visible regular file with the catalog extension
fn is_catalog_image(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(CATALOG_EXTENSION)
}
