//! Thumbnail generation
//!
//! Every source image under `<textures>/<category>/` gets a JPEG preview at
//! `<thumbnails>/textures/<category>/<stem>.jpg`, scaled to a fixed width.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};

use crate::cdn::THUMBNAIL_EXTENSION;
use crate::config::{LibraryLayout, ThumbnailSettings};
use crate::error::{Error, Result};
use crate::types::{BatchResult, ItemFailure, Phase, Progress, ProgressCallback};
use crate::utils::{file_name_str, has_image_extension, list_dir};

/// Source image extensions (matched case-insensitively)
pub const SOURCE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Settings for thumbnail generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailOptions {
    /// Output width in pixels
    pub width: u32,
    /// JPEG quality (1-100)
    pub quality: u8,
    /// Leave thumbnails that are newer than their source
    pub skip_existing: bool,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self::from(&ThumbnailSettings::default())
    }
}

impl From<&ThumbnailSettings> for ThumbnailOptions {
    fn from(settings: &ThumbnailSettings) -> Self {
        Self {
            width: settings.width,
            quality: settings.quality,
            skip_existing: false,
        }
    }
}

/// What happened to one source image
#[derive(Debug, Clone, PartialEq, Eq)]
enum ThumbnailOutcome {
    Written,
    UpToDate,
}

/// Output size for an image of `width` x `height` scaled to `target_width`.
///
/// Height keeps the aspect ratio, rounded down, and is never zero.
#[must_use]
pub fn thumbnail_size(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    let target_width = target_width.max(1);
    if width == 0 {
        return (target_width, 1);
    }
    let scaled = u64::from(height) * u64::from(target_width) / u64::from(width);
    (target_width, scaled.clamp(1, u64::from(u32::MAX)) as u32)
}

/// Thumbnail path for a source image of `category`
#[must_use]
pub fn thumbnail_path(layout: &LibraryLayout, category: &str, source: &Path) -> Option<PathBuf> {
    let mut name = source.file_stem()?.to_os_string();
    name.push(".");
    name.push(THUMBNAIL_EXTENSION);
    Some(layout.thumbnail_category_dir(category).join(name))
}

/// Create thumbnails for every category of the library.
///
/// Failing to list a directory or to create an output directory aborts the
/// run. Undecodable images are recorded as failures and skipped.
pub fn generate_thumbnails(
    layout: &LibraryLayout,
    options: &ThumbnailOptions,
    progress: ProgressCallback,
) -> Result<BatchResult> {
    let mut result = BatchResult::default();

    let mut jobs = Vec::new();
    for category_path in list_dir(&layout.textures_dir, Path::is_dir)? {
        let Some(category) = file_name_str(&category_path).map(str::to_string) else {
            result
                .failures
                .push(ItemFailure::new(&category_path, Error::NonUtf8Name(category_path.clone())));
            continue;
        };
        let sources = list_dir(&category_path, |p| {
            p.is_file() && has_image_extension(p, &SOURCE_EXTENSIONS)
        })?;
        if sources.is_empty() {
            continue;
        }

        let out_dir = layout.thumbnail_category_dir(&category);
        std::fs::create_dir_all(&out_dir).map_err(|e| Error::path_io("creating", &out_dir, e))?;
        jobs.extend(sources.into_iter().map(|source| (category.clone(), source)));
    }

    let total = jobs.len();
    tracing::info!("Generating {} thumbnails", total);

    for (i, (category, source)) in jobs.iter().enumerate() {
        let name = file_name_str(source).unwrap_or_default();
        progress(&Progress::with_file(Phase::Thumbnail, i + 1, total, name));

        let Some(dest) = thumbnail_path(layout, category, source) else {
            result
                .failures
                .push(ItemFailure::new(source, Error::InvalidPath(source.display().to_string())));
            continue;
        };

        match thumbnail_one(source, &dest, options) {
            Ok(ThumbnailOutcome::Written) => {
                tracing::debug!("{} -> {}", source.display(), dest.display());
                result.success_count += 1;
            }
            Ok(ThumbnailOutcome::UpToDate) => result.skip_count += 1,
            Err(e) => {
                tracing::warn!("Thumbnail failed for {}: {}", source.display(), e);
                result.failures.push(ItemFailure::new(source, e));
            }
        }
    }

    progress(&Progress::new(Phase::Complete, total, total));
    Ok(result)
}

fn thumbnail_one(source: &Path, dest: &Path, options: &ThumbnailOptions) -> Result<ThumbnailOutcome> {
    if options.skip_existing && is_up_to_date(source, dest) {
        return Ok(ThumbnailOutcome::UpToDate);
    }
    let bytes = render_thumbnail(source, options.width, options.quality)?;
    std::fs::write(dest, bytes).map_err(|e| Error::path_io("writing", dest, e))?;
    Ok(ThumbnailOutcome::Written)
}

/// Decode `source`, scale it to `width` and encode it as JPEG.
pub fn render_thumbnail(source: &Path, width: u32, quality: u8) -> Result<Vec<u8>> {
    let image_err = |source_err| Error::Image {
        path: source.to_path_buf(),
        source: source_err,
    };

    let rgb = image::open(source).map_err(image_err)?.to_rgb8();
    let (w, h) = thumbnail_size(rgb.width(), rgb.height(), width);
    let resized = imageops::resize(&rgb, w, h, FilterType::Lanczos3);

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100));
    resized.write_with_encoder(encoder).map_err(image_err)?;
    Ok(jpeg)
}

fn is_up_to_date(source: &Path, dest: &Path) -> bool {
    let modified = |p: &Path| -> Option<SystemTime> { std::fs::metadata(p).ok()?.modified().ok() };
    match (modified(source), modified(dest)) {
        (Some(src), Some(out)) => out >= src,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::fs;

    fn library() -> (tempfile::TempDir, LibraryLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = LibraryLayout::new(dir.path());
        fs::create_dir_all(&layout.textures_dir).unwrap();
        (dir, layout)
    }

    fn write_rgb(path: &Path, width: u32, height: u32) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(width, height, Rgb([120, 80, 40])).save(path).unwrap();
    }

    #[test]
    fn test_thumbnail_size() {
        assert_eq!(thumbnail_size(1600, 900, 800), (800, 450));
        assert_eq!(thumbnail_size(3000, 1999, 800), (800, 533));
        assert_eq!(thumbnail_size(400, 300, 800), (800, 600));
        assert_eq!(thumbnail_size(10_000, 1, 800), (800, 1));
    }

    #[test]
    fn test_generates_scaled_jpegs() {
        let (_dir, layout) = library();
        write_rgb(&layout.textures_dir.join("Grain/g1.jpg"), 1600, 900);
        write_rgb(&layout.textures_dir.join("Grain/g2.PNG"), 1000, 1000);
        fs::write(layout.textures_dir.join("Grain/readme.txt"), "x").unwrap();

        let result = generate_thumbnails(&layout, &ThumbnailOptions::default(), &|_| {}).unwrap();
        assert_eq!(result.success_count, 2);
        assert_eq!(result.fail_count(), 0);

        let out = layout.thumbnail_category_dir("Grain");
        assert_eq!(image::image_dimensions(out.join("g1.jpg")).unwrap(), (800, 450));
        assert_eq!(image::image_dimensions(out.join("g2.jpg")).unwrap(), (800, 800));
        assert_eq!(
            image::ImageFormat::from_path(out.join("g2.jpg")).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_alpha_sources_are_flattened() {
        let (_dir, layout) = library();
        let path = layout.textures_dir.join("Lens Effects/flare.png");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(200, 100, Rgba([255, 0, 0, 128])).save(&path).unwrap();

        let bytes = render_thumbnail(&path, 50, 60).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (50, 25));
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_broken_image_is_a_failure_not_an_abort() {
        let (_dir, layout) = library();
        write_rgb(&layout.textures_dir.join("Grain/good.jpg"), 100, 100);
        fs::write(layout.textures_dir.join("Grain/bad.jpg"), b"not a jpeg").unwrap();

        let options = ThumbnailOptions {
            width: 10,
            ..ThumbnailOptions::default()
        };
        let result = generate_thumbnails(&layout, &options, &|_| {}).unwrap();
        assert_eq!(result.success_count, 1);
        assert_eq!(result.fail_count(), 1);
        assert!(result.failures[0].path.ends_with("bad.jpg"));
    }

    #[test]
    fn test_skip_existing() {
        let (_dir, layout) = library();
        write_rgb(&layout.textures_dir.join("Grain/g1.jpg"), 100, 100);
        let options = ThumbnailOptions {
            width: 10,
            quality: 60,
            skip_existing: true,
        };

        let first = generate_thumbnails(&layout, &options, &|_| {}).unwrap();
        assert_eq!(first.success_count, 1);

        let second = generate_thumbnails(&layout, &options, &|_| {}).unwrap();
        assert_eq!(second.success_count, 0);
        assert_eq!(second.skip_count, 1);
    }

    #[test]
    fn test_empty_category_creates_no_directory() {
        let (_dir, layout) = library();
        fs::create_dir_all(layout.textures_dir.join("Empty")).unwrap();
        let result = generate_thumbnails(&layout, &ThumbnailOptions::default(), &|_| {}).unwrap();
        assert_eq!(result.success_count, 0);
        assert!(!layout.thumbnail_category_dir("Empty").exists());
    }

    #[test]
    fn test_missing_texture_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let layout = LibraryLayout::new(dir.path());
        assert!(generate_thumbnails(&layout, &ThumbnailOptions::default(), &|_| {}).is_err());
    }
}
