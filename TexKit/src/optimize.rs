//! Oversized image optimization
//!
//! Source images above a size ceiling are re-encoded in place. JPEGs step
//! their quality down until the file fits; PNGs get a single pass with the
//! strongest compression. The original is only replaced once a smaller
//! encoding has been written in full next to it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use walkdir::WalkDir;

use crate::config::{OptimizeSettings, mb_to_bytes};
use crate::error::{Error, Result};
use crate::naming::is_hidden;
use crate::thumbnails::SOURCE_EXTENSIONS;
use crate::types::{BatchResult, ItemFailure, Phase, Progress, ProgressCallback};
use crate::utils::{file_name_str, has_image_extension};

/// First JPEG quality tried
pub const START_QUALITY: u8 = 95;
/// Quality decrement between attempts
pub const QUALITY_STEP: u8 = 5;
/// Attempts stop once quality would drop to this value
pub const QUALITY_FLOOR: u8 = 5;

/// Suffix of the scratch file written next to the image
const TEMP_SUFFIX: &str = ".temp";

/// Settings for the optimizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeOptions {
    /// Files larger than this are re-encoded
    pub max_size_bytes: u64,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self::from(&OptimizeSettings::default())
    }
}

impl From<&OptimizeSettings> for OptimizeOptions {
    fn from(settings: &OptimizeSettings) -> Self {
        Self {
            max_size_bytes: settings.max_size_bytes(),
        }
    }
}

impl OptimizeOptions {
    /// Ceiling given in megabytes
    #[must_use]
    pub fn with_max_size_mb(mb: f64) -> Self {
        Self {
            max_size_bytes: mb_to_bytes(mb),
        }
    }
}

/// Result of optimizing a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeOutcome {
    /// Already at or under the ceiling
    Skipped { size: u64 },
    /// Replaced by a smaller encoding; `quality` is set for JPEGs
    Optimized { quality: Option<u8>, new_size: u64 },
    /// No encoding fit; the original was kept
    TooLarge { size: u64 },
}

/// JPEG qualities tried, best first: 95, 90, ... 10
pub fn jpeg_qualities() -> impl Iterator<Item = u8> {
    (QUALITY_FLOOR + 1..=START_QUALITY)
        .rev()
        .step_by(usize::from(QUALITY_STEP))
}

/// Optimize every oversized image below `root`, recursively.
///
/// Files that cannot fit are reported as warnings. Files that cannot be
/// decoded or written are reported as failures. Neither stops the walk.
pub fn optimize_library(
    root: &Path,
    options: &OptimizeOptions,
    progress: ProgressCallback,
) -> Result<BatchResult> {
    let files = find_images(root)?;
    let total = files.len();
    tracing::info!(
        "Checking {} images against {:.2} MB",
        total,
        options.max_size_bytes as f64 / (1024.0 * 1024.0)
    );

    let mut result = BatchResult::default();
    for (i, path) in files.iter().enumerate() {
        progress(&Progress::with_file(
            Phase::Optimizing,
            i + 1,
            total,
            file_name_str(path).unwrap_or_default(),
        ));

        match optimize_file(path, options) {
            Ok(OptimizeOutcome::Skipped { .. }) => result.skip_count += 1,
            Ok(OptimizeOutcome::Optimized { .. }) => result.success_count += 1,
            Ok(OptimizeOutcome::TooLarge { size }) => {
                result.warnings.push(ItemFailure::new(
                    path,
                    format!("still {size} bytes at the lowest setting"),
                ));
            }
            Err(e) => {
                tracing::warn!("Failed to optimize {}: {}", path.display(), e);
                result.failures.push(ItemFailure::new(path, e));
            }
        }
    }

    progress(&Progress::new(Phase::Complete, total, total));
    Ok(result)
}

/// Bring one image under the size ceiling if it is above it.
pub fn optimize_file(path: &Path, options: &OptimizeOptions) -> Result<OptimizeOutcome> {
    let size = file_size(path)?;
    if size <= options.max_size_bytes {
        tracing::debug!("{} is {} bytes, under the ceiling", path.display(), size);
        return Ok(OptimizeOutcome::Skipped { size });
    }

    tracing::info!("Optimizing {} ({} bytes)", path.display(), size);
    let format = ImageFormat::from_path(path).map_err(|e| image_error(path, e))?;
    let image = image::open(path).map_err(|e| image_error(path, e))?;
    let temp = temp_path(path);

    let outcome = match format {
        ImageFormat::Png => {
            let new_size = encode_to(&temp, path, |w| {
                let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, FilterType::Adaptive);
                image.write_with_encoder(encoder)
            })?;
            if new_size <= options.max_size_bytes {
                Some(OptimizeOutcome::Optimized {
                    quality: None,
                    new_size,
                })
            } else {
                None
            }
        }
        _ => {
            let image = jpeg_compatible(image);
            let mut fitted = None;
            for quality in jpeg_qualities() {
                let new_size = encode_to(&temp, path, |w| {
                    image.write_with_encoder(JpegEncoder::new_with_quality(w, quality))
                })?;
                tracing::debug!("{}: quality {} -> {} bytes", path.display(), quality, new_size);
                if new_size <= options.max_size_bytes {
                    fitted = Some(OptimizeOutcome::Optimized {
                        quality: Some(quality),
                        new_size,
                    });
                    break;
                }
            }
            fitted
        }
    };

    match outcome {
        Some(outcome) => {
            std::fs::rename(&temp, path).map_err(|e| {
                remove_quietly(&temp);
                Error::path_io("replacing", path, e)
            })?;
            tracing::info!("Optimized {}: {:?}", path.display(), outcome);
            Ok(outcome)
        }
        None => {
            remove_quietly(&temp);
            tracing::warn!(
                "Could not bring {} under {} bytes",
                path.display(),
                options.max_size_bytes
            );
            Ok(OptimizeOutcome::TooLarge { size })
        }
    }
}

/// Visible source images below `root`, in path order
fn find_images(root: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_str().is_some_and(is_hidden));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && has_image_extension(entry.path(), &SOURCE_EXTENSIONS) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Encode into `temp` and return the resulting size. `temp` is removed on error.
fn encode_to<F>(temp: &Path, source: &Path, encode: F) -> Result<u64>
where
    F: FnOnce(&mut BufWriter<File>) -> image::ImageResult<()>,
{
    let written = write_encoded(temp, source, encode);
    if written.is_err() {
        remove_quietly(temp);
    }
    written
}

fn write_encoded<F>(temp: &Path, source: &Path, encode: F) -> Result<u64>
where
    F: FnOnce(&mut BufWriter<File>) -> image::ImageResult<()>,
{
    let file = File::create(temp).map_err(|e| Error::path_io("creating", temp, e))?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer).map_err(|e| image_error(source, e))?;
    writer.flush().map_err(|e| Error::path_io("writing", temp, e))?;
    drop(writer);
    file_size(temp)
}

/// JPEG has no alpha channel and no 16-bit samples
fn jpeg_compatible(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => {
            DynamicImage::ImageLuma8(image.to_luma8())
        }
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

fn file_size(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)
        .map_err(|e| Error::path_io("reading metadata of", path, e))?
        .len())
}

fn image_error(path: &Path, source: image::ImageError) -> Error {
    Error::Image {
        path: path.to_path_buf(),
        source,
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use pretty_assertions::assert_eq;
    use std::fs;

    /// Deterministic noise compresses badly, which keeps sizes predictable
    fn noise(width: u32, height: u32) -> RgbImage {
        let mut state: u32 = 0x1234_5678;
        RgbImage::from_fn(width, height, |_, _| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let [a, b, c, _] = state.to_le_bytes();
            Rgb([a, b, c])
        })
    }

    fn write_jpeg(path: &Path, quality: u8) -> u64 {
        let mut bytes = Vec::new();
        noise(256, 256)
            .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))
            .unwrap();
        fs::write(path, &bytes).unwrap();
        bytes.len() as u64
    }

    fn no_temp_files(dir: &Path) -> bool {
        fs::read_dir(dir)
            .unwrap()
            .all(|e| !e.unwrap().file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
    }

    #[test]
    fn test_quality_schedule() {
        let qualities: Vec<_> = jpeg_qualities().collect();
        assert_eq!(qualities.first(), Some(&95));
        assert_eq!(qualities.last(), Some(&10));
        assert_eq!(qualities.len(), 18);
    }

    #[test]
    fn test_small_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        let size = write_jpeg(&path, 90);

        let outcome = optimize_file(&path, &OptimizeOptions::default()).unwrap();
        assert_eq!(outcome, OptimizeOutcome::Skipped { size });
    }

    #[test]
    fn test_large_jpeg_is_reencoded_under_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        let original = write_jpeg(&path, 100);
        let options = OptimizeOptions {
            max_size_bytes: original / 2,
        };

        let outcome = optimize_file(&path, &options).unwrap();
        let OptimizeOutcome::Optimized { quality, new_size } = outcome else {
            panic!("expected Optimized, got {outcome:?}");
        };
        assert!(quality.is_some_and(|q| q <= START_QUALITY));
        assert!(new_size <= options.max_size_bytes);
        assert_eq!(fs::metadata(&path).unwrap().len(), new_size);
        assert!(image::open(&path).is_ok());
        assert!(no_temp_files(dir.path()));
    }

    #[test]
    fn test_unreachable_ceiling_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        write_jpeg(&path, 100);
        let before = fs::read(&path).unwrap();

        let outcome = optimize_file(&path, &OptimizeOptions { max_size_bytes: 100 }).unwrap();
        assert!(matches!(outcome, OptimizeOutcome::TooLarge { .. }));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(no_temp_files(dir.path()));
    }

    #[test]
    fn test_png_unreachable_ceiling_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        noise(128, 128).save(&path).unwrap();
        let before = fs::read(&path).unwrap();

        let outcome = optimize_file(&path, &OptimizeOptions { max_size_bytes: 100 }).unwrap();
        assert!(matches!(outcome, OptimizeOutcome::TooLarge { .. }));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(no_temp_files(dir.path()));
    }

    #[test]
    fn test_library_walk_collects_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Grain").join("extra");
        fs::create_dir_all(&nested).unwrap();
        write_jpeg(&dir.path().join("Grain").join("a.jpg"), 100);
        write_jpeg(&nested.join("b.JPEG"), 100);
        fs::write(nested.join("broken.png"), b"not a png, but long enough to be over the ceiling").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir_all(dir.path().join(".cache")).unwrap();
        write_jpeg(&dir.path().join(".cache").join("c.jpg"), 100);

        let options = OptimizeOptions { max_size_bytes: 10 };
        let result = optimize_library(dir.path(), &options, &|_| {}).unwrap();

        assert_eq!(result.success_count, 0);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.fail_count(), 1);
        assert!(result.failures[0].path.ends_with("broken.png"));
    }

    #[test]
    fn test_temp_path_appends_suffix() {
        assert_eq!(temp_path(Path::new("/t/a.jpg")), Path::new("/t/a.jpg.temp"));
    }
}
