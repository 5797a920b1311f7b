//! CDN URL construction
//!
//! The CDN serves straight from the repository tree. Directory segments may
//! contain spaces on disk but are published hyphenated; the file name segment
//! is percent-encoded instead.

use std::path::{Component, Path};

use crate::error::{Error, Result};

/// Base URL of the jsDelivr mirror of the texture repository
pub const DEFAULT_CDN_BASE: &str = "https://cdn.jsdelivr.net/gh/Ryan-Stevens/texture-assets@main";

/// Directory (relative to the library root) holding texture thumbnails
pub const THUMBNAIL_PREFIX: [&str; 2] = ["thumbnails", "textures"];

/// Thumbnail file extension; thumbnails are always JPEG
pub const THUMBNAIL_EXTENSION: &str = "jpg";

/// Builds public URLs for textures and their thumbnails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnPathBuilder {
    base_url: String,
}

impl Default for CdnPathBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CDN_BASE)
    }
}

impl CdnPathBuilder {
    /// Create a builder for `base_url`. A trailing `/` is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// The normalized base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a texture given its path relative to the library root.
    ///
    /// # Example
    /// ```
    /// use std::path::Path;
    /// use texkit::cdn::CdnPathBuilder;
    ///
    /// let cdn = CdnPathBuilder::new("https://cdn.example.com/lib");
    /// let url = cdn.file_url(Path::new("textures/Lens Effects/flare 1.jpg")).unwrap();
    /// assert_eq!(url, "https://cdn.example.com/lib/textures/Lens-Effects/flare%201.jpg");
    /// ```
    pub fn file_url(&self, relative_path: &Path) -> Result<String> {
        let mut segments = Vec::new();
        for component in relative_path.components() {
            match component {
                Component::Normal(part) => segments.push(
                    part.to_str()
                        .ok_or_else(|| Error::NonUtf8Name(relative_path.to_path_buf()))?,
                ),
                Component::CurDir => {}
                _ => {
                    return Err(Error::InvalidPath(format!(
                        "expected a path relative to the library root, got {}",
                        relative_path.display()
                    )));
                }
            }
        }
        if segments.is_empty() {
            return Err(Error::InvalidPath("empty texture path".to_string()));
        }
        Ok(self.join(&segments))
    }

    /// URL of the thumbnail for texture `stem` in `category_dir`.
    ///
    /// The thumbnail is assumed to exist at
    /// `thumbnails/textures/<category_dir>/<stem>.jpg`; this is not checked.
    #[must_use]
    pub fn thumbnail_url(&self, category_dir: &str, stem: &str) -> String {
        let file_name = format!("{stem}.{THUMBNAIL_EXTENSION}");
        let segments = [
            THUMBNAIL_PREFIX[0],
            THUMBNAIL_PREFIX[1],
            category_dir,
            file_name.as_str(),
        ];
        self.join(&segments)
    }

    fn join(&self, segments: &[&str]) -> String {
        format!("{}/{}", self.base_url, encode_segments(segments))
    }
}

/// Hyphenate every segment but the last; percent-encode the last.
fn encode_segments(segments: &[&str]) -> String {
    let last = segments.len().saturating_sub(1);
    segments
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i < last {
                part.replace(' ', "-")
            } else {
                urlencoding::encode(part).into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
