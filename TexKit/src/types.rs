//! Shared progress and batch-result types

use std::path::PathBuf;

/// Progress callback type for library operations
pub type ProgressCallback<'a> = &'a dyn Fn(&Progress);

/// Progress information during a library operation
#[derive(Debug, Clone)]
pub struct Progress {
    /// Current operation phase
    pub phase: Phase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file or category being processed (if applicable)
    pub current_file: Option<String>,
}

impl Progress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: Phase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file/item name
    #[must_use]
    pub fn with_file(phase: Phase, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of a library operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reading the existing catalog
    LoadingCatalog,
    /// Entering a category directory
    ScanningCategory,
    /// Adding a texture record
    AddingTexture,
    /// Writing the catalog back to disk
    WritingCatalog,
    /// Resizing a source image into a thumbnail
    Thumbnail,
    /// Re-encoding an oversized image
    Optimizing,
    /// Renaming a file or directory
    Renaming,
    /// Operation complete
    Complete,
}

impl Phase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadingCatalog => "Loading catalog",
            Self::ScanningCategory => "Scanning category",
            Self::AddingTexture => "Adding texture",
            Self::WritingCatalog => "Writing catalog",
            Self::Thumbnail => "Creating thumbnail",
            Self::Optimizing => "Optimizing",
            Self::Renaming => "Renaming",
            Self::Complete => "Complete",
        }
    }
}

/// A single item that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// The offending file
    pub path: PathBuf,
    /// Why it failed
    pub message: String,
}

impl ItemFailure {
    pub(crate) fn new(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result of a batch image operation
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Number of items written
    pub success_count: usize,
    /// Number of items left alone on purpose
    pub skip_count: usize,
    /// Items that failed; the batch kept going past each of them
    pub failures: Vec<ItemFailure>,
    /// Items that were processed but did not reach the wanted state
    pub warnings: Vec<ItemFailure>,
}

impl BatchResult {
    /// Number of failed items
    #[must_use]
    pub fn fail_count(&self) -> usize {
        self.failures.len()
    }
}
