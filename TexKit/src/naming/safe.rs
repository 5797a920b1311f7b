//! CDN-safe file and directory names
//!
//! jsDelivr serves the repository tree as-is, so names with spaces or
//! reserved characters produce awkward URLs. Names are fixed with a literal
//! replacement table first, then any remaining space becomes a hyphen.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{Phase, Progress, ProgressCallback};

/// Replacement table applied before the space rule, in order.
#[must_use]
pub fn default_replacements() -> Vec<(String, String)> {
    [
        ("Ink & Paint", "Ink-and-Paint"),
        ("Paper & Canvas", "Paper-and-Canvas"),
        ("Film Grain", "Film-Grain"),
        ("Lens Effects", "Lens-Effects"),
        ("test category", "test-category"),
        ("Ink:Paint", "Ink-Paint"),
        ("Paper:Canvas", "Paper-Canvas"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

/// Convert a single path component to its CDN-safe form.
///
/// # Example
/// ```
/// use texkit::naming::{default_replacements, safe_name};
///
/// let table = default_replacements();
/// assert_eq!(safe_name("Ink & Paint", &table), "Ink-and-Paint");
/// assert_eq!(safe_name("Old Paper 3.jpg", &table), "Old-Paper-3.jpg");
/// ```
#[must_use]
pub fn safe_name(name: &str, replacements: &[(String, String)]) -> String {
    let mut result = name.to_string();
    for (from, to) in replacements {
        result = result.replace(from.as_str(), to);
    }
    result.replace(' ', "-")
}

/// A single planned rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    /// Current path
    pub from: PathBuf,
    /// Path after renaming
    pub to: PathBuf,
}

/// Ordered renames for a directory tree; children always precede their parents
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    /// Renames in execution order
    pub renames: Vec<Rename>,
}

impl RenamePlan {
    /// Whether nothing needs renaming
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// Paths that two renames would both produce, or that are still occupied
    /// when their rename runs: either by an entry that is not renamed at all,
    /// or by one that is only moved away later in the plan.
    #[must_use]
    pub fn conflicts(&self) -> Vec<PathBuf> {
        let vacated_at: HashMap<&Path, usize> = self
            .renames
            .iter()
            .enumerate()
            .map(|(i, r)| (r.from.as_path(), i))
            .collect();
        let mut seen = HashSet::new();
        let mut conflicts = Vec::new();

        for (i, rename) in self.renames.iter().enumerate() {
            let duplicate = !seen.insert(rename.to.as_path());
            let occupied = rename.to.exists()
                && !vacated_at.get(rename.to.as_path()).is_some_and(|&j| j < i);
            if (duplicate || occupied) && !conflicts.contains(&rename.to) {
                conflicts.push(rename.to.clone());
            }
        }
        conflicts
    }
}

/// Plan renames for everything below `root` (the root itself is left alone).
///
/// Hidden files (leading `.`) are skipped. The walk is bottom-up so that a
/// file's rename is performed before its parent directory changes name.
pub fn plan_renames(root: &Path, replacements: &[(String, String)]) -> Result<RenamePlan> {
    let mut renames = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| Error::NonUtf8Name(entry.path().to_path_buf()))?;

        if entry.file_type().is_file() && super::is_hidden(name) {
            continue;
        }

        let new_name = safe_name(name, replacements);
        if new_name != name {
            let from = entry.path().to_path_buf();
            let to = from.with_file_name(&new_name);
            renames.push(Rename { from, to });
        }
    }

    Ok(RenamePlan { renames })
}

/// Apply a rename plan.
///
/// The plan is checked for conflicts first; if any exist nothing is renamed.
pub fn apply_renames(plan: &RenamePlan, progress: ProgressCallback) -> Result<usize> {
    let conflicts = plan.conflicts();
    if !conflicts.is_empty() {
        return Err(Error::RenameConflict(conflicts));
    }

    let total = plan.renames.len();
    for (i, rename) in plan.renames.iter().enumerate() {
        progress(&Progress::with_file(
            Phase::Renaming,
            i + 1,
            total,
            rename.from.display().to_string(),
        ));
        tracing::info!("Renaming: {} -> {}", rename.from.display(), rename.to.display());
        std::fs::rename(&rename.from, &rename.to)
            .map_err(|e| Error::path_io("renaming", &rename.from, e))?;
    }

    progress(&Progress::new(Phase::Complete, total, total));
    Ok(total)
}
