//! Texture naming - filename metadata parsing and CDN-safe renaming

pub mod parser;
pub mod safe;

pub use parser::{
    DEFAULT_BLEND_MODE, ParsedName, SpecialFormatError, digit_sequence, parse_default,
    parse_filename, parse_special,
};
pub use safe::{Rename, RenamePlan, apply_renames, default_replacements, plan_renames, safe_name};

/// Whether a file or directory name is hidden (leading `.`)
#[must_use]
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
