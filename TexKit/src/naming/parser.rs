//! Texture filename parsing
//!
//! Two naming conventions are understood:
//!
//! - **Special**: `prefix__Name__Display Title__blend[__sequence]`
//! - **Default**: anything else; the whole stem is the name and title, the
//!   blend mode is `overlay`, and the sequence is built from the stem's digits.
//!
//! Parsing never fails. Input the special form rejects is read with the
//! default convention instead.

use std::fmt;

/// Delimiter between fields of the special naming convention
pub const FIELD_DELIMITER: &str = "__";

/// Blend mode assigned to textures using the default naming convention
pub const DEFAULT_BLEND_MODE: &str = "overlay";

/// Sequence number used when none can be derived
pub const DEFAULT_SEQUENCE: i64 = 1;

const MIN_SPECIAL_PARTS: usize = 4;

/// Fields extracted from a texture's file stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Canonical name
    pub base_name: String,
    /// Display title
    pub title: String,
    /// Compositing hint for downstream consumers
    pub default_blend_mode: String,
    /// Display ordering within the category
    pub sequence_number: i64,
}

/// Why a stem was not accepted as the special naming convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialFormatError {
    /// Fewer than four `__`-separated parts
    TooFewParts(usize),
    /// The fifth part is present but not an integer
    BadSequence(String),
}

impl fmt::Display for SpecialFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewParts(n) => write!(f, "expected at least {MIN_SPECIAL_PARTS} parts, found {n}"),
            Self::BadSequence(s) => write!(f, "sequence '{s}' is not an integer"),
        }
    }
}

impl std::error::Error for SpecialFormatError {}

/// Parse a file stem (name without extension) into its metadata fields.
///
/// # Example
/// ```
/// use texkit::naming::parse_filename;
///
/// let parsed = parse_filename("a__Rust__My Rust__multiply__3");
/// assert_eq!(parsed.base_name, "Rust");
/// assert_eq!(parsed.sequence_number, 3);
///
/// let parsed = parse_filename("Grunge7");
/// assert_eq!(parsed.default_blend_mode, "overlay");
/// assert_eq!(parsed.sequence_number, 7);
/// ```
#[must_use]
pub fn parse_filename(stem: &str) -> ParsedName {
    match parse_special(stem) {
        Ok(parsed) => parsed,
        Err(e) => {
            if !matches!(e, SpecialFormatError::TooFewParts(_)) {
                tracing::debug!("'{}' not in special format ({}), using default naming", stem, e);
            }
            parse_default(stem)
        }
    }
}

/// Parse the special `prefix__Name__Title__blend[__sequence]` convention.
///
/// Parts beyond the fifth are ignored.
pub fn parse_special(stem: &str) -> Result<ParsedName, SpecialFormatError> {
    let parts: Vec<&str> = stem.split(FIELD_DELIMITER).collect();
    if parts.len() < MIN_SPECIAL_PARTS {
        return Err(SpecialFormatError::TooFewParts(parts.len()));
    }

    let sequence_number = match parts.get(4) {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| SpecialFormatError::BadSequence((*raw).to_string()))?,
        None => DEFAULT_SEQUENCE,
    };

    Ok(ParsedName {
        base_name: parts[1].to_string(),
        title: parts[2].to_string(),
        default_blend_mode: parts[3].to_string(),
        sequence_number,
    })
}

/// Parse a stem with the default convention.
#[must_use]
pub fn parse_default(stem: &str) -> ParsedName {
    ParsedName {
        base_name: stem.to_string(),
        title: stem.to_string(),
        default_blend_mode: DEFAULT_BLEND_MODE.to_string(),
        sequence_number: digit_sequence(stem).unwrap_or(DEFAULT_SEQUENCE),
    }
}

/// Concatenate every ASCII digit in `name` and read the result as an integer.
///
/// `None` when there are no digits or the number does not fit in an `i64`.
/// Digits are taken from anywhere in the name, so `"Paper 2024 v2"` yields `20242`.
#[must_use]
pub fn digit_sequence(name: &str) -> Option<i64> {
    let digits: String = name.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_special_format_with_sequence() {
        let parsed = parse_filename("a__Rust__My Rust__multiply__3");
        assert_eq!(
            parsed,
            ParsedName {
                base_name: "Rust".to_string(),
                title: "My Rust".to_string(),
                default_blend_mode: "multiply".to_string(),
                sequence_number: 3,
            }
        );
    }

    #[test]
    fn test_special_format_without_sequence() {
        let parsed = parse_special("x__Paper__Old Paper__screen").unwrap();
        assert_eq!(parsed.base_name, "Paper");
        assert_eq!(parsed.title, "Old Paper");
        assert_eq!(parsed.default_blend_mode, "screen");
        assert_eq!(parsed.sequence_number, 1);
    }

    #[test]
    fn test_special_format_ignores_extra_parts() {
        let parsed = parse_special("x__A__B__soft-light__12__extra").unwrap();
        assert_eq!(parsed.sequence_number, 12);
    }

    #[test]
    fn test_special_format_tolerates_padded_sequence() {
        assert_eq!(parse_special("x__A__B__overlay__ 4 ").unwrap().sequence_number, 4);
        assert_eq!(parse_special("x__A__B__overlay__-2").unwrap().sequence_number, -2);
    }

    #[test]
    fn test_special_format_rejections() {
        assert_eq!(
            parse_special("a__b__c"),
            Err(SpecialFormatError::TooFewParts(3))
        );
        assert_eq!(
            parse_special("a__b__c__d__seven"),
            Err(SpecialFormatError::BadSequence("seven".to_string()))
        );
    }

    #[test]
    fn test_bad_sequence_falls_back_to_default_naming() {
        let parsed = parse_filename("a__b__c__d__x9");
        assert_eq!(parsed.base_name, "a__b__c__d__x9");
        assert_eq!(parsed.title, "a__b__c__d__x9");
        assert_eq!(parsed.default_blend_mode, DEFAULT_BLEND_MODE);
        assert_eq!(parsed.sequence_number, 9);
    }

    #[test]
    fn test_default_format_digits() {
        let parsed = parse_filename("Grunge7");
        assert_eq!(
            parsed,
            ParsedName {
                base_name: "Grunge7".to_string(),
                title: "Grunge7".to_string(),
                default_blend_mode: "overlay".to_string(),
                sequence_number: 7,
            }
        );
    }

    #[test]
    fn test_default_format_concatenates_scattered_digits() {
        assert_eq!(parse_filename("Paper 2024 v2").sequence_number, 20242);
        assert_eq!(parse_filename("Grunge 1").sequence_number, 1);
        assert_eq!(parse_filename("0 Film 08").sequence_number, 8);
    }

    #[test]
    fn test_default_format_without_digits() {
        assert_eq!(parse_filename("NoDigitsHere").sequence_number, 1);
        assert_eq!(parse_filename("").sequence_number, 1);
    }

    #[test]
    fn test_default_format_overflow_falls_back() {
        assert_eq!(digit_sequence("n99999999999999999999999"), None);
        assert_eq!(parse_filename("n99999999999999999999999").sequence_number, 1);
    }

    #[test]
    fn test_non_ascii_digits_are_ignored() {
        assert_eq!(digit_sequence("Grain ٣"), None);
    }
}
