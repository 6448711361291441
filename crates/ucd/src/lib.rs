//! Unicode Character Database lookup surface.
//!
//! Exposes exactly two properties — `General_Category` and `White_Space` —
//! as pure, immutable data through a single narrow function,
//! [`find_code_point_ranges`]. Callers are expected to have already
//! normalized property and value names (stripping `_`, `-`, space, and
//! lowercasing) and to never ask for a contributory property
//! (`Other_Alphabetic`, `Other_Lowercase`, `Other_Uppercase`); those are
//! rejected here as a second line of defense.
//!
//! The tables bundled in this crate are a representative, hand-curated
//! subset of the real UCD — enough to exercise every code path of a
//! property-driven pattern compiler (composite categories, negation,
//! multi-byte-class boundaries) without vendoring the full multi-megabyte
//! `UnicodeData.txt`. A production build would regenerate these tables from
//! the official UCD files at build time; see `DESIGN.md` for the tradeoff.

mod general_category;
mod white_space;

use std::collections::HashMap;
use std::sync::OnceLock;

/// An inclusive code-point range, `from..=to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CodePointRange {
    /// Inclusive lower bound.
    pub from: u32,
    /// Inclusive upper bound.
    pub to: u32,
}

impl CodePointRange {
    /// Build a range, asserting `from <= to`.
    pub fn new(from: u32, to: u32) -> Self {
        assert!(from <= to, "CodePointRange: from ({from}) > to ({to})");
        Self { from, to }
    }
}

/// Errors a UCD lookup can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UcdError {
    /// The property name is not `General_Category` or `White_Space`.
    #[error("unsupported property '{0}'")]
    UnsupportedProperty(String),
    /// The property name names a contributory property, which must never be
    /// exposed directly.
    #[error("contributory property '{0}' cannot be used directly")]
    ContributoryProperty(String),
    /// The value is not a recognized alias for the given property.
    #[error("unrecognized value '{value}' for property '{property}'")]
    UnrecognizedValue {
        /// The (already-normalized) property name.
        property: String,
        /// The (already-normalized) value that was not recognized.
        value: String,
    },
}

const CONTRIBUTORY_PROPERTIES: &[&str] = &["otheralphabetic", "otherlowercase", "otheruppercase"];

/// Look up the code-point ranges for `(propertyName, propertyValue)`.
///
/// `negated = true` means the caller should use the complement of the
/// returned set within `0x00..=0x10FFFF` (used for `White_Space=no` and
/// similar negative boolean queries). This function never negates the
/// result itself; the `Vec<CodePointRange>` always enumerates the positive
/// set named by `value`.
///
/// Both `property` and `value` must already be normalized: `_`, `-`, and
/// space stripped, ASCII-lowercased, and (for `value`) a leading `is`
/// stripped unless the value is exactly `is`.
pub fn find_code_point_ranges(
    property: &str,
    value: &str,
) -> Result<(Vec<CodePointRange>, bool), UcdError> {
    if CONTRIBUTORY_PROPERTIES.contains(&property) {
        return Err(UcdError::ContributoryProperty(property.to_string()));
    }
    match property {
        "generalcategory" | "gc" => general_category::lookup(value)
            .map(|ranges| (ranges.to_vec(), false))
            .ok_or_else(|| UcdError::UnrecognizedValue {
                property: property.to_string(),
                value: value.to_string(),
            }),
        "whitespace" | "ws" => {
            let (ranges, negated) = white_space::lookup(value).ok_or_else(|| {
                UcdError::UnrecognizedValue {
                    property: property.to_string(),
                    value: value.to_string(),
                }
            })?;
            Ok((ranges.to_vec(), negated))
        }
        other => Err(UcdError::UnsupportedProperty(other.to_string())),
    }
}

/// Normalize a `\p{...}` property or value token per the engine's contract:
/// strip `_`, `-`, and space, lowercase, and (for values) drop a leading
/// `is` unless the whole token is exactly `is`.
#[must_use]
pub fn normalize_property_token(raw: &str, strip_is_prefix: bool) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect();
    if strip_is_prefix && cleaned != "is" {
        if let Some(rest) = cleaned.strip_prefix("is") {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    cleaned
}

static CATEGORY_INDEX: OnceLock<HashMap<&'static str, &'static [CodePointRange]>> =
    OnceLock::new();

fn category_index() -> &'static HashMap<&'static str, &'static [CodePointRange]> {
    CATEGORY_INDEX.get_or_init(general_category::build_index)
}

pub(crate) fn category_ranges(name: &str) -> Option<&'static [CodePointRange]> {
    category_index().get(name).copied()
}
