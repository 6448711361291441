//! `White_Space` range table.
//!
//! The full set of 25 Unicode code points with `White_Space=Yes`, expressed
//! as ranges. `White_Space=No` is modeled by the same table with the
//! `negated` flag set: the caller takes the complement within
//! `0x00..=0x10FFFF`.

use crate::CodePointRange;

const fn r(from: u32, to: u32) -> CodePointRange {
    CodePointRange { from, to }
}

static WHITE_SPACE: &[CodePointRange] = &[
    r(0x0009, 0x000D), // TAB, LF, VT, FF, CR
    r(0x0020, 0x0020), // SPACE
    r(0x0085, 0x0085), // NEL
    r(0x00A0, 0x00A0), // NO-BREAK SPACE
    r(0x1680, 0x1680), // OGHAM SPACE MARK
    r(0x2000, 0x200A), // EN QUAD .. HAIR SPACE
    r(0x2028, 0x2028), // LINE SEPARATOR
    r(0x2029, 0x2029), // PARAGRAPH SEPARATOR
    r(0x202F, 0x202F), // NARROW NO-BREAK SPACE
    r(0x205F, 0x205F), // MEDIUM MATHEMATICAL SPACE
    r(0x3000, 0x3000), // IDEOGRAPHIC SPACE
];

pub(crate) fn lookup(value: &str) -> Option<(&'static [CodePointRange], bool)> {
    match value {
        "yes" | "y" | "true" | "t" => Some((WHITE_SPACE, false)),
        "no" | "n" | "false" | "f" => Some((WHITE_SPACE, true)),
        _ => None,
    }
}
