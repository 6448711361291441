//! `General_Category` range tables.
//!
//! Each category is a hand-curated, representative subset of the real UCD
//! (see the module doc on [`crate`] for the rationale). Composite
//! categories (`Lc`, `L`, `M`, `N`, `P`, `S`, `Z`, `C`) are computed once,
//! lazily, as the union of their member categories.

use crate::CodePointRange;
use std::collections::HashMap;

const fn r(from: u32, to: u32) -> CodePointRange {
    CodePointRange { from, to }
}

// ── Letter categories ───────────────────────────────────────────────────

static LU: &[CodePointRange] = &[
    r(0x0041, 0x005A), // ASCII A-Z
    r(0x00C0, 0x00D6), // Latin-1 Supplement uppercase
    r(0x00D8, 0x00DE),
    r(0x0391, 0x03A9), // Greek uppercase
    r(0x0410, 0x042F), // Cyrillic uppercase
    r(0xFF21, 0xFF3A), // Fullwidth Latin uppercase
];

static LL: &[CodePointRange] = &[
    r(0x0061, 0x007A), // ASCII a-z
    r(0x00DF, 0x00F6), // Latin-1 Supplement lowercase
    r(0x00F8, 0x00FF),
    r(0x03B1, 0x03C9), // Greek lowercase
    r(0x0430, 0x044F), // Cyrillic lowercase
    r(0xFF41, 0xFF5A), // Fullwidth Latin lowercase
];

static LT: &[CodePointRange] = &[
    r(0x01C5, 0x01C5),
    r(0x01C8, 0x01C8),
    r(0x01CB, 0x01CB),
    r(0x01F2, 0x01F2),
    r(0x1F88, 0x1F8F), // Greek titlecase ligatures
    r(0x1FBC, 0x1FBC),
];

static LM: &[CodePointRange] = &[
    r(0x02B0, 0x02C1), // spacing modifier letters
    r(0x02C6, 0x02D1),
];

static LO: &[CodePointRange] = &[
    r(0x05D0, 0x05EA), // Hebrew
    r(0x0621, 0x063A), // Arabic
    r(0x3041, 0x3096), // Hiragana
    r(0x30A1, 0x30FA), // Katakana
    r(0x4E00, 0x9FFF), // CJK Unified Ideographs
    r(0xAC00, 0xD7A3), // Hangul Syllables
];

// ── Mark categories ──────────────────────────────────────────────────────

static MN: &[CodePointRange] = &[r(0x0300, 0x036F)]; // combining diacritical marks
static MC: &[CodePointRange] = &[r(0x093E, 0x0940)]; // Devanagari vowel signs (subset)
static ME: &[CodePointRange] = &[r(0x0488, 0x0489)];

// ── Number categories ─────────────────────────────────────────────────────

static ND: &[CodePointRange] = &[
    r(0x0030, 0x0039), // ASCII digits
    r(0x0660, 0x0669), // Arabic-Indic digits
    r(0x0966, 0x096F), // Devanagari digits
    r(0xFF10, 0xFF19), // Fullwidth digits
];
static NL: &[CodePointRange] = &[r(0x2160, 0x2182)]; // Roman numerals
static NO: &[CodePointRange] = &[r(0x00B2, 0x00B3), r(0x00B9, 0x00B9), r(0x00BC, 0x00BE)];

// ── Punctuation categories ────────────────────────────────────────────────

static PC: &[CodePointRange] = &[r(0x005F, 0x005F), r(0x203F, 0x2040)];
static PD: &[CodePointRange] = &[r(0x002D, 0x002D), r(0x2010, 0x2015)];
static PS: &[CodePointRange] = &[
    r(0x0028, 0x0028),
    r(0x005B, 0x005B),
    r(0x007B, 0x007B),
    r(0x2329, 0x2329),
];
static PE: &[CodePointRange] = &[
    r(0x0029, 0x0029),
    r(0x005D, 0x005D),
    r(0x007D, 0x007D),
    r(0x232A, 0x232A),
];
static PI: &[CodePointRange] = &[r(0x00AB, 0x00AB), r(0x2018, 0x2018), r(0x201C, 0x201C)];
static PF: &[CodePointRange] = &[r(0x00BB, 0x00BB), r(0x2019, 0x2019), r(0x201D, 0x201D)];
static PO: &[CodePointRange] = &[
    r(0x0021, 0x0023),
    r(0x0025, 0x0027),
    r(0x002A, 0x002A),
    r(0x002C, 0x002C),
    r(0x002E, 0x002F),
    r(0x003A, 0x003B),
    r(0x003F, 0x0040),
    r(0x005C, 0x005C),
    r(0x00A1, 0x00A1),
    r(0x00B6, 0x00B7),
    r(0x00BF, 0x00BF),
];

// ── Symbol categories ─────────────────────────────────────────────────────

static SM: &[CodePointRange] = &[
    r(0x002B, 0x002B),
    r(0x003C, 0x003E),
    r(0x007C, 0x007C),
    r(0x007E, 0x007E),
    r(0x00AC, 0x00AC),
    r(0x00B1, 0x00B1),
    r(0x00D7, 0x00D7),
    r(0x00F7, 0x00F7),
    r(0x2200, 0x22FF), // mathematical operators
];
static SC: &[CodePointRange] = &[r(0x0024, 0x0024), r(0x00A2, 0x00A5), r(0x20A0, 0x20CF)];
static SK: &[CodePointRange] = &[
    r(0x005E, 0x005E),
    r(0x0060, 0x0060),
    r(0x00A8, 0x00A8),
    r(0x00AF, 0x00AF),
    r(0x00B4, 0x00B4),
    r(0x00B8, 0x00B8),
];
static SO: &[CodePointRange] = &[
    r(0x00A6, 0x00A6),
    r(0x00A9, 0x00A9),
    r(0x00AE, 0x00AE),
    r(0x00B0, 0x00B0),
    r(0x2600, 0x26FF), // miscellaneous symbols
    r(0x1F300, 0x1F5FF), // miscellaneous symbols and pictographs (requires 4-byte UTF-8)
];

// ── Separator categories ──────────────────────────────────────────────────

static ZS: &[CodePointRange] = &[
    r(0x0020, 0x0020),
    r(0x00A0, 0x00A0),
    r(0x2000, 0x200A),
    r(0x202F, 0x202F),
    r(0x205F, 0x205F),
    r(0x3000, 0x3000),
];
static ZL: &[CodePointRange] = &[r(0x2028, 0x2028)];
static ZP: &[CodePointRange] = &[r(0x2029, 0x2029)];

// ── Other categories ──────────────────────────────────────────────────────

static CC: &[CodePointRange] = &[r(0x0000, 0x001F), r(0x007F, 0x009F)];
static CF: &[CodePointRange] = &[
    r(0x00AD, 0x00AD),
    r(0x200B, 0x200F),
    r(0x202A, 0x202E),
    r(0xFEFF, 0xFEFF),
];
static CO: &[CodePointRange] = &[r(0xE000, 0xF8FF), r(0xF0000, 0xF0010)];
static CS: &[CodePointRange] = &[r(0xD800, 0xDFFF)];

/// All leaf (non-composite) categories, short code paired with its table.
const LEAF_CATEGORIES: &[(&str, &[CodePointRange])] = &[
    ("lu", LU),
    ("ll", LL),
    ("lt", LT),
    ("lm", LM),
    ("lo", LO),
    ("mn", MN),
    ("mc", MC),
    ("me", ME),
    ("nd", ND),
    ("nl", NL),
    ("no", NO),
    ("pc", PC),
    ("pd", PD),
    ("ps", PS),
    ("pe", PE),
    ("pi", PI),
    ("pf", PF),
    ("po", PO),
    ("sm", SM),
    ("sc", SC),
    ("sk", SK),
    ("so", SO),
    ("zs", ZS),
    ("zl", ZL),
    ("zp", ZP),
    ("cc", CC),
    ("cf", CF),
    ("co", CO),
    ("cs", CS),
];

/// Composite categories, short code paired with its member short codes.
const COMPOSITE_CATEGORIES: &[(&str, &[&str])] = &[
    ("lc", &["lu", "ll", "lt"]),
    ("l", &["lu", "ll", "lt", "lm", "lo"]),
    ("m", &["mn", "mc", "me"]),
    ("n", &["nd", "nl", "no"]),
    ("p", &["pc", "pd", "ps", "pe", "pi", "pf", "po"]),
    ("s", &["sm", "sc", "sk", "so"]),
    ("z", &["zs", "zl", "zp"]),
    ("c", &["cc", "cf", "co", "cs"]),
];

/// Long-form aliases (normalized: lowercase, no separators) for each short code.
const LONG_ALIASES: &[(&str, &str)] = &[
    ("uppercaseletter", "lu"),
    ("lowercaseletter", "ll"),
    ("titlecaseletter", "lt"),
    ("modifierletter", "lm"),
    ("otherletter", "lo"),
    ("letter", "l"),
    ("casedletter", "lc"),
    ("nonspacingmark", "mn"),
    ("spacingmark", "mc"),
    ("enclosingmark", "me"),
    ("mark", "m"),
    ("decimalnumber", "nd"),
    ("letternumber", "nl"),
    ("othernumber", "no"),
    ("number", "n"),
    ("connectorpunctuation", "pc"),
    ("dashpunctuation", "pd"),
    ("openpunctuation", "ps"),
    ("closepunctuation", "pe"),
    ("initialpunctuation", "pi"),
    ("finalpunctuation", "pf"),
    ("otherpunctuation", "po"),
    ("punctuation", "p"),
    ("mathsymbol", "sm"),
    ("currencysymbol", "sc"),
    ("modifiersymbol", "sk"),
    ("othersymbol", "so"),
    ("symbol", "s"),
    ("spaceseparator", "zs"),
    ("lineseparator", "zl"),
    ("paragraphseparator", "zp"),
    ("separator", "z"),
    ("control", "cc"),
    ("format", "cf"),
    ("privateuse", "co"),
    ("surrogate", "cs"),
    ("other", "c"),
];

pub(crate) fn lookup(value: &str) -> Option<&'static [CodePointRange]> {
    crate::category_ranges(value)
}

pub(crate) fn build_index() -> HashMap<&'static str, &'static [CodePointRange]> {
    let mut index: HashMap<&'static str, &'static [CodePointRange]> = HashMap::new();
    for (code, ranges) in LEAF_CATEGORIES {
        index.insert(code, ranges);
    }
    for (code, members) in COMPOSITE_CATEGORIES {
        let mut union: Vec<CodePointRange> = members
            .iter()
            .flat_map(|m| LEAF_CATEGORIES.iter().find(|(c, _)| c == m).unwrap().1.iter().copied())
            .collect();
        union.sort();
        let leaked: &'static [CodePointRange] = Box::leak(union.into_boxed_slice());
        index.insert(code, leaked);
    }
    for (alias, target) in LONG_ALIASES {
        let ranges = *index.get(target).expect("LONG_ALIASES target must exist");
        index.insert(alias, ranges);
    }
    index
}
