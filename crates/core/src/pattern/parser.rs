//! Recursive-descent pattern parser (§4.2).
//!
//! ```text
//! regexp  := alt EOF
//! alt     := concat ('|' concat)+ | concat
//! concat  := repeat repeat*
//! repeat  := group ('*' | '+' | '?')?
//! group   := '(' alt ')' | single
//! single  := '.' | bracket | codepoint | charprop | fragment | CHAR
//! bracket := ('[' | '[^') bexpElem+ ']'
//! bexpElem:= atom ('-' atom)?
//! ```

use lexforge_diagnostics::{Span, codes};
use lexforge_ucd::{UcdError, find_code_point_ranges, normalize_property_token};

use super::cpt::Cpt;
use super::lexer::{LexMode, PatternLexer, TokKind, Token};
use crate::error::PatternError;

const MAX_CODE_POINT: u32 = 0x10FFFF;
const SURROGATE_LO: u32 = 0xD800;
const SURROGATE_HI: u32 = 0xDFFF;

/// Parse one pattern string into a [`Cpt`]. Fragment references are left
/// unresolved (see [`crate::pattern::fragment`]).
pub fn parse_pattern(pattern: &str, kind_name: &str, is_fragment: bool) -> Result<Cpt, PatternError> {
    let mut parser = Parser::new(pattern, kind_name, is_fragment)?;
    if matches!(parser.cur.kind, TokKind::Eof) {
        return Err(parser.err(codes::NULL_PATTERN, "pattern must not be empty", parser.cur.span));
    }
    let node = parser.parse_alt()?;
    parser.expect_eof()?;
    Ok(node)
}

struct Parser<'a> {
    lexer: PatternLexer<'a>,
    mode: LexMode,
    cur: Token,
    kind_name: &'a str,
    is_fragment: bool,
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str, kind_name: &'a str, is_fragment: bool) -> Result<Self, PatternError> {
        let mut lexer = PatternLexer::new(pattern, kind_name, is_fragment);
        let cur = lexer.next_token(LexMode::Default)?;
        Ok(Self { lexer, mode: LexMode::Default, cur, kind_name, is_fragment })
    }

    fn err(&self, code: &'static str, message: impl Into<String>, span: Span) -> PatternError {
        PatternError::new(code, message, span, self.kind_name, self.is_fragment)
    }

    fn bump(&mut self) -> Result<(), PatternError> {
        self.cur = self.lexer.next_token(self.mode)?;
        Ok(())
    }

    fn switch_mode(&mut self, mode: LexMode) -> Result<(), PatternError> {
        self.mode = mode;
        self.bump()
    }

    fn expect_eof(&self) -> Result<(), PatternError> {
        match self.cur.kind {
            TokKind::Eof => Ok(()),
            TokKind::RParen => {
                Err(self.err(codes::GROUP_NO_INITIATOR, "`)` with no matching `(`", self.cur.span))
            }
            _ => Err(self.err(codes::UNEXPECTED_TOKEN, "unexpected trailing token", self.cur.span)),
        }
    }

    fn can_start_atom(&self) -> bool {
        matches!(
            self.cur.kind,
            TokKind::Char(_)
                | TokKind::Dot
                | TokKind::LParen
                | TokKind::LBracket
                | TokKind::LBracketCaret
                | TokKind::CodePointLeader
                | TokKind::CharPropLeader
                | TokKind::FragmentLeader
        )
    }

    // ── Grammar ──────────────────────────────────────────────────────────

    fn parse_alt(&mut self) -> Result<Cpt, PatternError> {
        let mut parts = vec![self.parse_concat()?];
        while matches!(self.cur.kind, TokKind::Pipe) {
            self.bump()?;
            parts.push(self.parse_concat()?);
        }
        Ok(parts.into_iter().reduce(|a, b| Cpt::Alt(Box::new(a), Box::new(b))).unwrap())
    }

    fn parse_concat(&mut self) -> Result<Cpt, PatternError> {
        if matches!(self.cur.kind, TokKind::Star | TokKind::Plus | TokKind::Question) {
            return Err(self.err(
                codes::REP_NO_TARGET,
                "repetition operator has no operand to its left",
                self.cur.span,
            ));
        }
        let mut parts = Vec::new();
        while self.can_start_atom() {
            parts.push(self.parse_repeat()?);
        }
        if parts.is_empty() {
            return Err(self.err(
                codes::ALT_LACK_OF_OPERAND,
                "alternation operand must not be empty",
                self.cur.span,
            ));
        }
        Ok(Cpt::concat_all(parts))
    }

    fn parse_repeat(&mut self) -> Result<Cpt, PatternError> {
        let atom = self.parse_group()?;
        match self.cur.kind {
            TokKind::Star => {
                self.bump()?;
                Ok(Cpt::Repeat(Box::new(atom)))
            }
            TokKind::Plus => {
                self.bump()?;
                Ok(Cpt::one_or_more(atom))
            }
            TokKind::Question => {
                self.bump()?;
                Ok(Cpt::Opt(Box::new(atom)))
            }
            _ => Ok(atom),
        }
    }

    fn parse_group(&mut self) -> Result<Cpt, PatternError> {
        if matches!(self.cur.kind, TokKind::LParen) {
            let start = self.cur.span;
            self.bump()?;
            if matches!(self.cur.kind, TokKind::RParen) {
                return Err(self.err(codes::GROUP_NO_ELEM, "empty group `()`", start));
            }
            let inner = self.parse_alt()?;
            if !matches!(self.cur.kind, TokKind::RParen) {
                return Err(self.err(codes::GROUP_UNCLOSED, "unclosed group", start));
            }
            self.bump()?;
            Ok(inner)
        } else {
            self.parse_single()
        }
    }

    fn parse_single(&mut self) -> Result<Cpt, PatternError> {
        match self.cur.kind.clone() {
            TokKind::Dot => {
                self.bump()?;
                Ok(Cpt::Symbol(0, MAX_CODE_POINT))
            }
            TokKind::LBracket | TokKind::LBracketCaret => self.parse_bracket(),
            TokKind::CodePointLeader => self.parse_codepoint(LexMode::Default),
            TokKind::CharPropLeader => self.parse_charprop(LexMode::Default),
            TokKind::FragmentLeader => self.parse_fragment_ref(),
            TokKind::Char(c) => {
                self.bump()?;
                Ok(Cpt::Symbol(c as u32, c as u32))
            }
            _ => Err(self.err(codes::UNEXPECTED_TOKEN, "unexpected token", self.cur.span)),
        }
    }

    fn parse_codepoint(&mut self, return_mode: LexMode) -> Result<Cpt, PatternError> {
        let start = self.cur.span;
        self.switch_mode(LexMode::CpExp)?;
        if !matches!(self.cur.kind, TokKind::LBrace) {
            self.switch_mode(return_mode)?;
            return Err(self.err(codes::CP_EXP_INVALID_FORM, "expected `{` after `\\u`", start));
        }
        self.bump()?;
        let TokKind::HexDigits(digits) = self.cur.kind.clone() else {
            self.switch_mode(return_mode)?;
            return Err(self.err(codes::CP_EXP_INVALID_FORM, "expected hex digits", self.cur.span));
        };
        self.bump()?;
        if !matches!(self.cur.kind, TokKind::RBrace) {
            self.switch_mode(return_mode)?;
            return Err(self.err(codes::CP_EXP_INVALID_FORM, "expected `}`", self.cur.span));
        }
        let cp = u32::from_str_radix(&digits, 16)
            .expect("lexer already validated this is a 4 or 6 digit hex run");
        self.switch_mode(return_mode)?;
        if cp > MAX_CODE_POINT {
            return Err(self.err(
                codes::CP_EXP_OUT_OF_RANGE,
                format!("code point U+{cp:X} exceeds U+10FFFF"),
                start,
            ));
        }
        if (SURROGATE_LO..=SURROGATE_HI).contains(&cp) {
            return Err(self.err(
                codes::CP_EXP_OUT_OF_RANGE,
                format!("U+{cp:X} is a surrogate code point and has no well-formed UTF-8 encoding"),
                start,
            ));
        }
        Ok(Cpt::Symbol(cp, cp))
    }

    fn parse_charprop(&mut self, return_mode: LexMode) -> Result<Cpt, PatternError> {
        let start = self.cur.span;
        self.switch_mode(LexMode::CharPropExp)?;
        if !matches!(self.cur.kind, TokKind::LBrace) {
            self.switch_mode(return_mode)?;
            return Err(self.err(codes::CHAR_PROP_EXP_INVALID_FORM, "expected `{` after `\\p`", start));
        }
        self.bump()?;
        let TokKind::SymbolBody(body) = self.cur.kind.clone() else {
            self.switch_mode(return_mode)?;
            return Err(self.err(
                codes::CHAR_PROP_EXP_INVALID_FORM,
                "expected a property name",
                self.cur.span,
            ));
        };
        self.bump()?;
        if !matches!(self.cur.kind, TokKind::RBrace) {
            self.switch_mode(return_mode)?;
            return Err(self.err(codes::CHAR_PROP_EXP_INVALID_FORM, "expected `}`", self.cur.span));
        }
        self.switch_mode(return_mode)?;

        let (prop_raw, value_raw) = body.split_once('=').unwrap_or((body.as_str(), "yes"));
        let property = normalize_property_token(prop_raw, false);
        let value = normalize_property_token(value_raw, true);
        match find_code_point_ranges(&property, &value) {
            Ok((ranges, negated)) => {
                let pairs = ranges.into_iter().map(|r| (r.from, r.to)).collect();
                let resolved = exclude_surrogates(if negated { complement(pairs) } else { merge_ranges(pairs) });
                if resolved.is_empty() {
                    return Err(self.err(
                        codes::CHAR_PROP_UNSUPPORTED,
                        format!(
                            "property `{prop_raw}={value_raw}` names only surrogate code points, which have no well-formed UTF-8 encoding"
                        ),
                        start,
                    ));
                }
                Ok(ranges_to_cpt(resolved))
            }
            Err(UcdError::ContributoryProperty(_) | UcdError::UnsupportedProperty(_)) => Err(self
                .err(
                    codes::CHAR_PROP_UNSUPPORTED,
                    format!("unsupported character property `{prop_raw}`"),
                    start,
                )),
            Err(UcdError::UnrecognizedValue { .. }) => Err(self.err(
                codes::CHAR_PROP_UNSUPPORTED,
                format!("unrecognized value `{value_raw}` for property `{prop_raw}`"),
                start,
            )),
        }
    }

    fn parse_fragment_ref(&mut self) -> Result<Cpt, PatternError> {
        let start = self.cur.span;
        self.switch_mode(LexMode::FragmentExp)?;
        if !matches!(self.cur.kind, TokKind::LBrace) {
            self.switch_mode(LexMode::Default)?;
            return Err(self.err(codes::FRAGMENT_EXP_INVALID_FORM, "expected `{` after `\\f`", start));
        }
        self.bump()?;
        let TokKind::SymbolBody(name) = self.cur.kind.clone() else {
            self.switch_mode(LexMode::Default)?;
            return Err(self.err(
                codes::FRAGMENT_EXP_INVALID_FORM,
                "expected a fragment name",
                self.cur.span,
            ));
        };
        self.bump()?;
        if !matches!(self.cur.kind, TokKind::RBrace) {
            self.switch_mode(LexMode::Default)?;
            return Err(self.err(codes::FRAGMENT_EXP_INVALID_FORM, "expected `}`", self.cur.span));
        }
        self.switch_mode(LexMode::Default)?;
        Ok(Cpt::FragmentRef(name))
    }

    /// One atom inside a bracket expression: either a plain code point
    /// (`Ok(Some(cp))`, eligible as a range endpoint) or a character
    /// property (`Ok(None)`, with its ranges pushed directly, never
    /// eligible as a range endpoint).
    fn parse_bexp_atom(
        &mut self,
        start: Span,
        ranges: &mut Vec<(u32, u32)>,
    ) -> Result<Option<u32>, PatternError> {
        match self.cur.kind.clone() {
            TokKind::Char(c) => {
                self.bump()?;
                Ok(Some(c as u32))
            }
            TokKind::CodePointLeader => match self.parse_codepoint(LexMode::BExp)? {
                Cpt::Symbol(a, _) => Ok(Some(a)),
                _ => unreachable!("parse_codepoint always returns a Symbol"),
            },
            TokKind::CharPropLeader => {
                let prop_start = self.cur.span;
                let prop = self.parse_charprop(LexMode::BExp)?;
                if matches!(self.cur.kind, TokKind::Dash) {
                    return Err(self.err(
                        codes::RANGE_PROP_IS_UNAVAILABLE,
                        "a character property cannot be used as a range endpoint",
                        prop_start,
                    ));
                }
                flatten_into(ranges, prop);
                Ok(None)
            }
            _ => Err(self.err(codes::UNEXPECTED_TOKEN, "unexpected token in `[...]`", start)),
        }
    }

    fn parse_bracket(&mut self) -> Result<Cpt, PatternError> {
        let start = self.cur.span;
        let inverse = matches!(self.cur.kind, TokKind::LBracketCaret);
        self.switch_mode(LexMode::BExp)?;
        if matches!(self.cur.kind, TokKind::RBracket) {
            self.switch_mode(LexMode::Default)?;
            return Err(self.err(codes::BEXP_NO_ELEM, "empty bracket expression", start));
        }

        let mut ranges: Vec<(u32, u32)> = Vec::new();
        loop {
            if matches!(self.cur.kind, TokKind::RBracket) {
                break;
            }
            if matches!(self.cur.kind, TokKind::Eof) {
                self.switch_mode(LexMode::Default)?;
                return Err(self.err(codes::BEXP_UNCLOSED, "unclosed bracket expression", start));
            }
            let elem_start = self.cur.span;
            match self.parse_bexp_atom(elem_start, &mut ranges)? {
                None => {}
                Some(lo) => {
                    if matches!(self.cur.kind, TokKind::Dash) {
                        self.bump()?;
                        let hi_start = self.cur.span;
                        match self.parse_bexp_atom(hi_start, &mut ranges)? {
                            Some(hi) => {
                                if lo > hi {
                                    self.switch_mode(LexMode::Default)?;
                                    return Err(self.err(
                                        codes::RANGE_INVALID_ORDER,
                                        format!("range U+{lo:X}-U+{hi:X} is out of order"),
                                        elem_start,
                                    ));
                                }
                                ranges.push((lo, hi));
                            }
                            None => {
                                self.switch_mode(LexMode::Default)?;
                                return Err(self.err(
                                    codes::RANGE_PROP_IS_UNAVAILABLE,
                                    "a character property cannot be used as a range endpoint",
                                    hi_start,
                                ));
                            }
                        }
                    } else {
                        ranges.push((lo, lo));
                    }
                }
            }
        }
        self.switch_mode(LexMode::Default)?;

        Ok(ranges_to_cpt(if inverse { complement(ranges) } else { merge_ranges(ranges) }))
    }
}

fn flatten_into(ranges: &mut Vec<(u32, u32)>, cpt: Cpt) {
    match cpt {
        Cpt::Symbol(a, b) => ranges.push((a, b)),
        Cpt::Alt(l, r) => {
            flatten_into(ranges, *l);
            flatten_into(ranges, *r);
        }
        other => unreachable!("character-property expansion produced non-range node {other:?}"),
    }
}

/// Sort and merge overlapping or adjacent ranges.
fn merge_ranges(mut ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    ranges.sort_unstable();
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
    for (from, to) in ranges {
        if let Some(last) = merged.last_mut() {
            if from <= last.1.saturating_add(1) {
                last.1 = last.1.max(to);
                continue;
            }
        }
        merged.push((from, to));
    }
    merged
}

/// Remove the surrogate gap `D800..=DFFF` from a set of merged, sorted
/// ranges. Surrogates are not valid Unicode scalar values and have no
/// well-formed UTF-8 encoding; a character property that names only
/// surrogates (e.g. `General_Category=Cs`) must drop them rather than
/// produce a range the UTF-8 expander cannot lower.
fn exclude_surrogates(ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    let mut out = Vec::with_capacity(ranges.len());
    for (from, to) in ranges {
        if to < SURROGATE_LO || from > SURROGATE_HI {
            out.push((from, to));
            continue;
        }
        if from < SURROGATE_LO {
            out.push((from, SURROGATE_LO - 1));
        }
        if to > SURROGATE_HI {
            out.push((SURROGATE_HI + 1, to));
        }
    }
    out
}

/// Complement a set of ranges within `0x00..=0x10FFFF`.
fn complement(ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    let merged = merge_ranges(ranges);
    let mut out = Vec::with_capacity(merged.len() + 1);
    let mut next_from = 0u32;
    for (from, to) in merged {
        if from > next_from {
            out.push((next_from, from - 1));
        }
        next_from = to.saturating_add(1);
    }
    if next_from <= MAX_CODE_POINT {
        out.push((next_from, MAX_CODE_POINT));
    }
    out
}

fn ranges_to_cpt(ranges: Vec<(u32, u32)>) -> Cpt {
    let mut nodes = ranges.into_iter().map(|(a, b)| Cpt::Symbol(a, b));
    let first = nodes.next().expect("a resolved property/bracket is never empty");
    nodes.fold(first, |acc, n| Cpt::Alt(Box::new(acc), Box::new(n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pattern: &str) -> Cpt {
        parse_pattern(pattern, "t", false).expect("should parse")
    }

    fn err_code(pattern: &str) -> &'static str {
        parse_pattern(pattern, "t", false).unwrap_err().code
    }

    #[test]
    fn parses_a_single_char() {
        assert_eq!(parse("a"), Cpt::Symbol('a' as u32, 'a' as u32));
    }

    #[test]
    fn parses_concatenation_left_associatively() {
        assert_eq!(
            parse("ab"),
            Cpt::Concat(
                Box::new(Cpt::Symbol('a' as u32, 'a' as u32)),
                Box::new(Cpt::Symbol('b' as u32, 'b' as u32))
            )
        );
    }

    #[test]
    fn parses_alternation() {
        assert_eq!(
            parse("a|b"),
            Cpt::Alt(
                Box::new(Cpt::Symbol('a' as u32, 'a' as u32)),
                Box::new(Cpt::Symbol('b' as u32, 'b' as u32))
            )
        );
    }

    #[test]
    fn parses_star_plus_question() {
        assert_eq!(parse("a*"), Cpt::Repeat(Box::new(Cpt::Symbol('a' as u32, 'a' as u32))));
        assert_eq!(parse("a?"), Cpt::Opt(Box::new(Cpt::Symbol('a' as u32, 'a' as u32))));
        // `a+` desugars to `Concat(a, Repeat(copy(a)))` per §3.
        assert_eq!(
            parse("a+"),
            Cpt::Concat(
                Box::new(Cpt::Symbol('a' as u32, 'a' as u32)),
                Box::new(Cpt::Repeat(Box::new(Cpt::Symbol('a' as u32, 'a' as u32))))
            )
        );
    }

    #[test]
    fn dot_matches_full_code_point_range() {
        assert_eq!(parse("."), Cpt::Symbol(0, MAX_CODE_POINT));
    }

    #[test]
    fn groups_do_not_change_the_tree_shape() {
        assert_eq!(parse("(a)"), parse("a"));
        assert_eq!(
            parse("(a|b)c"),
            Cpt::Concat(
                Box::new(Cpt::Alt(
                    Box::new(Cpt::Symbol('a' as u32, 'a' as u32)),
                    Box::new(Cpt::Symbol('b' as u32, 'b' as u32))
                )),
                Box::new(Cpt::Symbol('c' as u32, 'c' as u32))
            )
        );
    }

    #[test]
    fn bracket_merges_overlapping_and_adjacent_ranges() {
        assert_eq!(parse("[a-cb-d]"), Cpt::Symbol('a' as u32, 'd' as u32));
        assert_eq!(parse("[a-cd-f]"), Cpt::Symbol('a' as u32, 'f' as u32));
    }

    #[test]
    fn negated_bracket_is_complement_over_full_range() {
        let node = parse("[^a]");
        match node {
            Cpt::Alt(l, r) => {
                assert_eq!(*l, Cpt::Symbol(0, 'a' as u32 - 1));
                assert_eq!(*r, Cpt::Symbol('a' as u32 + 1, MAX_CODE_POINT));
            }
            other => panic!("expected a two-arm complement, got {other:?}"),
        }
    }

    #[test]
    fn code_point_literal_accepts_four_and_six_hex_digits() {
        assert_eq!(parse("\\u{0041}"), Cpt::Symbol(0x41, 0x41));
        assert_eq!(parse("\\u{010000}"), Cpt::Symbol(0x10000, 0x10000));
    }

    #[test]
    fn code_point_literal_rejects_value_past_max() {
        // The lexer requires exactly 4 or 6 hex digits; 6 digits can exceed
        // 0x10FFFF, which the parser itself must reject.
        assert_eq!(err_code("\\u{110000}"), codes::CP_EXP_OUT_OF_RANGE);
    }

    #[test]
    fn code_point_literal_rejects_surrogates() {
        // D800..=DFFF has no well-formed UTF-8 encoding; accepting it here
        // would panic deep in UTF-8 lowering instead of erroring cleanly.
        assert_eq!(err_code("\\u{D800}"), codes::CP_EXP_OUT_OF_RANGE);
        assert_eq!(err_code("\\u{DFFF}"), codes::CP_EXP_OUT_OF_RANGE);
        assert_eq!(err_code("[\\u{D800}-\\u{DFFF}]"), codes::CP_EXP_OUT_OF_RANGE);
    }

    #[test]
    fn char_property_naming_only_surrogates_is_rejected() {
        assert_eq!(err_code("\\p{gc=cs}"), codes::CHAR_PROP_UNSUPPORTED);
        assert_eq!(err_code("\\p{gc=surrogate}"), codes::CHAR_PROP_UNSUPPORTED);
    }

    #[test]
    fn composite_category_containing_cs_excludes_surrogates_but_still_resolves() {
        // `C` includes `Cs` but also `Cc`/`Cf`/`Co`, so it still has valid
        // code points once the surrogate gap is excluded.
        let node = parse("\\p{gc=c}");
        let mut ranges = Vec::new();
        fn collect(cpt: &Cpt, out: &mut Vec<(u32, u32)>) {
            match cpt {
                Cpt::Symbol(a, b) => out.push((*a, *b)),
                Cpt::Alt(l, r) => {
                    collect(l, out);
                    collect(r, out);
                }
                other => panic!("unexpected node {other:?}"),
            }
        }
        collect(&node, &mut ranges);
        assert!(!ranges.iter().any(|(a, b)| *a <= 0xD800 && 0xDFFF <= *b));
    }

    #[test]
    fn fragment_reference_parses_to_an_unresolved_ref() {
        assert_eq!(parse("\\f{digit}"), Cpt::FragmentRef("digit".to_string()));
    }

    #[test]
    fn char_property_resolves_through_ucd() {
        let node = parse("\\p{gc=lu}");
        // Should be a disjunction of ranges, at least covering ASCII A-Z.
        let mut ranges = Vec::new();
        fn collect(cpt: &Cpt, out: &mut Vec<(u32, u32)>) {
            match cpt {
                Cpt::Symbol(a, b) => out.push((*a, *b)),
                Cpt::Alt(l, r) => {
                    collect(l, out);
                    collect(r, out);
                }
                other => panic!("unexpected node {other:?}"),
            }
        }
        collect(&node, &mut ranges);
        assert!(ranges.iter().any(|(a, b)| *a <= 0x41 && 0x5A <= *b));
    }

    #[test]
    fn char_property_in_range_position_is_rejected() {
        assert_eq!(err_code("[\\p{gc=lu}-z]"), codes::RANGE_PROP_IS_UNAVAILABLE);
    }

    #[test]
    fn contributory_property_is_rejected() {
        assert_eq!(err_code("\\p{other_alphabetic}"), codes::CHAR_PROP_UNSUPPORTED);
    }

    #[test]
    fn empty_pattern_is_null_pattern() {
        assert_eq!(err_code(""), codes::NULL_PATTERN);
    }

    #[test]
    fn empty_alternation_operand_is_rejected() {
        for pattern in ["a|", "|b", "a||b"] {
            assert_eq!(err_code(pattern), codes::ALT_LACK_OF_OPERAND, "pattern {pattern}");
        }
    }

    #[test]
    fn empty_group_is_rejected() {
        assert_eq!(err_code("()"), codes::GROUP_NO_ELEM);
    }

    #[test]
    fn unclosed_group_is_rejected() {
        assert_eq!(err_code("(a"), codes::GROUP_UNCLOSED);
    }

    #[test]
    fn stray_close_paren_is_rejected() {
        assert_eq!(err_code("a)"), codes::GROUP_NO_INITIATOR);
    }

    #[test]
    fn empty_bracket_is_rejected() {
        assert_eq!(err_code("[]"), codes::BEXP_NO_ELEM);
    }

    #[test]
    fn unclosed_bracket_is_rejected() {
        assert_eq!(err_code("[a"), codes::BEXP_UNCLOSED);
    }

    #[test]
    fn out_of_order_range_is_rejected() {
        assert_eq!(err_code("[z-a]"), codes::RANGE_INVALID_ORDER);
    }

    #[test]
    fn repetition_with_no_operand_is_rejected() {
        assert_eq!(err_code("*"), codes::REP_NO_TARGET);
        assert_eq!(err_code("?"), codes::REP_NO_TARGET);
    }
}
