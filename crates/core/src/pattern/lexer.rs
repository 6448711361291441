//! Pattern lexer (§4.1): turns one pattern string into a stream of
//! structural tokens under a small mode stack.

use lexforge_diagnostics::{Span, codes};

use crate::error::PatternError;

/// Token kinds produced by the pattern lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokKind {
    /// An ordinary character (already resolved past any escape).
    Char(char),
    /// `.`
    Dot,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `?`
    Question,
    /// `|`
    Pipe,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `[^`
    LBracketCaret,
    /// `]`
    RBracket,
    /// `-` used as a range operator inside a bracket expression.
    Dash,
    /// `\u` code-point leader.
    CodePointLeader,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// A contiguous run of hex digits inside a code-point expression.
    HexDigits(String),
    /// `\p` character-property leader.
    CharPropLeader,
    /// `\f` fragment-reference leader.
    FragmentLeader,
    /// The raw body text of a `\p{...}` or `\f{...}` expression (everything
    /// between the braces, whitespace already stripped for fragments).
    SymbolBody(String),
    /// End of pattern.
    Eof,
}

/// A lexed token with its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's kind.
    pub kind: TokKind,
    /// Byte span in the original pattern string.
    pub span: Span,
}

/// Lexer mode, mirroring §4.1's mode stack (`default`, `bExp`, `cpExp`,
/// `charPropExp`, `fragmentExp`). The pattern lexer's stack is at most one
/// deep beyond `Default` since code-point/char-property/fragment
/// expressions cannot nest and a bracket expression cannot contain one
/// (operands are parsed as standalone atoms by the parser, which calls back
/// into the lexer in the appropriate mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// Top-level pattern syntax.
    Default,
    /// Inside `[...]` / `[^...]`.
    BExp,
    /// Inside `\u{...}`.
    CpExp,
    /// Inside `\p{...}`.
    CharPropExp,
    /// Inside `\f{...}`.
    FragmentExp,
}

/// Stateful reader over a pattern's characters, producing one [`Token`] at
/// a time under an explicit [`LexMode`].
pub struct PatternLexer<'a> {
    chars: Vec<(usize, char)>,
    src_len: usize,
    pos: usize,
    kind_name: &'a str,
    is_fragment: bool,
    /// True only immediately after consuming `[` or `[^`: governs whether a
    /// leading `^`/`]` is a literal or a lexer-level special.
    at_bracket_start: bool,
}

impl<'a> PatternLexer<'a> {
    /// Build a lexer over `pattern`, tagging any errors with `kind_name`.
    pub fn new(pattern: &str, kind_name: &'a str, is_fragment: bool) -> Self {
        let chars: Vec<(usize, char)> = pattern.char_indices().collect();
        let src_len = pattern.len();
        Self { chars, src_len, pos: 0, kind_name, is_fragment, at_bracket_start: false }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).map(|(_, c)| *c)
    }

    fn byte_offset(&self, idx: usize) -> usize {
        self.chars.get(idx).map_or(self.src_len, |(b, _)| *b)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek(0);
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn span_from(&self, start_idx: usize) -> Span {
        Span::new(self.byte_offset(start_idx), self.byte_offset(self.pos))
    }

    fn err(&self, code: &'static str, message: impl Into<String>, start_idx: usize) -> PatternError {
        PatternError::new(code, message, self.span_from(start_idx), self.kind_name, self.is_fragment)
    }

    /// Produce the next token under `mode`.
    pub fn next_token(&mut self, mode: LexMode) -> Result<Token, PatternError> {
        match mode {
            LexMode::Default => self.next_default(),
            LexMode::BExp => self.next_bexp(),
            LexMode::CpExp => self.next_cp_exp(),
            LexMode::CharPropExp => self.next_symbol_body(codes::INVALID_CHAR_PROPERTY_SYMBOL),
            LexMode::FragmentExp => self.next_symbol_body(codes::INVALID_FRAGMENT_SYMBOL),
        }
    }

    fn next_default(&mut self) -> Result<Token, PatternError> {
        let start = self.pos;
        let Some(c) = self.advance() else {
            return Ok(Token { kind: TokKind::Eof, span: self.span_from(start) });
        };
        let kind = match c {
            '.' => TokKind::Dot,
            '*' => TokKind::Star,
            '+' => TokKind::Plus,
            '?' => TokKind::Question,
            '|' => TokKind::Pipe,
            '(' => TokKind::LParen,
            ')' => TokKind::RParen,
            '[' => {
                if self.peek(0) == Some('^') {
                    self.advance();
                    self.at_bracket_start = true;
                    TokKind::LBracketCaret
                } else {
                    self.at_bracket_start = true;
                    TokKind::LBracket
                }
            }
            ']' => TokKind::Char(']'),
            '\\' => return self.escape(start),
            other => TokKind::Char(other),
        };
        Ok(Token { kind, span: self.span_from(start) })
    }

    fn escape(&mut self, start: usize) -> Result<Token, PatternError> {
        let Some(c) = self.advance() else {
            return Err(self.err(codes::INCOMPLETE_ESCAPE, "`\\` at end of pattern", start));
        };
        let kind = match c {
            '\\' | '.' | '?' | '*' | '+' | '(' | ')' | '[' | '|' => TokKind::Char(c),
            'u' => TokKind::CodePointLeader,
            'p' => TokKind::CharPropLeader,
            'f' => TokKind::FragmentLeader,
            other => {
                return Err(self.err(
                    codes::INVALID_ESCAPE,
                    format!("`\\{other}` is not a recognized escape"),
                    start,
                ));
            }
        };
        Ok(Token { kind, span: self.span_from(start) })
    }

    fn next_bexp(&mut self) -> Result<Token, PatternError> {
        let start = self.pos;
        let was_at_start = self.at_bracket_start;
        self.at_bracket_start = false;
        let Some(c) = self.advance() else {
            return Err(self.err(codes::BEXP_UNCLOSED, "unclosed bracket expression", start));
        };
        let kind = match c {
            ']' if !was_at_start => TokKind::RBracket,
            '-' if !was_at_start && self.peek(0) != Some(']') && self.peek(0).is_some() => {
                TokKind::Dash
            }
            '\\' => {
                let Some(e) = self.advance() else {
                    return Err(self.err(codes::INCOMPLETE_ESCAPE, "`\\` at end of pattern", start));
                };
                match e {
                    '^' | '-' | ']' | '\\' => TokKind::Char(e),
                    other => {
                        return Err(self.err(
                            codes::INVALID_ESCAPE,
                            format!("`\\{other}` is not a recognized escape inside `[...]`"),
                            start,
                        ));
                    }
                }
            }
            other => TokKind::Char(other),
        };
        Ok(Token { kind, span: self.span_from(start) })
    }

    fn next_cp_exp(&mut self) -> Result<Token, PatternError> {
        let start = self.pos;
        match self.advance() {
            Some('{') => Ok(Token { kind: TokKind::LBrace, span: self.span_from(start) }),
            Some('}') => Ok(Token { kind: TokKind::RBrace, span: self.span_from(start) }),
            Some(c) if c.is_ascii_hexdigit() => {
                let mut digits = String::new();
                digits.push(c);
                while let Some(d) = self.peek(0) {
                    if d.is_ascii_hexdigit() {
                        digits.push(d);
                        self.advance();
                    } else {
                        break;
                    }
                }
                if digits.len() != 4 && digits.len() != 6 {
                    return Err(self.err(
                        codes::INVALID_CODE_POINT,
                        format!("code point must have 4 or 6 hex digits, got {}", digits.len()),
                        start,
                    ));
                }
                Ok(Token { kind: TokKind::HexDigits(digits), span: self.span_from(start) })
            }
            Some(other) => Err(self.err(
                codes::INVALID_CODE_POINT,
                format!("unexpected `{other}` in code-point expression"),
                start,
            )),
            None => Err(self.err(codes::INVALID_CODE_POINT, "unterminated code-point expression", start)),
        }
    }

    /// Shared implementation for `\p{...}` and `\f{...}` bodies: collects
    /// everything up to the matching `}`, stripping whitespace, and hands
    /// back the braces as their own tokens so the parser can validate
    /// structure.
    fn next_symbol_body(&mut self, invalid_code: &'static str) -> Result<Token, PatternError> {
        let start = self.pos;
        match self.advance() {
            Some('{') => Ok(Token { kind: TokKind::LBrace, span: self.span_from(start) }),
            Some('}') => Ok(Token { kind: TokKind::RBrace, span: self.span_from(start) }),
            Some(c) => {
                let mut body = String::new();
                if !c.is_whitespace() {
                    body.push(c);
                }
                while let Some(d) = self.peek(0) {
                    if d == '}' {
                        break;
                    }
                    self.advance();
                    if !d.is_whitespace() {
                        body.push(d);
                    }
                }
                if body.is_empty() {
                    return Err(self.err(invalid_code, "empty symbol body", start));
                }
                Ok(Token { kind: TokKind::SymbolBody(body), span: self.span_from(start) })
            }
            None => Err(self.err(invalid_code, "unterminated expression", start)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pattern: &str) -> Vec<TokKind> {
        let mut lexer = PatternLexer::new(pattern, "t", false);
        let mut mode = LexMode::Default;
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token(mode).expect("should lex");
            let done = matches!(tok.kind, TokKind::Eof);
            match &tok.kind {
                TokKind::LBracket | TokKind::LBracketCaret => mode = LexMode::BExp,
                TokKind::RBracket => mode = LexMode::Default,
                TokKind::CodePointLeader => mode = LexMode::CpExp,
                TokKind::RBrace => mode = LexMode::Default,
                _ => {}
            }
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_ordinary_chars_and_structural_tokens() {
        assert_eq!(
            tokens("a|b"),
            vec![TokKind::Char('a'), TokKind::Pipe, TokKind::Char('b'), TokKind::Eof]
        );
    }

    #[test]
    fn bracket_open_distinguishes_caret_negation() {
        assert_eq!(
            tokens("[^a]"),
            vec![TokKind::LBracketCaret, TokKind::Char('a'), TokKind::RBracket, TokKind::Eof]
        );
    }

    #[test]
    fn leading_caret_outside_bracket_start_is_literal() {
        // A `^` anywhere except immediately after `[` is an ordinary char in
        // default mode (this dialect has no anchors).
        assert_eq!(tokens("^"), vec![TokKind::Char('^'), TokKind::Eof]);
    }

    #[test]
    fn dash_inside_bracket_is_range_only_between_symbols() {
        assert_eq!(
            tokens("[a-z]"),
            vec![
                TokKind::LBracket,
                TokKind::Char('a'),
                TokKind::Dash,
                TokKind::Char('z'),
                TokKind::RBracket,
                TokKind::Eof
            ]
        );
    }

    #[test]
    fn trailing_dash_before_close_bracket_is_literal() {
        assert_eq!(
            tokens("[a-]"),
            vec![
                TokKind::LBracket,
                TokKind::Char('a'),
                TokKind::Char('-'),
                TokKind::RBracket,
                TokKind::Eof
            ]
        );
    }

    #[test]
    fn leading_dash_at_bracket_start_is_literal() {
        assert_eq!(
            tokens("[-a]"),
            vec![
                TokKind::LBracket,
                TokKind::Char('-'),
                TokKind::Char('a'),
                TokKind::RBracket,
                TokKind::Eof
            ]
        );
    }

    #[test]
    fn escape_of_special_chars_yields_literal() {
        for c in ['\\', '.', '?', '*', '+', '(', ')', '[', '|'] {
            let pattern = format!("\\{c}");
            assert_eq!(tokens(&pattern), vec![TokKind::Char(c), TokKind::Eof], "escaping {c}");
        }
    }

    #[test]
    fn escape_at_end_of_pattern_is_incomplete_escape() {
        let mut lexer = PatternLexer::new("a\\", "t", false);
        lexer.next_token(LexMode::Default).unwrap();
        let err = lexer.next_token(LexMode::Default).unwrap_err();
        assert_eq!(err.code, lexforge_diagnostics::codes::INCOMPLETE_ESCAPE);
    }

    #[test]
    fn unrecognized_escape_is_invalid_escape() {
        let mut lexer = PatternLexer::new("\\q", "t", false);
        let err = lexer.next_token(LexMode::Default).unwrap_err();
        assert_eq!(err.code, lexforge_diagnostics::codes::INVALID_ESCAPE);
    }

    #[test]
    fn code_point_leader_enters_cp_exp_and_reads_hex_digits() {
        let mut lexer = PatternLexer::new("\\u{0041}", "t", false);
        assert_eq!(lexer.next_token(LexMode::Default).unwrap().kind, TokKind::CodePointLeader);
        assert_eq!(lexer.next_token(LexMode::CpExp).unwrap().kind, TokKind::LBrace);
        assert_eq!(
            lexer.next_token(LexMode::CpExp).unwrap().kind,
            TokKind::HexDigits("0041".to_string())
        );
        assert_eq!(lexer.next_token(LexMode::CpExp).unwrap().kind, TokKind::RBrace);
    }

    #[test]
    fn code_point_rejects_wrong_digit_count() {
        let mut lexer = PatternLexer::new("{041}", "t", false);
        lexer.next_token(LexMode::CpExp).unwrap();
        let err = lexer.next_token(LexMode::CpExp).unwrap_err();
        assert_eq!(err.code, lexforge_diagnostics::codes::INVALID_CODE_POINT);
    }

    #[test]
    fn symbol_body_strips_whitespace_for_fragment_and_char_prop() {
        let mut lexer = PatternLexer::new("{ gc = lu }", "t", false);
        assert_eq!(lexer.next_token(LexMode::CharPropExp).unwrap().kind, TokKind::LBrace);
        assert_eq!(
            lexer.next_token(LexMode::CharPropExp).unwrap().kind,
            TokKind::SymbolBody("gc=lu".to_string())
        );
        assert_eq!(lexer.next_token(LexMode::CharPropExp).unwrap().kind, TokKind::RBrace);
    }

    #[test]
    fn empty_symbol_body_is_rejected() {
        let mut lexer = PatternLexer::new("{}", "t", false);
        lexer.next_token(LexMode::FragmentExp).unwrap();
        let err = lexer.next_token(LexMode::FragmentExp).unwrap_err();
        assert_eq!(err.code, lexforge_diagnostics::codes::INVALID_FRAGMENT_SYMBOL);
    }

    #[test]
    fn unclosed_bracket_is_an_error() {
        let mut lexer = PatternLexer::new("[a", "t", false);
        lexer.next_token(LexMode::Default).unwrap();
        lexer.next_token(LexMode::BExp).unwrap();
        let err = lexer.next_token(LexMode::BExp).unwrap_err();
        assert_eq!(err.code, lexforge_diagnostics::codes::BEXP_UNCLOSED);
    }

    #[test]
    fn close_bracket_right_after_open_is_literal_at_start() {
        // `]` immediately after `[` is a literal character (it cannot close
        // an empty bracket expression via the lexer alone; the parser
        // reports `BExpNoElem` if the bracket ends up truly empty).
        let mut lexer = PatternLexer::new("[]a]", "t", false);
        assert_eq!(lexer.next_token(LexMode::Default).unwrap().kind, TokKind::LBracket);
        assert_eq!(lexer.next_token(LexMode::BExp).unwrap().kind, TokKind::Char(']'));
        assert_eq!(lexer.next_token(LexMode::BExp).unwrap().kind, TokKind::Char('a'));
        assert_eq!(lexer.next_token(LexMode::BExp).unwrap().kind, TokKind::RBracket);
    }
}
