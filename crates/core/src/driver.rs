//! Lexer driver (§4.7): longest-match streaming scan over a compiled
//! lexical spec, with mode transitions, error coalescing, and code-point
//! row/column tracking.

use lexforge_diagnostics::codes;

use crate::compiled::{CompiledLexicalSpec, CompiledModeSpec, LEX_MODE_ID_NIL, LEX_MODE_KIND_ID_NIL};

/// A token produced by [`Lexer::next`] (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The mode this token was matched in.
    pub mode_id: u32,
    /// That mode's name.
    pub mode_name: String,
    /// Global kind id (`0` for an invalid or EOF token).
    pub kind_id: u32,
    /// Mode-local kind id (`0` for an invalid or EOF token).
    pub mode_kind_id: u32,
    /// Kind name (empty for an invalid or EOF token).
    pub kind_name: String,
    /// 0-indexed row (code points), counted from the start of input.
    pub row: usize,
    /// 0-indexed column (code points) within `row`.
    pub col: usize,
    /// The matched bytes. Empty for the terminal EOF token.
    pub bytes: Vec<u8>,
    /// True for the single terminal token signaling end of input.
    pub eof: bool,
    /// True when `bytes` did not match any enabled pattern in this mode.
    pub invalid: bool,
}

/// Errors [`Lexer`] surfaces for internal invariant violations. All other
/// non-well-formedness is reported through the invalid-token channel
/// instead of failing the call (§4.7, §7).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// A pop with no push in the same step would have left the mode stack
    /// empty.
    #[error("cannot pop the last remaining mode from the stack")]
    ModeStackUnderflow,
}

impl DriverError {
    /// The diagnostic code for this error (§7).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            DriverError::ModeStackUnderflow => codes::MODE_STACK_UNDERFLOW,
        }
    }
}

/// Construction options for [`Lexer::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LexerOptions {
    /// When true, accepting a token never pushes or pops the mode stack
    /// automatically; the embedder drives [`Lexer::push_mode`] /
    /// [`Lexer::pop_mode`] itself (§4.7 S4).
    pub disable_mode_transition: bool,
}

/// What one scan attempt from the current cursor found.
enum ScanOutcome {
    /// A pattern matched; `len` bytes long, accepted by `mode_kind_id`.
    Accepted { len: usize, mode_kind_id: u32 },
    /// No pattern matched; `len` (always `>= 1`) bytes are unrecognized.
    Invalid { len: usize },
    /// The cursor was already at the end of input.
    Eof,
}

/// Streams `input` through a [`CompiledLexicalSpec`], producing one
/// [`Token`] per [`Lexer::next`] call (§4.7, §5). Reads its entire input
/// into memory on construction; owns its cursor, mode stack, and one-token
/// lookahead buffer exclusively. Many `Lexer`s may run concurrently against
/// the same `&CompiledLexicalSpec`.
pub struct Lexer<'spec> {
    spec: &'spec CompiledLexicalSpec,
    input: Vec<u8>,
    cursor: usize,
    row: usize,
    col: usize,
    mode_stack: Vec<u32>,
    pending: Option<Token>,
    disable_mode_transition: bool,
}

impl<'spec> Lexer<'spec> {
    /// Build a driver over `input`, starting in `spec`'s initial mode.
    #[must_use]
    pub fn new(spec: &'spec CompiledLexicalSpec, input: impl Into<Vec<u8>>, options: LexerOptions) -> Self {
        Self {
            spec,
            input: input.into(),
            cursor: 0,
            row: 0,
            col: 0,
            mode_stack: vec![spec.initial_mode_id],
            pending: None,
            disable_mode_transition: options.disable_mode_transition,
        }
    }

    /// The current mode id (top of the mode stack).
    #[must_use]
    pub fn mode(&self) -> u32 {
        *self.mode_stack.last().expect("mode stack invariant: always non-empty")
    }

    /// Push `mode_id` onto the mode stack.
    pub fn push_mode(&mut self, mode_id: u32) {
        self.mode_stack.push(mode_id);
    }

    /// Pop the current mode, failing if it is the last one on the stack.
    ///
    /// # Errors
    /// Returns [`DriverError::ModeStackUnderflow`] if the stack has only one
    /// entry.
    pub fn pop_mode(&mut self) -> Result<(), DriverError> {
        if self.mode_stack.len() <= 1 {
            return Err(DriverError::ModeStackUnderflow);
        }
        self.mode_stack.pop();
        Ok(())
    }

    /// Produce the next token.
    ///
    /// # Errors
    /// Returns [`DriverError::ModeStackUnderflow`] only for the internal
    /// invariant described there; every other form of malformed input is
    /// surfaced as an invalid token instead (§4.7, §7).
    pub fn next(&mut self) -> Result<Token, DriverError> {
        if let Some(tok) = self.pending.take() {
            return Ok(tok);
        }
        let mut merged = self.scan_and_finalize()?;
        if !merged.invalid {
            return Ok(merged);
        }
        loop {
            let tok = self.scan_and_finalize()?;
            if tok.invalid && !tok.bytes.is_empty() {
                merged.bytes.extend(tok.bytes);
                continue;
            }
            self.pending = Some(tok);
            break;
        }
        Ok(merged)
    }

    fn current_mode_spec(&self) -> &CompiledModeSpec {
        self.spec.mode(self.mode())
    }

    /// Longest-match scan from the current cursor, in the current mode.
    fn scan_one(&self) -> ScanOutcome {
        let mode = self.current_mode_spec();
        let mut state = mode.dfa.initial_state_id;
        let mut pos = self.cursor;
        let mut last_accept: Option<(usize, u32)> = None;

        loop {
            let Some(&byte) = self.input.get(pos) else { break };
            let next = mode.dfa.delta(state, byte);
            if next == 0 {
                break;
            }
            state = next;
            pos += 1;
            // Acceptance is only recorded after consuming at least one
            // byte: a nullable pattern's initial state is accepting before
            // any input is read, but a zero-length match must never win —
            // otherwise a dead transition right after it would produce an
            // empty, non-invalid token forever.
            let mk = mode.accepting_mode_kind(state);
            if mk != LEX_MODE_KIND_ID_NIL {
                last_accept = Some((pos, mk));
            }
        }

        if let Some((end, mode_kind_id)) = last_accept {
            return ScanOutcome::Accepted { len: end - self.cursor, mode_kind_id };
        }
        if pos == self.cursor {
            if pos >= self.input.len() {
                return ScanOutcome::Eof;
            }
            pos += 1;
        }
        ScanOutcome::Invalid { len: pos - self.cursor }
    }

    /// Run one scan attempt, advance `cursor`/`row`/`col` over its bytes,
    /// apply mode transitions for an accepted token, and build the `Token`.
    fn scan_and_finalize(&mut self) -> Result<Token, DriverError> {
        let mode_id = self.mode();
        let start_row = self.row;
        let start_col = self.col;
        let start = self.cursor;

        match self.scan_one() {
            ScanOutcome::Eof => Ok(Token {
                mode_id,
                mode_name: self.spec.mode_names[mode_id as usize].clone(),
                kind_id: 0,
                mode_kind_id: 0,
                kind_name: String::new(),
                row: start_row,
                col: start_col,
                bytes: Vec::new(),
                eof: true,
                invalid: false,
            }),
            ScanOutcome::Invalid { len } => {
                let bytes = self.input[start..start + len].to_vec();
                self.advance(len);
                Ok(Token {
                    mode_id,
                    mode_name: self.spec.mode_names[mode_id as usize].clone(),
                    kind_id: 0,
                    mode_kind_id: 0,
                    kind_name: String::new(),
                    row: start_row,
                    col: start_col,
                    bytes,
                    eof: false,
                    invalid: true,
                })
            }
            ScanOutcome::Accepted { len, mode_kind_id } => {
                let bytes = self.input[start..start + len].to_vec();
                self.advance(len);
                let mode_spec = self.spec.mode(mode_id);
                let kind_id = mode_spec.global_kind_id[mode_kind_id as usize];
                let kind_name = mode_spec.kind_names[mode_kind_id as usize].clone();
                self.apply_mode_transition(mode_spec, mode_kind_id)?;
                Ok(Token {
                    mode_id,
                    mode_name: self.spec.mode_names[mode_id as usize].clone(),
                    kind_id,
                    mode_kind_id,
                    kind_name,
                    row: start_row,
                    col: start_col,
                    bytes,
                    eof: false,
                    invalid: false,
                })
            }
        }
    }

    /// Advance the cursor and code-point row/column counters over `len`
    /// bytes starting at the (pre-advance) cursor.
    fn advance(&mut self, len: usize) {
        for &b in &self.input[self.cursor..self.cursor + len] {
            if b == b'\n' {
                self.row += 1;
                self.col = 0;
            } else if b < 0x80 || (b >> 5) == 0b110 || (b >> 4) == 0b1110 || (b >> 3) == 0b1_1110 {
                self.col += 1;
            }
        }
        self.cursor += len;
    }

    fn apply_mode_transition(
        &mut self,
        mode_spec: &CompiledModeSpec,
        mode_kind_id: u32,
    ) -> Result<(), DriverError> {
        if self.disable_mode_transition {
            return Ok(());
        }
        let pop = mode_spec.pop[mode_kind_id as usize];
        let push = mode_spec.push[mode_kind_id as usize];
        if pop && self.mode_stack.len() == 1 && push == LEX_MODE_ID_NIL {
            return Err(DriverError::ModeStackUnderflow);
        }
        if pop {
            self.mode_stack.pop();
        }
        if push != LEX_MODE_ID_NIL {
            self.mode_stack.push(push);
        }
        Ok(())
    }
}
