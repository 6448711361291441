//! Error batching for the compiler pipeline.
//!
//! Parse-time errors are collected per pattern and returned as one batch per
//! mode (see `compile::compile`); semantic and spec-level errors are fatal
//! on first occurrence. Both paths report through
//! [`lexforge_diagnostics::Diagnostic`].

use lexforge_diagnostics::{Diagnostic, Severity, Span};

/// A parse error for a single pattern, tagged with the entry it came from.
#[derive(Debug, Clone)]
pub struct PatternError {
    /// The diagnostic code, e.g. `"LX2004"`.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Location within the pattern source.
    pub span: Span,
    /// Name of the kind (or fragment) whose pattern failed to parse.
    pub kind_name: String,
    /// Whether `kind_name` refers to a fragment entry.
    pub is_fragment: bool,
}

impl PatternError {
    pub(crate) fn new(
        code: &'static str,
        message: impl Into<String>,
        span: Span,
        kind_name: impl Into<String>,
        is_fragment: bool,
    ) -> Self {
        Self { code, message: message.into(), span, kind_name: kind_name.into(), is_fragment }
    }

    /// Convert to a fully formed [`Diagnostic`] for display.
    #[must_use]
    pub fn into_diagnostic(self) -> Diagnostic {
        let severity =
            lexforge_diagnostics::default_severity(self.code).unwrap_or(Severity::Error);
        Diagnostic::new(self.code, severity, self.message, Some(self.span))
            .with_kind(self.kind_name, self.is_fragment)
    }
}

/// A batch of [`PatternError`]s accumulated across every entry in one mode.
#[derive(Debug, Clone, Default)]
pub struct ErrorBatch {
    errors: Vec<PatternError>,
}

impl ErrorBatch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, error: PatternError) {
        self.errors.push(error);
    }

    pub(crate) fn extend(&mut self, other: ErrorBatch) {
        self.errors.extend(other.errors);
    }

    /// True when no error was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate the raw pattern errors, in accumulation order.
    pub fn iter(&self) -> impl Iterator<Item = &PatternError> {
        self.errors.iter()
    }

    /// Convert the whole batch into [`Diagnostic`]s, in accumulation order.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.errors.into_iter().map(PatternError::into_diagnostic).collect()
    }
}

/// A fatal, first-occurrence compiler error: semantic, spec-level, or a
/// compression invariant violation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct FatalError {
    /// The diagnostic code, e.g. `"LX3001"`.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Location, when the error is attributable to a span.
    pub span: Span,
}

impl FatalError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self { code, message: message.into(), span }
    }

    /// Convert to a fully formed [`Diagnostic`] for display.
    #[must_use]
    pub fn into_diagnostic(self) -> Diagnostic {
        let severity =
            lexforge_diagnostics::default_severity(self.code).unwrap_or(Severity::Error);
        Diagnostic::new(self.code, severity, self.message, Some(self.span))
    }
}

/// The top-level result of a compile attempt.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompileError {
    /// One or more patterns in a mode failed to parse; a caller should
    /// display every recorded error, not just the first.
    #[error("{} pattern error(s)", .0.len())]
    Parse(ErrorBatch),
    /// A semantic, spec-level, or compression invariant was violated.
    #[error(transparent)]
    Fatal(#[from] FatalError),
}

impl CompileError {
    /// Flatten into [`Diagnostic`]s for display, regardless of variant.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            CompileError::Parse(batch) => batch.into_diagnostics(),
            CompileError::Fatal(err) => vec![err.into_diagnostic()],
        }
    }
}
