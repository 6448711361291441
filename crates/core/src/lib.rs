//! Regex-to-DFA lexical specification compiler and streaming token driver.
//!
//! Two tightly coupled subsystems live here:
//!
//! - [`compile`] orchestrates the compiler pipeline: [`pattern`] parses each
//!   entry's pattern into a code-point tree, fragments are resolved, [`utf8`]
//!   lowers the tree into a byte AST, [`automaton`] assigns positions,
//!   computes attributes and the follow table, subset-constructs a DFA, and
//!   compresses its transition table.
//! - [`driver`] streams an input byte sequence through the resulting
//!   [`compiled::CompiledLexicalSpec`], producing a lazy, non-restartable
//!   sequence of [`driver::Token`]s.
//!
//! [`spec`] defines the input document; [`document`] defines the
//! JSON-serializable compiled-spec document exchanged with the CLI.

#![warn(missing_docs)]

pub mod automaton;
pub mod codegen;
pub mod compile;
pub mod compiled;
pub mod document;
pub mod driver;
pub mod error;
pub mod pattern;
pub mod spec;
pub mod utf8;

pub use compile::compile;
pub use compiled::CompiledLexicalSpec;
pub use driver::{DriverError, Lexer, LexerOptions, Token};
pub use error::CompileError;
pub use spec::{LexicalSpec, SpecEntry};
