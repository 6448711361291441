//! Byte AST, position assignment, attribute/follow computation, DFA
//! construction, and transition-table compression (§3, §4.4-§4.6).

pub mod attrs;
pub mod byte_ast;
pub mod dfa;
pub mod position;
pub mod table;

pub use byte_ast::{ByteAst, combine_mode_patterns};
pub use dfa::{Dfa, build_dfa};
pub use position::{IndexedNode, Position, SymbolTable, assign_positions};
pub use table::{CompiledDfaTable, CompiledTransition, compile_table};
