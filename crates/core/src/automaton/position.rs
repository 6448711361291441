//! Position assignment (§3, §4.4): numbers every leaf of a mode's combined
//! byte AST, packing a 15-bit index and a 1-bit end-marker flag into one
//! `u16` per §3's "Position" data model.

use std::collections::HashMap;

use lexforge_diagnostics::{Span, codes};

use crate::error::FatalError;

use super::byte_ast::ByteAst;

const MAX_INDEX: u16 = 0x7FFF;
const END_MARKER_BIT: u16 = 0x8000;

/// A packed leaf identifier: bits `0..=14` hold a non-zero index
/// (`1..=32767`), bit 15 flags an end marker. `0` is reserved as "nil".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(u16);

impl Position {
    /// The reserved "no position" sentinel.
    pub const NIL: Position = Position(0);

    fn pack(index: u16, is_end_marker: bool) -> Self {
        debug_assert!((1..=MAX_INDEX).contains(&index));
        Position(index | if is_end_marker { END_MARKER_BIT } else { 0 })
    }

    /// The 15-bit index component, ignoring the end-marker flag.
    #[must_use]
    pub fn index(self) -> u16 {
        self.0 & MAX_INDEX
    }

    /// True if this position identifies an end-marker leaf.
    #[must_use]
    pub fn is_end_marker(self) -> bool {
        self.0 & END_MARKER_BIT != 0
    }

    /// The raw packed 16-bit value.
    #[must_use]
    pub fn raw(self) -> u16 {
        self.0
    }
}

/// A byte AST with every leaf replaced by its assigned [`Position`];
/// internal structure otherwise mirrors [`ByteAst`].
#[derive(Debug, Clone)]
pub enum IndexedNode {
    /// A leaf (symbol or end marker), identified by its position.
    Leaf(Position),
    /// `l` followed by `r`.
    Concat(Box<IndexedNode>, Box<IndexedNode>),
    /// `l` or `r`.
    Alt(Box<IndexedNode>, Box<IndexedNode>),
    /// Zero or more repetitions of `l`.
    Repeat(Box<IndexedNode>),
    /// Zero or one occurrence of `l`.
    Opt(Box<IndexedNode>),
}

/// Per-mode lookup tables keyed by [`Position`] (§3's "Symbol table").
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// `positionOfSymbol -> ByteRange`.
    pub symbol_of: HashMap<Position, (u8, u8)>,
    /// `positionOfEndMarker -> kindId`.
    pub end_marker_kind: HashMap<Position, u32>,
}

/// Number every leaf of `ast` in left-to-right post order, starting at 1,
/// building the [`SymbolTable`] alongside. Fails with `PositionOverflow`
/// if a mode's combined AST needs more than 32767 positions.
pub fn assign_positions(ast: &ByteAst, mode_name: &str) -> Result<(IndexedNode, SymbolTable), FatalError> {
    let mut counter: u16 = 0;
    let mut table = SymbolTable::default();
    let node = assign(ast, &mut counter, &mut table, mode_name)?;
    Ok((node, table))
}

fn next_index(counter: &mut u16, mode_name: &str) -> Result<u16, FatalError> {
    if *counter >= MAX_INDEX {
        return Err(FatalError::new(
            codes::POSITION_OVERFLOW,
            format!("mode `{mode_name}` needs more than {MAX_INDEX} positions"),
            Span::empty(0),
        ));
    }
    *counter += 1;
    Ok(*counter)
}

fn assign(
    ast: &ByteAst,
    counter: &mut u16,
    table: &mut SymbolTable,
    mode_name: &str,
) -> Result<IndexedNode, FatalError> {
    match ast {
        ByteAst::Symbol(from, to) => {
            let pos = Position::pack(next_index(counter, mode_name)?, false);
            table.symbol_of.insert(pos, (*from, *to));
            Ok(IndexedNode::Leaf(pos))
        }
        ByteAst::EndMarker(kind_id) => {
            let pos = Position::pack(next_index(counter, mode_name)?, true);
            table.end_marker_kind.insert(pos, *kind_id);
            Ok(IndexedNode::Leaf(pos))
        }
        ByteAst::Concat(l, r) => {
            let l = assign(l, counter, table, mode_name)?;
            let r = assign(r, counter, table, mode_name)?;
            Ok(IndexedNode::Concat(Box::new(l), Box::new(r)))
        }
        ByteAst::Alt(l, r) => {
            let l = assign(l, counter, table, mode_name)?;
            let r = assign(r, counter, table, mode_name)?;
            Ok(IndexedNode::Alt(Box::new(l), Box::new(r)))
        }
        ByteAst::Repeat(l) => Ok(IndexedNode::Repeat(Box::new(assign(l, counter, table, mode_name)?))),
        ByteAst::Opt(l) => Ok(IndexedNode::Opt(Box::new(assign(l, counter, table, mode_name)?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_leaves_in_left_to_right_post_order_starting_at_one() {
        let ast = ByteAst::Concat(
            Box::new(ByteAst::Symbol(b'a', b'a')),
            Box::new(ByteAst::EndMarker(1)),
        );
        let (indexed, table) = assign_positions(&ast, "m").expect("fits");
        let IndexedNode::Concat(l, r) = indexed else { panic!("expected Concat") };
        let IndexedNode::Leaf(p1) = *l else { panic!("expected Leaf") };
        let IndexedNode::Leaf(p2) = *r else { panic!("expected Leaf") };
        assert_eq!(p1.index(), 1);
        assert_eq!(p2.index(), 2);
        assert!(!p1.is_end_marker());
        assert!(p2.is_end_marker());
        assert_eq!(table.symbol_of[&p1], (b'a', b'a'));
        assert_eq!(table.end_marker_kind[&p2], 1);
    }

    #[test]
    fn position_nil_is_reserved_zero() {
        assert_eq!(Position::NIL.raw(), 0);
    }

    #[test]
    fn end_marker_flag_is_independent_of_index() {
        let ast = ByteAst::Alt(
            Box::new(ByteAst::EndMarker(7)),
            Box::new(ByteAst::Symbol(b'z', b'z')),
        );
        let (_, table) = assign_positions(&ast, "m").expect("fits");
        assert_eq!(table.end_marker_kind.len(), 1);
        assert_eq!(table.symbol_of.len(), 1);
        let end_pos = *table.end_marker_kind.keys().next().unwrap();
        let sym_pos = *table.symbol_of.keys().next().unwrap();
        assert_ne!(end_pos.raw(), sym_pos.raw());
    }

    #[test]
    fn overflow_beyond_max_index_is_a_fatal_error() {
        let mut counter = MAX_INDEX;
        let err = next_index(&mut counter, "overflowing").unwrap_err();
        assert_eq!(err.code, lexforge_diagnostics::codes::POSITION_OVERFLOW);
    }

    #[test]
    fn counter_reaches_max_index_exactly_without_overflowing() {
        let mut counter = MAX_INDEX - 1;
        let idx = next_index(&mut counter, "m").expect("last valid index should succeed");
        assert_eq!(idx, MAX_INDEX);
    }
}
