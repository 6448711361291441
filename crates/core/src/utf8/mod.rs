//! UTF-8 expansion: lowers code-point ranges into byte-range sequences
//! (§4.3) and lowers a whole [`crate::pattern::Cpt`] into a
//! [`crate::automaton::byte_ast::ByteAst`].

pub mod byteset;

pub use byteset::{ByteRange, ByteRangeSeq, expand_range};

use crate::automaton::byte_ast::ByteAst;
use crate::pattern::Cpt;

/// Lower a code-point tree into a byte AST by expanding every `Symbol` leaf
/// into its UTF-8 byte-range-sequence disjunction and every `Concat`/`Alt`
/// accordingly. `Fragment` wrapper nodes are transparent (already resolved
/// by the time this runs; see [`crate::pattern::fragment`]).
#[must_use]
pub fn lower_to_byte_ast(cpt: &Cpt) -> ByteAst {
    match cpt {
        Cpt::Symbol(from, to) => {
            let seqs = expand_range(*from, *to);
            lower_sequences(seqs)
        }
        Cpt::Concat(l, r) => {
            ByteAst::Concat(Box::new(lower_to_byte_ast(l)), Box::new(lower_to_byte_ast(r)))
        }
        Cpt::Alt(l, r) => {
            ByteAst::Alt(Box::new(lower_to_byte_ast(l)), Box::new(lower_to_byte_ast(r)))
        }
        Cpt::Repeat(l) => ByteAst::Repeat(Box::new(lower_to_byte_ast(l))),
        Cpt::Opt(l) => ByteAst::Opt(Box::new(lower_to_byte_ast(l))),
        Cpt::Fragment(_, body) => lower_to_byte_ast(body),
        Cpt::FragmentRef(name) => {
            unreachable!("fragment reference `{name}` reached byte-AST lowering unresolved")
        }
    }
}

/// Turn a list of byte-range sequences (each 1..=4 ranges long) into a
/// `ByteAst` disjunction of range-concatenations.
///
/// A code-point range lying entirely within the surrogate gap
/// `D800..=DFFF` has no well-formed UTF-8 encoding and lowers to zero
/// sequences; the parser rejects that case before it reaches here (see
/// `pattern::parser`), but this stays tolerant of it by lowering to an
/// inverted, never-matching byte range rather than panicking.
fn lower_sequences(seqs: Vec<ByteRangeSeq>) -> ByteAst {
    let mut nodes = seqs.into_iter().map(|seq| {
        let mut iter = seq.into_iter().map(|(lo, hi)| ByteAst::Symbol(lo, hi));
        let first = iter.next().expect("a byte-range sequence always has >=1 byte");
        iter.fold(first, |acc, n| ByteAst::Concat(Box::new(acc), Box::new(n)))
    });
    let Some(first) = nodes.next() else {
        return ByteAst::Symbol(1, 0);
    };
    nodes.fold(first, |acc, n| ByteAst::Alt(Box::new(acc), Box::new(n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_code_point_range_entirely_in_the_surrogate_gap_lowers_without_panicking() {
        // The parser rejects this before it reaches here; this guards the
        // lowering step itself against ever reaching it some other way.
        let ast = lower_to_byte_ast(&Cpt::Symbol(0xD800, 0xDFFF));
        assert!(matches!(ast, ByteAst::Symbol(lo, hi) if lo > hi));
    }
}
