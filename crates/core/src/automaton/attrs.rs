//! Nullable/first/last attribute computation and the follow table (§4.4).

use std::collections::{BTreeSet, HashMap};

use super::position::{IndexedNode, Position};

/// Memoized attributes for one node: whether it matches the empty string,
/// and its first/last position sets.
#[derive(Debug, Clone)]
pub struct Attrs {
    /// Whether this subtree accepts the empty string.
    pub nullable: bool,
    /// Positions that can match the first byte consumed by this subtree.
    pub first: BTreeSet<Position>,
    /// Positions that can match the last byte consumed by this subtree.
    pub last: BTreeSet<Position>,
}

/// `Position -> Set<Position>`: positions reachable by consuming one more
/// byte after a given position.
pub type FollowTable = HashMap<Position, BTreeSet<Position>>;

/// Compute the root's [`Attrs`] and the mode's [`FollowTable`] in a single
/// bottom-up pass (§4.4).
#[must_use]
pub fn compute_attrs(ast: &IndexedNode) -> (Attrs, FollowTable) {
    let mut follow = FollowTable::new();
    let root = visit(ast, &mut follow);
    (root, follow)
}

fn visit(node: &IndexedNode, follow: &mut FollowTable) -> Attrs {
    match node {
        IndexedNode::Leaf(pos) => {
            Attrs { nullable: false, first: BTreeSet::from([*pos]), last: BTreeSet::from([*pos]) }
        }
        IndexedNode::Concat(l, r) => {
            let al = visit(l, follow);
            let ar = visit(r, follow);
            for p in &al.last {
                follow.entry(*p).or_default().extend(ar.first.iter().copied());
            }
            let mut first = al.first.clone();
            if al.nullable {
                first.extend(ar.first.iter().copied());
            }
            let mut last = ar.last.clone();
            if ar.nullable {
                last.extend(al.last.iter().copied());
            }
            Attrs { nullable: al.nullable && ar.nullable, first, last }
        }
        IndexedNode::Alt(l, r) => {
            let al = visit(l, follow);
            let ar = visit(r, follow);
            let first: BTreeSet<Position> = al.first.union(&ar.first).copied().collect();
            let last: BTreeSet<Position> = al.last.union(&ar.last).copied().collect();
            Attrs { nullable: al.nullable || ar.nullable, first, last }
        }
        IndexedNode::Repeat(l) => {
            let a = visit(l, follow);
            for p in &a.last {
                follow.entry(*p).or_default().extend(a.first.iter().copied());
            }
            Attrs { nullable: true, first: a.first, last: a.last }
        }
        IndexedNode::Opt(l) => {
            let a = visit(l, follow);
            Attrs { nullable: true, first: a.first, last: a.last }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::byte_ast::ByteAst;
    use crate::automaton::position::assign_positions;

    fn leaf(from: u8, to: u8) -> ByteAst {
        ByteAst::Symbol(from, to)
    }

    fn indexed(ast: &ByteAst) -> (IndexedNode, crate::automaton::position::SymbolTable) {
        assign_positions(ast, "m").expect("fits in 15 bits")
    }

    #[test]
    fn leaf_is_never_nullable_and_is_its_own_first_and_last() {
        let ast = leaf(b'a', b'a');
        let (indexed, _) = indexed(&ast);
        let (attrs, follow) = compute_attrs(&indexed);
        assert!(!attrs.nullable);
        assert_eq!(attrs.first, attrs.last);
        assert_eq!(attrs.first.len(), 1);
        assert!(follow.is_empty());
    }

    #[test]
    fn concat_follow_links_last_of_left_to_first_of_right() {
        let ast = ByteAst::Concat(Box::new(leaf(b'a', b'a')), Box::new(leaf(b'b', b'b')));
        let (indexed, _) = indexed(&ast);
        let (attrs, follow) = compute_attrs(&indexed);
        assert!(!attrs.nullable);
        assert_eq!(attrs.first.len(), 1);
        assert_eq!(attrs.last.len(), 1);
        let p_left = *attrs.first.iter().next().unwrap();
        let p_right = *attrs.last.iter().next().unwrap();
        assert_eq!(follow.get(&p_left), Some(&BTreeSet::from([p_right])));
    }

    #[test]
    fn alt_unions_first_and_last() {
        let ast = ByteAst::Alt(Box::new(leaf(b'a', b'a')), Box::new(leaf(b'b', b'b')));
        let (indexed, _) = indexed(&ast);
        let (attrs, _) = compute_attrs(&indexed);
        assert!(!attrs.nullable);
        assert_eq!(attrs.first.len(), 2);
        assert_eq!(attrs.last.len(), 2);
    }

    #[test]
    fn repeat_is_nullable_and_follows_itself() {
        let ast = ByteAst::Repeat(Box::new(leaf(b'a', b'a')));
        let (indexed, _) = indexed(&ast);
        let (attrs, follow) = compute_attrs(&indexed);
        assert!(attrs.nullable);
        let p = *attrs.first.iter().next().unwrap();
        assert_eq!(follow.get(&p), Some(&BTreeSet::from([p])));
    }

    #[test]
    fn opt_is_nullable_without_adding_follow_edges() {
        let ast = ByteAst::Opt(Box::new(leaf(b'a', b'a')));
        let (indexed, _) = indexed(&ast);
        let (attrs, follow) = compute_attrs(&indexed);
        assert!(attrs.nullable);
        assert!(follow.is_empty());
    }

    #[test]
    fn nullable_concat_left_propagates_first_of_right_into_first() {
        // `a?b`: nullable left means `first` includes `first(right)` too.
        let ast = ByteAst::Concat(
            Box::new(ByteAst::Opt(Box::new(leaf(b'a', b'a')))),
            Box::new(leaf(b'b', b'b')),
        );
        let (indexed, _) = indexed(&ast);
        let (attrs, _) = compute_attrs(&indexed);
        assert_eq!(attrs.first.len(), 2);
    }
}
