//! Byte AST (§3): the tree produced by lowering a mode's patterns into
//! byte-range leaves plus one `EndMarker` per pattern.

/// A byte-AST node.
#[derive(Debug, Clone)]
pub enum ByteAst {
    /// An inclusive byte range `from..=to`.
    Symbol(u8, u8),
    /// `l` followed by `r`.
    Concat(Box<ByteAst>, Box<ByteAst>),
    /// `l` or `r`.
    Alt(Box<ByteAst>, Box<ByteAst>),
    /// Zero or more repetitions of `l`.
    Repeat(Box<ByteAst>),
    /// Zero or one occurrence of `l`.
    Opt(Box<ByteAst>),
    /// Synthetic leaf marking acceptance of `kind_id` when reachable.
    EndMarker(u32),
}

/// Combine every enabled pattern's byte AST for one mode into a single
/// tree: `Alt(Concat(body_1, EndMarker(kind_1)), Concat(body_2,
/// EndMarker(kind_2)), ...)`, preserving entry order so earlier entries end
/// up with smaller kind ids (§3: "earlier entries win ties").
#[must_use]
pub fn combine_mode_patterns(patterns: Vec<(u32, ByteAst)>) -> ByteAst {
    let mut nodes = patterns
        .into_iter()
        .map(|(kind_id, body)| ByteAst::Concat(Box::new(body), Box::new(ByteAst::EndMarker(kind_id))));
    let first = nodes.next().expect("a mode always has at least one enabled pattern");
    nodes.fold(first, |acc, n| ByteAst::Alt(Box::new(acc), Box::new(n)))
}
