//! Code-point tree (CPT): the pattern AST before UTF-8 lowering (§3).

/// A code-point tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cpt {
    /// An inclusive code-point range `from..=to`.
    Symbol(u32, u32),
    /// `l` followed by `r`.
    Concat(Box<Cpt>, Box<Cpt>),
    /// `l` or `r`.
    Alt(Box<Cpt>, Box<Cpt>),
    /// Zero or more repetitions of `l` (Kleene star).
    Repeat(Box<Cpt>),
    /// Zero or one occurrence of `l`.
    Opt(Box<Cpt>),
    /// A fully expanded fragment body, retained only for diagnostics
    /// (e.g. reporting which fragment a range-order error originated in).
    Fragment(String, Box<Cpt>),
    /// An unresolved reference to a fragment by name. Eliminated by
    /// [`crate::pattern::fragment::resolve_fragments`] before any pattern
    /// entry's CPT is handed to the byte-AST lowering stage.
    FragmentRef(String),
}

impl Cpt {
    /// Build a left-associative concatenation of a non-empty list of nodes.
    #[must_use]
    pub fn concat_all(mut nodes: Vec<Cpt>) -> Cpt {
        let first = nodes.remove(0);
        nodes.into_iter().fold(first, |acc, n| Cpt::Concat(Box::new(acc), Box::new(n)))
    }

    /// `l+`, desugared to `Concat(l, Repeat(copy(l)))` per §3.
    #[must_use]
    pub fn one_or_more(l: Cpt) -> Cpt {
        Cpt::Concat(Box::new(l.clone()), Box::new(Cpt::Repeat(Box::new(l))))
    }

    /// Recursively substitute every [`Cpt::FragmentRef`] whose name is a key
    /// of `bodies` with a clone of its resolved body, wrapped in
    /// [`Cpt::Fragment`]. Returns the set of reference names for which no
    /// substitution was available (left untouched in the returned tree).
    pub(crate) fn substitute_fragments(
        self,
        bodies: &std::collections::HashMap<String, Cpt>,
        unresolved: &mut Vec<String>,
    ) -> Cpt {
        match self {
            Cpt::Symbol(a, b) => Cpt::Symbol(a, b),
            Cpt::Concat(l, r) => Cpt::Concat(
                Box::new(l.substitute_fragments(bodies, unresolved)),
                Box::new(r.substitute_fragments(bodies, unresolved)),
            ),
            Cpt::Alt(l, r) => Cpt::Alt(
                Box::new(l.substitute_fragments(bodies, unresolved)),
                Box::new(r.substitute_fragments(bodies, unresolved)),
            ),
            Cpt::Repeat(l) => Cpt::Repeat(Box::new(l.substitute_fragments(bodies, unresolved))),
            Cpt::Opt(l) => Cpt::Opt(Box::new(l.substitute_fragments(bodies, unresolved))),
            Cpt::Fragment(name, body) => {
                Cpt::Fragment(name, Box::new(body.substitute_fragments(bodies, unresolved)))
            }
            Cpt::FragmentRef(name) => match bodies.get(&name) {
                Some(body) => Cpt::Fragment(name, Box::new(body.clone())),
                None => {
                    unresolved.push(name.clone());
                    Cpt::FragmentRef(name)
                }
            },
        }
    }

    /// True if this subtree still contains an unresolved fragment reference.
    pub(crate) fn has_unresolved_refs(&self) -> bool {
        match self {
            Cpt::Symbol(..) => false,
            Cpt::FragmentRef(_) => true,
            Cpt::Concat(l, r) | Cpt::Alt(l, r) => {
                l.has_unresolved_refs() || r.has_unresolved_refs()
            }
            Cpt::Repeat(l) | Cpt::Opt(l) => l.has_unresolved_refs(),
            Cpt::Fragment(_, body) => body.has_unresolved_refs(),
        }
    }
}

/// A pattern's CPT tagged with its kind id, ready for UTF-8 lowering (§3's
/// `Root(body, id)`).
#[derive(Debug, Clone)]
pub struct RootCpt {
    /// Global kind id this pattern accepts when matched.
    pub kind_id: u32,
    /// Kind name, for diagnostics.
    pub kind_name: String,
    /// The pattern's expanded code-point tree.
    pub body: Cpt,
}
