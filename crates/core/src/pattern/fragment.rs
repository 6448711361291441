//! Fragment resolution (§4.2): substitute `\f{name}` references with their
//! bodies until a fixed point, detecting undefined references and cycles.

use std::collections::HashMap;

use lexforge_diagnostics::{Span, codes};

use super::cpt::Cpt;
use crate::error::{ErrorBatch, PatternError};

/// A parsed fragment entry awaiting resolution.
pub struct FragmentDef {
    /// Fragment name.
    pub name: String,
    /// Its (possibly still-unresolved) body.
    pub body: Cpt,
}

/// Resolve every fragment's body against the others until no
/// `FragmentRef` remains, or report the fragments that could not reach a
/// fixed point (undefined reference or cycle).
///
/// Returns a map from fragment name to fully resolved [`Cpt`] on success.
pub fn resolve_fragments(defs: Vec<FragmentDef>) -> Result<HashMap<String, Cpt>, ErrorBatch> {
    let mut bodies: HashMap<String, Cpt> =
        defs.into_iter().map(|d| (d.name, d.body)).collect();

    // Repeatedly substitute references using the current `bodies` map. Each
    // pass can only resolve a reference one level deeper, so a chain of N
    // fragments reaches its fixed point within N passes; a genuine cycle
    // instead stops changing after at most N passes, which this loop
    // recognizes via `progressed` and breaks out of early.
    let max_passes = bodies.len() + 1;
    for _ in 0..max_passes {
        let mut next: HashMap<String, Cpt> = HashMap::with_capacity(bodies.len());
        for (name, body) in &bodies {
            let mut unresolved = Vec::new();
            let substituted = body.clone().substitute_fragments(&bodies, &mut unresolved);
            next.insert(name.clone(), substituted);
        }
        let progressed = next.iter().any(|(name, body)| bodies.get(name) != Some(body));
        bodies = next;
        if !progressed {
            break;
        }
    }

    let mut batch = ErrorBatch::default();
    for (name, body) in &bodies {
        if body.has_unresolved_refs() {
            let dangling = collect_dangling(body);
            batch.push(PatternError::new(
                if dangling.contains(name) { codes::FRAGMENT_CYCLE } else { codes::UNDEFINED_FRAGMENT },
                format!(
                    "fragment `{name}` has unresolved reference(s): {}",
                    dangling.join(", ")
                ),
                Span::empty(0),
                name.clone(),
                true,
            ));
        }
    }
    if batch.is_empty() { Ok(bodies) } else { Err(batch) }
}

fn collect_dangling(cpt: &Cpt) -> Vec<String> {
    let mut names = Vec::new();
    fn walk(cpt: &Cpt, names: &mut Vec<String>) {
        match cpt {
            Cpt::Symbol(..) => {}
            Cpt::FragmentRef(name) => {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            Cpt::Concat(l, r) | Cpt::Alt(l, r) => {
                walk(l, names);
                walk(r, names);
            }
            Cpt::Repeat(l) | Cpt::Opt(l) => walk(l, names),
            Cpt::Fragment(_, body) => walk(body, names),
        }
    }
    walk(cpt, &mut names);
    names
}

/// Substitute the already-resolved fragment bodies into a pattern entry's
/// CPT, failing if any reference remains unresolved (§4.2: "Pattern entries
/// are then parsed, have fragments applied, and fail if any reference
/// remains unresolved").
pub fn apply_fragments_to_pattern(
    cpt: Cpt,
    bodies: &HashMap<String, Cpt>,
    kind_name: &str,
) -> Result<Cpt, PatternError> {
    let mut unresolved = Vec::new();
    let substituted = cpt.substitute_fragments(bodies, &mut unresolved);
    if !unresolved.is_empty() {
        return Err(PatternError::new(
            codes::UNDEFINED_FRAGMENT,
            format!("undefined fragment reference(s): {}", unresolved.join(", ")),
            Span::empty(0),
            kind_name,
            false,
        ));
    }
    Ok(substituted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, body: Cpt) -> FragmentDef {
        FragmentDef { name: name.to_string(), body }
    }

    fn sym(c: char) -> Cpt {
        Cpt::Symbol(c as u32, c as u32)
    }

    #[test]
    fn resolves_a_chain_of_fragment_references() {
        let defs = vec![
            def("a", sym('a')),
            def("b", Cpt::FragmentRef("a".to_string())),
            def("c", Cpt::FragmentRef("b".to_string())),
        ];
        let bodies = resolve_fragments(defs).expect("should resolve");
        assert!(!bodies["c"].has_unresolved_refs());
    }

    #[test]
    fn reports_undefined_fragment() {
        let defs = vec![def("a", Cpt::FragmentRef("missing".to_string()))];
        let err = resolve_fragments(defs).unwrap_err();
        assert_eq!(err.len(), 1);
        let first = err.iter().next().unwrap();
        assert_eq!(first.code, codes::UNDEFINED_FRAGMENT);
    }

    #[test]
    fn reports_a_direct_cycle() {
        let defs = vec![def("a", Cpt::FragmentRef("a".to_string()))];
        let err = resolve_fragments(defs).unwrap_err();
        let first = err.iter().next().unwrap();
        assert_eq!(first.code, codes::FRAGMENT_CYCLE);
    }

    #[test]
    fn reports_a_mutual_cycle() {
        let defs = vec![
            def("a", Cpt::FragmentRef("b".to_string())),
            def("b", Cpt::FragmentRef("a".to_string())),
        ];
        let err = resolve_fragments(defs).unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn apply_fragments_to_pattern_substitutes_resolved_bodies() {
        let mut bodies = HashMap::new();
        bodies.insert("a".to_string(), sym('a'));
        let cpt = Cpt::Concat(Box::new(Cpt::FragmentRef("a".to_string())), Box::new(sym('b')));
        let resolved = apply_fragments_to_pattern(cpt, &bodies, "t").expect("should resolve");
        assert!(!resolved.has_unresolved_refs());
    }

    #[test]
    fn apply_fragments_to_pattern_fails_on_unresolved_reference() {
        let bodies = HashMap::new();
        let cpt = Cpt::FragmentRef("missing".to_string());
        let err = apply_fragments_to_pattern(cpt, &bodies, "t").unwrap_err();
        assert_eq!(err.code, codes::UNDEFINED_FRAGMENT);
    }
}
