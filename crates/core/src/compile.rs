//! Top-level compiler pipeline (§2, §4): spec-level validation, fragment
//! resolution, per-mode pattern parsing, UTF-8 lowering, position
//! assignment, DFA construction, and table compression.

use std::collections::HashMap;

use lexforge_diagnostics::{Span, codes};

use crate::automaton::attrs::compute_attrs;
use crate::automaton::byte_ast::{ByteAst, combine_mode_patterns};
use crate::automaton::dfa::build_dfa;
use crate::automaton::position::assign_positions;
use crate::automaton::table::compile_table;
use crate::compiled::{CompiledLexicalSpec, CompiledModeSpec, LEX_MODE_ID_NIL};
use crate::error::{CompileError, ErrorBatch, FatalError};
use crate::pattern::fragment::{self, FragmentDef};
use crate::pattern::parser::parse_pattern;
use crate::spec::LexicalSpec;
use crate::utf8::lower_to_byte_ast;

/// Compile a [`LexicalSpec`] into a [`CompiledLexicalSpec`] at the given
/// compression level (`0`, `1`, or `2`).
///
/// # Errors
/// Returns [`CompileError::Parse`] with every accumulated pattern error if
/// any entry fails to parse or resolve; returns [`CompileError::Fatal`] on
/// the first spec-level or structural violation (duplicate name, spelling
/// inconsistency, bad identifier, or position overflow).
pub fn compile(spec: &LexicalSpec, compression_level: u8) -> Result<CompiledLexicalSpec, CompileError> {
    assert!(
        matches!(compression_level, 0 | 1 | 2),
        "compression level must be 0, 1, or 2, got {compression_level}"
    );

    validate_spec_level(spec)?;

    let mode_names = spec.mode_names();
    let mode_id_of: HashMap<&str, u32> =
        mode_names.iter().enumerate().map(|(i, n)| (n.as_str(), (i + 1) as u32)).collect();

    // Global kind ids: one per non-fragment entry, 1-based, in entry order.
    let global_kind_id_of: HashMap<usize, u32> =
        spec.pattern_entries().enumerate().map(|(order, (idx, _))| (idx, (order + 1) as u32)).collect();
    let mut kind_names = vec![String::new()];
    for (_, entry) in spec.pattern_entries() {
        kind_names.push(entry.kind.clone());
    }

    let mut batch = ErrorBatch::new();

    // Resolve fragments once, spec-wide (fragments carry no mode).
    let fragment_defs: Vec<FragmentDef> = spec
        .fragment_entries()
        .filter_map(|entry| {
            match parse_pattern(&entry.pattern, &entry.kind, true) {
                Ok(body) => Some(FragmentDef { name: entry.kind.clone(), body }),
                Err(e) => {
                    batch.push(e);
                    None
                }
            }
        })
        .collect();
    let fragment_bodies = if batch.is_empty() {
        match fragment::resolve_fragments(fragment_defs) {
            Ok(bodies) => bodies,
            Err(fragment_errors) => {
                batch.extend(fragment_errors);
                HashMap::new()
            }
        }
    } else {
        HashMap::new()
    };

    // Parse and lower every pattern entry once; its byte AST is cloned into
    // each mode it is enabled in.
    struct CompiledEntry {
        global_kind_id: u32,
        push_mode: Option<String>,
        pop: bool,
        modes: Vec<String>,
        byte_ast: ByteAst,
    }
    let mut compiled_entries: Vec<CompiledEntry> = Vec::new();
    for (idx, entry) in spec.pattern_entries() {
        let cpt = match parse_pattern(&entry.pattern, &entry.kind, false) {
            Ok(cpt) => cpt,
            Err(e) => {
                batch.push(e);
                continue;
            }
        };
        let cpt = if batch.is_empty() {
            match fragment::apply_fragments_to_pattern(cpt, &fragment_bodies, &entry.kind) {
                Ok(cpt) => cpt,
                Err(e) => {
                    batch.push(e);
                    continue;
                }
            }
        } else {
            continue;
        };
        compiled_entries.push(CompiledEntry {
            global_kind_id: global_kind_id_of[&idx],
            push_mode: entry.push.clone(),
            pop: entry.pop,
            modes: entry.effective_modes(),
            byte_ast: lower_to_byte_ast(&cpt),
        });
    }

    if !batch.is_empty() {
        return Err(CompileError::Parse(batch));
    }

    // Compile each mode's combined DFA.
    let mut specs: Vec<Option<CompiledModeSpec>> = vec![None; mode_names.len() + 1];
    for (mode_idx, mode_name) in mode_names.iter().enumerate() {
        let mode_id = (mode_idx + 1) as u32;
        let enabled: Vec<&CompiledEntry> =
            compiled_entries.iter().filter(|e| e.modes.iter().any(|m| m == mode_name)).collect();
        if enabled.is_empty() {
            return Err(FatalError::new(
                codes::EMPTY_MODE,
                format!("mode `{mode_name}` has no enabled entries"),
                Span::empty(0),
            )
            .into());
        }

        let mut mode_kind_names = vec![String::new()];
        let mut mode_global_kind_id = vec![0u32];
        let mut mode_push = vec![LEX_MODE_ID_NIL];
        let mut mode_pop = vec![false];
        let mut patterns: Vec<(u32, ByteAst)> = Vec::with_capacity(enabled.len());
        for (order, e) in enabled.iter().enumerate() {
            let mode_kind_id = (order + 1) as u32;
            mode_kind_names.push(kind_names[e.global_kind_id as usize].clone());
            mode_global_kind_id.push(e.global_kind_id);
            mode_push.push(e.push_mode.as_deref().and_then(|p| mode_id_of.get(p)).copied().unwrap_or(LEX_MODE_ID_NIL));
            mode_pop.push(e.pop);
            patterns.push((mode_kind_id, e.byte_ast.clone()));
        }

        let combined = combine_mode_patterns(patterns);
        let (indexed, symbol_table) = assign_positions(&combined, mode_name)?;
        let (root_attrs, follow) = compute_attrs(&indexed);
        let dfa = build_dfa(root_attrs.first, &follow, &symbol_table);
        let table = compile_table(&dfa, compression_level);

        specs[mode_id as usize] = Some(CompiledModeSpec {
            mode_id,
            mode_name: mode_name.clone(),
            kind_names: mode_kind_names,
            global_kind_id: mode_global_kind_id,
            push: mode_push,
            pop: mode_pop,
            dfa: table,
        });
    }

    let initial_mode_id = mode_id_of["default"];
    let doc_mode_names: Vec<String> =
        std::iter::once(String::new()).chain(mode_names.iter().cloned()).collect();

    Ok(CompiledLexicalSpec {
        name: spec.name.clone(),
        initial_mode_id,
        mode_names: doc_mode_names,
        kind_names,
        compression_level,
        specs,
    })
}

/// Identifier grammar (§4.8): `[a-z]([a-z0-9_]*[a-z0-9])?`, no double
/// underscore.
fn is_valid_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    if !bytes[0].is_ascii_lowercase() {
        return false;
    }
    if bytes.len() == 1 {
        return true;
    }
    if !bytes[bytes.len() - 1].is_ascii_lowercase() && !bytes[bytes.len() - 1].is_ascii_digit() {
        return false;
    }
    let mut prev_underscore = false;
    for &b in &bytes[1..bytes.len() - 1] {
        let ok = b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_';
        if !ok {
            return false;
        }
        if b == b'_' {
            if prev_underscore {
                return false;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
    }
    true
}

/// Normalize an identifier the way a snake_case -> camelCase code generator
/// would, for spelling-inconsistency detection: strip underscores, lowercase.
fn spelling_key(s: &str) -> String {
    s.chars().filter(|c| *c != '_').flat_map(char::to_lowercase).collect()
}

fn validate_spec_level(spec: &LexicalSpec) -> Result<(), FatalError> {
    // Identifier grammar: every non-fragment kind name and every mode name.
    for entry in spec.entries.iter().filter(|e| !e.fragment) {
        if !is_valid_identifier(&entry.kind) {
            return Err(FatalError::new(
                codes::IDENTIFIER_GRAMMAR,
                format!("kind name `{}` violates the identifier grammar", entry.kind),
                Span::empty(0),
            ));
        }
    }
    for mode in spec.mode_names() {
        if !is_valid_identifier(&mode) {
            return Err(FatalError::new(
                codes::IDENTIFIER_GRAMMAR,
                format!("mode name `{mode}` violates the identifier grammar"),
                Span::empty(0),
            ));
        }
    }

    // Duplicate kind names among non-fragment entries.
    let mut seen_kinds: Vec<&str> = Vec::new();
    for entry in spec.entries.iter().filter(|e| !e.fragment) {
        if seen_kinds.contains(&entry.kind.as_str()) {
            return Err(FatalError::new(
                codes::DUPLICATE_NAME,
                format!("kind name `{}` is used by more than one entry", entry.kind),
                Span::empty(0),
            ));
        }
        seen_kinds.push(&entry.kind);
    }

    // Spelling inconsistency: any two distinct identifiers (kind names,
    // fragment names, and mode names, each namespace checked separately)
    // that collide once normalized.
    let check_namespace = |names: Vec<String>| -> Result<(), FatalError> {
        let mut by_key: HashMap<String, String> = HashMap::new();
        for name in names {
            let key = spelling_key(&name);
            if let Some(existing) = by_key.get(&key) {
                if existing != &name {
                    return Err(FatalError::new(
                        codes::SPELLING_INCONSISTENCY,
                        format!("`{existing}` and `{name}` differ only by case or underscores"),
                        Span::empty(0),
                    ));
                }
            } else {
                by_key.insert(key, name);
            }
        }
        Ok(())
    };
    check_namespace(spec.entries.iter().filter(|e| !e.fragment).map(|e| e.kind.clone()).collect())?;
    check_namespace(spec.fragment_entries().map(|e| e.kind.clone()).collect())?;
    check_namespace(spec.mode_names())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecEntry;

    fn entry(kind: &str, pattern: &str) -> SpecEntry {
        SpecEntry {
            kind: kind.to_string(),
            pattern: pattern.to_string(),
            modes: None,
            push: None,
            pop: false,
            fragment: false,
        }
    }

    #[test]
    fn compiles_a_simple_spec() {
        let spec = LexicalSpec {
            name: "simple".to_string(),
            entries: vec![entry("digit", "[0-9]+"), entry("ws", " +")],
        };
        let compiled = compile(&spec, 2).expect("should compile");
        assert_eq!(compiled.kind_names, vec!["", "digit", "ws"]);
        assert_eq!(compiled.mode_names, vec!["", "default"]);
    }

    #[test]
    fn rejects_duplicate_kind_names() {
        let spec = LexicalSpec {
            name: "dup".to_string(),
            entries: vec![entry("a", "x"), entry("a", "y")],
        };
        let err = compile(&spec, 0).unwrap_err();
        assert!(matches!(err, CompileError::Fatal(e) if e.code == codes::DUPLICATE_NAME));
    }

    #[test]
    fn rejects_spelling_inconsistency() {
        let spec = LexicalSpec {
            name: "spelling".to_string(),
            entries: vec![entry("my_kind", "x"), entry("myKind", "y")],
        };
        let err = compile(&spec, 0).unwrap_err();
        assert!(matches!(err, CompileError::Fatal(e) if e.code == codes::SPELLING_INCONSISTENCY));
    }

    #[test]
    fn rejects_bad_identifier() {
        let spec = LexicalSpec {
            name: "bad".to_string(),
            entries: vec![entry("Bad__Name", "x")],
        };
        let err = compile(&spec, 0).unwrap_err();
        assert!(matches!(err, CompileError::Fatal(e) if e.code == codes::IDENTIFIER_GRAMMAR));
    }

    #[test]
    fn reports_parse_errors_as_a_batch() {
        let spec = LexicalSpec {
            name: "broken".to_string(),
            entries: vec![entry("a", "("), entry("b", "*")],
        };
        let err = compile(&spec, 0).unwrap_err();
        match err {
            CompileError::Parse(batch) => assert_eq!(batch.len(), 2),
            CompileError::Fatal(_) => panic!("expected a parse batch"),
        }
    }
}
