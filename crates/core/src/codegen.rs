//! Thin standalone-driver emitter (§2's "Code generator (thin)").
//!
//! Out of scope beyond its interface: this does not reproduce a general
//! driver runtime, only a literal rendering of one compiled mode's
//! transition table as Rust source — enough to embed a fixed spec into a
//! binary without carrying [`crate::compiled::CompiledLexicalSpec`] or a
//! JSON parser at runtime. Consumers still link against [`crate::driver`]
//! for the scanning logic; this module only emits the data tables.

use std::fmt::Write as _;

use crate::automaton::table::{CompiledDfaTable, CompiledTransition};
use crate::compiled::CompiledLexicalSpec;

/// Render one mode's uncompressed row-major transition table as a Rust
/// `static` item named `table_name`, plus its accepting-state array.
///
/// Always emits level-0 (uncompressed) data regardless of the source
/// table's compression level, since the point of standalone emission is a
/// self-contained array a target build can `include!` without linking
/// [`crate::automaton::table`].
#[must_use]
pub fn emit_mode_table(table_name: &str, dfa: &CompiledDfaTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// Auto-generated compiled lexer table — DO NOT EDIT.");
    let _ = writeln!(
        out,
        "pub static {table_name}_ACCEPT: [u32; {}] = {:?};",
        dfa.accepting_states.len(),
        dfa.accepting_states
    );
    let _ = writeln!(
        out,
        "pub static {table_name}_INITIAL_STATE: u32 = {};",
        dfa.initial_state_id
    );
    let _ = writeln!(
        out,
        "pub static {table_name}_ROWS: [[u32; 256]; {}] = [",
        dfa.row_count
    );
    for row in uncompressed_rows(dfa) {
        let _ = writeln!(out, "    {row:?},");
    }
    out.push_str("];\n");
    out
}

/// Render every mode of a compiled spec as one Rust source file, with one
/// table triple per mode named after the mode (`DEFAULT_ROWS`, `STRING_ROWS`,
/// ...).
#[must_use]
pub fn emit_standalone_driver(spec: &CompiledLexicalSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// Standalone driver tables for `{}`.", spec.name);
    let _ = writeln!(out, "// Auto-generated — DO NOT EDIT.\n");
    for mode in spec.specs.iter().flatten() {
        let table_name = mode.mode_name.to_ascii_uppercase();
        out.push_str(&emit_mode_table(&table_name, &mode.dfa));
        out.push('\n');
    }
    out
}

/// Reconstruct the row-major `state × 256` array regardless of how `dfa` was
/// compressed, by replaying `delta` for every `(state, byte)` pair.
fn uncompressed_rows(dfa: &CompiledDfaTable) -> Vec<[u32; 256]> {
    if let CompiledTransition::Uncompressed { rows } = &dfa.transition {
        return rows.clone();
    }
    (1..=dfa.row_count as u32)
        .map(|state| {
            let mut row = [0u32; 256];
            for (byte, slot) in row.iter_mut().enumerate() {
                *slot = dfa.delta(state, byte as u8);
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::spec::{LexicalSpec, SpecEntry};

    #[test]
    fn emits_one_table_per_mode() {
        let spec = LexicalSpec {
            name: "digits".into(),
            entries: vec![SpecEntry {
                kind: "digit".into(),
                pattern: "[0-9]+".into(),
                modes: None,
                push: None,
                pop: false,
                fragment: false,
            }],
        };
        let compiled = compile(&spec, 2).expect("compiles");
        let source = emit_standalone_driver(&compiled);
        assert!(source.contains("DEFAULT_ROWS"));
        assert!(source.contains("DEFAULT_ACCEPT"));
    }

    #[test]
    fn uncompressed_rows_match_delta_regardless_of_compression_level() {
        let spec = LexicalSpec {
            name: "digits".into(),
            entries: vec![SpecEntry {
                kind: "digit".into(),
                pattern: "[0-9]+".into(),
                modes: None,
                push: None,
                pop: false,
                fragment: false,
            }],
        };
        for level in [0u8, 1, 2] {
            let compiled = compile(&spec, level).expect("compiles");
            let mode = compiled.specs[compiled.mode_id_of("default").unwrap() as usize]
                .as_ref()
                .unwrap();
            let rows = uncompressed_rows(&mode.dfa);
            for (state_minus_one, row) in rows.iter().enumerate() {
                let state = (state_minus_one + 1) as u32;
                for byte in 0..=255u8 {
                    assert_eq!(row[byte as usize], mode.dfa.delta(state, byte));
                }
            }
        }
    }
}
