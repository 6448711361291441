//! Serializable wire format for compiled lexical specifications (§6): the
//! bridge between `compile`'s output and the `lex` subcommand's input. The
//! in-memory [`crate::compiled::CompiledLexicalSpec`] is the shape the
//! driver runs against; this module is purely the JSON projection of it.

use serde::{Deserialize, Serialize};

use crate::automaton::table::{CompiledDfaTable, CompiledTransition};
use crate::compiled::{CompiledLexicalSpec, CompiledModeSpec};

/// Row-displacement-packed unique rows (compression level 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowDisplacementDocument {
    /// `state - 1 -> unique row index`.
    pub row_nums: Vec<u32>,
    /// `unique row index -> offset into `entries`/`bounds``.
    pub row_displacement: Vec<usize>,
    /// Flat packed transition values.
    pub entries: Vec<u32>,
    /// `entries[i]` is valid only when `bounds[i]` equals the owning row;
    /// `None` marks an unclaimed slot.
    pub bounds: Vec<Option<u32>>,
    /// Always `0`; kept explicit so readers need not special-case missing
    /// slots.
    pub empty_value: u32,
    /// Row count before deduplication and packing.
    pub original_row_count: usize,
    /// Always `256`.
    pub original_col_count: usize,
}

/// Deduplicated-but-unpacked rows (compression level 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowDedupDocument {
    /// A flat `uniqueRows x 256` array, row-major.
    pub uncompressed_unique_entries: Vec<u32>,
    /// `state - 1 -> unique row index`.
    pub row_nums: Vec<u32>,
}

/// One mode's transition table at one of three compression levels (§4.6,
/// §6). Exactly one of `uncompressed_transition`, `unique_entries`, or the
/// row-dedup fields is present, matching `compression_level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DfaDocument {
    /// Start state id.
    pub initial_state_id: u32,
    /// `state - 1 -> accepted mode-kind id, or 0`.
    pub accepting_states: Vec<u32>,
    /// Number of DFA states.
    pub row_count: usize,
    /// Always `256`.
    pub col_count: usize,
    /// Level 0 only: the row-major array, `rowCount x 256`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncompressed_transition: Option<Vec<u32>>,
    /// Level 1 only.
    #[serde(flatten)]
    pub row_dedup: Option<RowDedupDocument>,
    /// Level 2 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_entries: Option<RowDisplacementDocument>,
}

/// One mode's compiled record (§6's `specs[i]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeSpecDocument {
    /// This mode's id.
    pub mode_id: u32,
    /// This mode's name.
    pub mode_name: String,
    /// Per-mode kind names, indexed by mode-kind id.
    pub kind_names: Vec<String>,
    /// `modeKindId -> mode id to push, or 0`.
    pub push: Vec<u32>,
    /// `modeKindId -> whether accepting pops the mode stack`.
    pub pop: Vec<bool>,
    /// This mode's compiled DFA.
    pub dfa: DfaDocument,
}

/// The compiled-lexical-specification document (§6): the compiler's output
/// and the `lex` subcommand's input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledLexicalSpecDocument {
    /// Specification name.
    pub name: String,
    /// The numeric id of the `default` mode.
    pub initial_mode_id: u32,
    /// `modeId -> mode name`, index `0` the sentinel.
    pub mode_names: Vec<String>,
    /// `globalKindId -> kind name`, index `0` the sentinel.
    pub kind_names: Vec<String>,
    /// `modeId -> modeKindId -> globalKindId`.
    pub kind_ids: Vec<Vec<u32>>,
    /// `0`, `1`, or `2`.
    pub compression_level: u8,
    /// `modeId -> compiled mode record`, index `0` unused.
    pub specs: Vec<Option<ModeSpecDocument>>,
}

impl From<&CompiledDfaTable> for DfaDocument {
    fn from(table: &CompiledDfaTable) -> Self {
        let mut doc = DfaDocument {
            initial_state_id: table.initial_state_id,
            accepting_states: table.accepting_states.clone(),
            row_count: table.row_count,
            col_count: table.col_count,
            uncompressed_transition: None,
            row_dedup: None,
            unique_entries: None,
        };
        match &table.transition {
            CompiledTransition::Uncompressed { rows } => {
                let mut flat = Vec::with_capacity(rows.len() * 256);
                for row in rows {
                    flat.extend_from_slice(row);
                }
                doc.uncompressed_transition = Some(flat);
            }
            CompiledTransition::RowDedup { unique_rows, row_nums } => {
                let mut flat = Vec::with_capacity(unique_rows.len() * 256);
                for row in unique_rows {
                    flat.extend_from_slice(row);
                }
                doc.row_dedup = Some(RowDedupDocument {
                    uncompressed_unique_entries: flat,
                    row_nums: row_nums.clone(),
                });
            }
            CompiledTransition::RowDisplacement {
                row_nums,
                row_displacement,
                entries,
                bounds,
                original_row_count,
            } => {
                doc.unique_entries = Some(RowDisplacementDocument {
                    row_nums: row_nums.clone(),
                    row_displacement: row_displacement.clone(),
                    entries: entries.clone(),
                    bounds: bounds.clone(),
                    empty_value: 0,
                    original_row_count: *original_row_count,
                    original_col_count: 256,
                });
            }
        }
        doc
    }
}

impl DfaDocument {
    /// Rebuild a [`CompiledDfaTable`] from its wire form.
    fn into_table(self) -> CompiledDfaTable {
        let transition = if let Some(flat) = self.uncompressed_transition {
            let rows = flat
                .chunks_exact(256)
                .map(|chunk| {
                    let mut row = [0u32; 256];
                    row.copy_from_slice(chunk);
                    row
                })
                .collect();
            CompiledTransition::Uncompressed { rows }
        } else if let Some(dedup) = self.row_dedup {
            let unique_rows = dedup
                .uncompressed_unique_entries
                .chunks_exact(256)
                .map(|chunk| {
                    let mut row = [0u32; 256];
                    row.copy_from_slice(chunk);
                    row
                })
                .collect();
            CompiledTransition::RowDedup { unique_rows, row_nums: dedup.row_nums }
        } else {
            let packed = self
                .unique_entries
                .expect("DfaDocument must carry exactly one transition representation");
            CompiledTransition::RowDisplacement {
                row_nums: packed.row_nums,
                row_displacement: packed.row_displacement,
                entries: packed.entries,
                bounds: packed.bounds,
                original_row_count: packed.original_row_count,
            }
        };
        CompiledDfaTable {
            initial_state_id: self.initial_state_id,
            accepting_states: self.accepting_states,
            row_count: self.row_count,
            col_count: self.col_count,
            transition,
        }
    }
}

impl From<&CompiledLexicalSpec> for CompiledLexicalSpecDocument {
    fn from(spec: &CompiledLexicalSpec) -> Self {
        let kind_ids = spec
            .specs
            .iter()
            .map(|m| m.as_ref().map_or_else(Vec::new, |m| m.global_kind_id.clone()))
            .collect();
        let specs = spec
            .specs
            .iter()
            .map(|m| {
                m.as_ref().map(|m| ModeSpecDocument {
                    mode_id: m.mode_id,
                    mode_name: m.mode_name.clone(),
                    kind_names: m.kind_names.clone(),
                    push: m.push.clone(),
                    pop: m.pop.clone(),
                    dfa: DfaDocument::from(&m.dfa),
                })
            })
            .collect();
        CompiledLexicalSpecDocument {
            name: spec.name.clone(),
            initial_mode_id: spec.initial_mode_id,
            mode_names: spec.mode_names.clone(),
            kind_names: spec.kind_names.clone(),
            kind_ids,
            compression_level: spec.compression_level,
            specs,
        }
    }
}

impl From<CompiledLexicalSpecDocument> for CompiledLexicalSpec {
    fn from(doc: CompiledLexicalSpecDocument) -> Self {
        let specs = doc
            .specs
            .into_iter()
            .map(|m| {
                m.map(|m| CompiledModeSpec {
                    mode_id: m.mode_id,
                    mode_name: m.mode_name,
                    kind_names: m.kind_names,
                    global_kind_id: doc
                        .kind_ids
                        .get(m.mode_id as usize)
                        .cloned()
                        .unwrap_or_default(),
                    push: m.push,
                    pop: m.pop,
                    dfa: m.dfa.into_table(),
                })
            })
            .collect();
        CompiledLexicalSpec {
            name: doc.name,
            initial_mode_id: doc.initial_mode_id,
            mode_names: doc.mode_names,
            kind_names: doc.kind_names,
            compression_level: doc.compression_level,
            specs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::spec::{LexicalSpec, SpecEntry};

    fn digit_spec() -> LexicalSpec {
        LexicalSpec {
            name: "digits".into(),
            entries: vec![SpecEntry {
                kind: "digit".into(),
                pattern: "[0-9]+".into(),
                modes: None,
                push: None,
                pop: false,
                fragment: false,
            }],
        }
    }

    #[test]
    fn round_trips_through_json_at_every_compression_level() {
        for level in [0u8, 1, 2] {
            let spec = digit_spec();
            let compiled = compile(&spec, level).expect("compiles");
            let doc = CompiledLexicalSpecDocument::from(&compiled);
            let json = serde_json::to_string(&doc).expect("serializes");
            let parsed: CompiledLexicalSpecDocument =
                serde_json::from_str(&json).expect("deserializes");
            let roundtripped: CompiledLexicalSpec = parsed.into();

            let default_id = compiled.mode_id_of("default").unwrap();
            let before = compiled.mode(default_id);
            let after = roundtripped.mode(default_id);
            for state in 1..=before.dfa.row_count as u32 {
                for byte in 0..=255u8 {
                    assert_eq!(before.dfa.delta(state, byte), after.dfa.delta(state, byte));
                }
            }
            assert_eq!(before.dfa.accepting_states, after.dfa.accepting_states);
        }
    }
}
