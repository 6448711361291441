//! Compiled-spec data model (§3, §6): links compiler output to driver
//! input. Produced once by [`crate::compile::compile`], consumed read-only
//! by any number of concurrent [`crate::driver::Lexer`] instances.

use crate::automaton::table::CompiledDfaTable;

/// Sentinel mode id meaning "no mode" / "no push".
pub const LEX_MODE_ID_NIL: u32 = 0;
/// Sentinel mode-kind id meaning "non-accepting".
pub const LEX_MODE_KIND_ID_NIL: u32 = 0;
/// Sentinel state id meaning "no transition".
pub const STATE_ID_NIL: u32 = 0;

/// One mode's compiled sub-DFA plus the per-mode-kind push/pop/name tables
/// (§3's "Each mode also carries...").
#[derive(Debug, Clone)]
pub struct CompiledModeSpec {
    /// This mode's id (index into the top-level `mode_names`/`specs`).
    pub mode_id: u32,
    /// This mode's name.
    pub mode_name: String,
    /// `modeKindId -> kind name`, index `0` holds the sentinel empty name.
    pub kind_names: Vec<String>,
    /// `modeKindId -> global kind id`, index `0` holds `0`.
    pub global_kind_id: Vec<u32>,
    /// `modeKindId -> mode id to push, or NIL`.
    pub push: Vec<u32>,
    /// `modeKindId -> whether accepting pops the mode stack`.
    pub pop: Vec<bool>,
    /// The compiled, (optionally compressed) transition table. Its
    /// `accepting_states` vector holds `modeKindId`, not a global kind id.
    pub dfa: CompiledDfaTable,
}

impl CompiledModeSpec {
    /// The mode-kind-id accepted by `state`, or [`LEX_MODE_KIND_ID_NIL`].
    #[must_use]
    pub fn accepting_mode_kind(&self, state: u32) -> u32 {
        if state == STATE_ID_NIL {
            return LEX_MODE_KIND_ID_NIL;
        }
        self.dfa.accepting_states[(state - 1) as usize]
    }
}

/// A named, compiled lexical specification: the sole input to [`crate::driver::Lexer`].
///
/// Immutable and cheaply shareable (behind an `Arc` or plain reference)
/// across concurrently running driver instances (§5).
#[derive(Debug, Clone)]
pub struct CompiledLexicalSpec {
    /// Specification name.
    pub name: String,
    /// The id of the `default` mode; always the initial mode of a fresh
    /// driver.
    pub initial_mode_id: u32,
    /// `modeId -> mode name`, index `0` holds the sentinel empty name.
    pub mode_names: Vec<String>,
    /// `globalKindId -> kind name`, index `0` holds the sentinel empty name.
    pub kind_names: Vec<String>,
    /// The compression level every mode's table was built with (`0`, `1`,
    /// or `2`).
    pub compression_level: u8,
    /// `modeId -> per-mode compiled entry`, index `0` unused (sentinel).
    pub specs: Vec<Option<CompiledModeSpec>>,
}

impl CompiledLexicalSpec {
    /// Look up a mode's compiled entry by id.
    #[must_use]
    pub fn mode(&self, mode_id: u32) -> &CompiledModeSpec {
        self.specs[mode_id as usize]
            .as_ref()
            .unwrap_or_else(|| panic!("mode id {mode_id} has no compiled entry"))
    }

    /// Resolve a mode name to its id, if the spec declares one.
    #[must_use]
    pub fn mode_id_of(&self, name: &str) -> Option<u32> {
        self.mode_names.iter().position(|n| n == name).map(|i| i as u32)
    }
}
