//! Transition-table compression (§4.6): three levels, from a plain
//! row-major array up to row-deduplicated row-displacement packing.

use super::dfa::Dfa;

/// Compressed transition storage, one variant per compression level.
#[derive(Debug, Clone)]
pub enum CompiledTransition {
    /// Level 0: the row-major array as produced by subset construction.
    Uncompressed {
        /// `rows[state - 1][byte] -> next state, or 0`.
        rows: Vec<[u32; 256]>,
    },
    /// Level 1: duplicate rows merged; `row_nums` maps a state to its
    /// unique-row index.
    RowDedup {
        /// Deduplicated rows, `uniqueRows x 256`.
        unique_rows: Vec<[u32; 256]>,
        /// `state - 1 -> unique row index`.
        row_nums: Vec<u32>,
    },
    /// Level 2: the Level 1 unique rows packed by row displacement into one
    /// flat array.
    RowDisplacement {
        /// `state - 1 -> unique row index`.
        row_nums: Vec<u32>,
        /// `unique row index -> offset into entries/bounds`.
        row_displacement: Vec<usize>,
        /// Flat packed transition values.
        entries: Vec<u32>,
        /// `entries[i]` is only valid for a lookup from unique row `r` when
        /// `bounds[i] == Some(r)`; disambiguates overlapping placements.
        bounds: Vec<Option<u32>>,
        /// Row count before packing (for the `original_row_count` field of
        /// §6's compiled document).
        original_row_count: usize,
    },
}

/// A mode's compiled transition table plus the metadata the driver needs to
/// interpret it (§4.6, §6).
#[derive(Debug, Clone)]
pub struct CompiledDfaTable {
    /// Start state id.
    pub initial_state_id: u32,
    /// `state - 1 -> global kind id, or 0`.
    pub accepting_states: Vec<u32>,
    /// Number of DFA states.
    pub row_count: usize,
    /// Always 256.
    pub col_count: usize,
    /// The compressed (or uncompressed) transition storage.
    pub transition: CompiledTransition,
}

impl CompiledDfaTable {
    /// Look up `delta(state, byte)`, branching on compression level (§4.6,
    /// §4.7). Returns `0` (`StateIdNil`) for no transition.
    #[must_use]
    pub fn delta(&self, state: u32, byte: u8) -> u32 {
        if state == 0 {
            return 0;
        }
        let v = byte as usize;
        match &self.transition {
            CompiledTransition::Uncompressed { rows } => rows[(state - 1) as usize][v],
            CompiledTransition::RowDedup { unique_rows, row_nums } => {
                let row = row_nums[(state - 1) as usize] as usize;
                unique_rows[row][v]
            }
            CompiledTransition::RowDisplacement { row_nums, row_displacement, entries, bounds } => {
                let row = row_nums[(state - 1) as usize];
                let d = row_displacement[row as usize];
                if bounds[d + v] != Some(row) { 0 } else { entries[d + v] }
            }
        }
    }
}

/// Build a compiled table at the requested compression level (`0`, `1`, or
/// `2`).
///
/// # Panics
/// Panics if `level` is not `0`, `1`, or `2` — the caller (`compile.rs`)
/// validates this against the documented CLI contract before reaching here.
#[must_use]
pub fn compile_table(dfa: &Dfa, level: u8) -> CompiledDfaTable {
    let row_count = dfa.state_count();
    let transition = match level {
        0 => CompiledTransition::Uncompressed { rows: dfa.rows.clone() },
        1 => {
            let (unique_rows, row_nums) = dedup_rows(&dfa.rows);
            CompiledTransition::RowDedup { unique_rows, row_nums }
        }
        2 => {
            let (unique_rows, row_nums) = dedup_rows(&dfa.rows);
            let (entries, bounds, row_displacement) = pack_row_displacement(&unique_rows);
            CompiledTransition::RowDisplacement {
                row_nums,
                row_displacement,
                entries,
                bounds,
                original_row_count: row_count,
            }
        }
        other => panic!("unsupported compression level {other}"),
    };
    CompiledDfaTable {
        initial_state_id: dfa.initial_state,
        accepting_states: dfa.accepting.clone(),
        row_count,
        col_count: 256,
        transition,
    }
}

/// Deduplicate identical rows, in order of first occurrence.
fn dedup_rows(rows: &[[u32; 256]]) -> (Vec<[u32; 256]>, Vec<u32>) {
    let mut unique: Vec<[u32; 256]> = Vec::new();
    let mut index_of: std::collections::HashMap<[u32; 256], u32> = std::collections::HashMap::new();
    let mut row_nums = Vec::with_capacity(rows.len());
    for row in rows {
        let id = *index_of.entry(*row).or_insert_with(|| {
            unique.push(*row);
            (unique.len() - 1) as u32
        });
        row_nums.push(id);
    }
    (unique, row_nums)
}

/// Row-displacement packing (§4.6, Level 2). Each unique row is placed at
/// the smallest offset `d` such that none of its non-nil entries lands on a
/// slot another row has already claimed — exclusive slot ownership,
/// processed in first-occurrence order so placement is deterministic.
fn pack_row_displacement(
    unique_rows: &[[u32; 256]],
) -> (Vec<u32>, Vec<Option<u32>>, Vec<usize>) {
    let mut entries: Vec<u32> = Vec::new();
    let mut bounds: Vec<Option<u32>> = Vec::new();
    let mut displacement = Vec::with_capacity(unique_rows.len());

    for (row_idx, row) in unique_rows.iter().enumerate() {
        let mut d = 0usize;
        let chosen = 'search: loop {
            if entries.len() < d + 256 {
                entries.resize(d + 256, 0);
                bounds.resize(d + 256, None);
            }
            let collides = row
                .iter()
                .enumerate()
                .any(|(v, &val)| val != 0 && bounds[d + v].is_some());
            if !collides {
                break 'search d;
            }
            d += 1;
        };
        for (v, &val) in row.iter().enumerate() {
            if val != 0 {
                entries[chosen + v] = val;
                bounds[chosen + v] = Some(row_idx as u32);
            }
        }
        displacement.push(chosen);
    }
    (entries, bounds, displacement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dfa() -> Dfa {
        let mut rows = vec![[0u32; 256]; 3];
        rows[0][b'a' as usize] = 2;
        rows[1][b'b' as usize] = 3;
        Dfa { initial_state: 1, rows, accepting: vec![0, 0, 1] }
    }

    #[test]
    fn all_compression_levels_agree() {
        let dfa = sample_dfa();
        let t0 = compile_table(&dfa, 0);
        let t1 = compile_table(&dfa, 1);
        let t2 = compile_table(&dfa, 2);
        for state in 1..=3u32 {
            for byte in 0..=255u8 {
                assert_eq!(t0.delta(state, byte), t1.delta(state, byte));
                assert_eq!(t0.delta(state, byte), t2.delta(state, byte));
            }
        }
    }

    #[test]
    fn dedup_merges_identical_rows() {
        let rows = vec![[0u32; 256]; 2];
        let (unique, row_nums) = dedup_rows(&rows);
        assert_eq!(unique.len(), 1);
        assert_eq!(row_nums, vec![0, 0]);
    }
}
