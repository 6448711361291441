//! DFA construction by subset construction over position sets (§4.5).

use std::collections::{BTreeSet, HashMap, VecDeque};

use super::attrs::FollowTable;
use super::position::{Position, SymbolTable};

/// An uncompressed DFA for one mode: dense state ids starting at 1, a
/// `rowCount x 256` transition table, and an accepting-kind vector.
///
/// `rows[i]` and `accepting[i]` both describe state id `i + 1`; `0` in a
/// transition cell means "no transition" (`StateIdNil`), and `0` in
/// `accepting` means "non-accepting".
#[derive(Debug, Clone)]
pub struct Dfa {
    /// The id of the start state (always `1`).
    pub initial_state: u32,
    /// `rows[state - 1][byte] -> next state, or 0`.
    pub rows: Vec<[u32; 256]>,
    /// `accepting[state - 1] -> global kind id, or 0`.
    pub accepting: Vec<u32>,
}

impl Dfa {
    /// Number of states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.rows.len()
    }
}

fn compute_accept(set: &BTreeSet<Position>, table: &SymbolTable) -> u32 {
    set.iter()
        .filter(|p| p.is_end_marker())
        .filter_map(|p| table.end_marker_kind.get(p))
        .copied()
        .min()
        .unwrap_or(0)
}

/// Subset-construct a DFA from a mode's root `first` set, follow table, and
/// symbol table. State identity is the position set itself: `BTreeSet`'s
/// canonical sorted representation and derived `Hash` give the stable,
/// order-independent identity the algorithm needs without a hand-rolled
/// varint/hash scheme.
#[must_use]
pub fn build_dfa(root_first: BTreeSet<Position>, follow: &FollowTable, table: &SymbolTable) -> Dfa {
    let mut state_id_of: HashMap<BTreeSet<Position>, u32> = HashMap::new();
    let mut rows: Vec<[u32; 256]> = Vec::new();
    let mut accepting: Vec<u32> = Vec::new();
    let mut queue: VecDeque<BTreeSet<Position>> = VecDeque::new();

    state_id_of.insert(root_first.clone(), 1);
    rows.push([0u32; 256]);
    accepting.push(compute_accept(&root_first, table));
    queue.push_back(root_first);
    let mut next_id = 2u32;

    while let Some(set) = queue.pop_front() {
        let sid = state_id_of[&set];
        let mut per_byte: Vec<BTreeSet<Position>> = vec![BTreeSet::new(); 256];
        for p in set.iter().filter(|p| !p.is_end_marker()) {
            let (lo, hi) = table.symbol_of[p];
            if let Some(f) = follow.get(p) {
                for v in lo..=hi {
                    per_byte[v as usize].extend(f.iter().copied());
                }
            }
        }
        for (v, bucket) in per_byte.iter_mut().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let t = std::mem::take(bucket);
            let next_state = if let Some(&id) = state_id_of.get(&t) {
                id
            } else {
                let id = next_id;
                next_id += 1;
                state_id_of.insert(t.clone(), id);
                rows.push([0u32; 256]);
                accepting.push(compute_accept(&t, table));
                queue.push_back(t);
                id
            };
            rows[(sid - 1) as usize][v] = next_state;
        }
    }

    Dfa { initial_state: 1, rows, accepting }
}
