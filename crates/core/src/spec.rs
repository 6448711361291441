//! The lexical-specification input document (§3, §6).

use serde::{Deserialize, Serialize};

/// Sentinel mode id meaning "no mode" / "no push".
pub const LEX_MODE_ID_NIL: u32 = 0;
/// Sentinel mode-kind id meaning "non-accepting".
pub const LEX_MODE_KIND_ID_NIL: u32 = 0;
/// Default mode name every spec implicitly carries.
pub const DEFAULT_MODE_NAME: &str = "default";

/// One entry in a [`LexicalSpec`]: a named pattern plus its mode behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecEntry {
    /// Token kind name (or fragment name, when `fragment` is set).
    pub kind: String,
    /// The pattern string, in the regex dialect of §6.
    pub pattern: String,
    /// Modes this entry is enabled in. Defaults to `["default"]` when absent
    /// and `fragment` is false; ignored for fragments.
    #[serde(default)]
    pub modes: Option<Vec<String>>,
    /// Mode to push after this entry's token is accepted.
    #[serde(default)]
    pub push: Option<String>,
    /// Whether accepting this entry's token pops the current mode.
    #[serde(default)]
    pub pop: bool,
    /// Whether this entry defines a fragment (matchable only by reference,
    /// never directly).
    #[serde(default)]
    pub fragment: bool,
}

impl SpecEntry {
    /// Modes this entry is active in, applying the `["default"]` default.
    #[must_use]
    pub fn effective_modes(&self) -> Vec<String> {
        self.modes.clone().unwrap_or_else(|| vec![DEFAULT_MODE_NAME.to_string()])
    }
}

/// A named, ordered lexical specification: the compiler's sole input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalSpec {
    /// Specification name.
    pub name: String,
    /// Entries in priority order: earlier entries win ties on equal-length
    /// matches (§3).
    pub entries: Vec<SpecEntry>,
}

impl LexicalSpec {
    /// Non-fragment entries, in original order.
    pub fn pattern_entries(&self) -> impl Iterator<Item = (usize, &SpecEntry)> {
        self.entries.iter().enumerate().filter(|(_, e)| !e.fragment)
    }

    /// Fragment entries, in original order.
    pub fn fragment_entries(&self) -> impl Iterator<Item = &SpecEntry> {
        self.entries.iter().filter(|e| e.fragment)
    }

    /// All mode names referenced by any entry (via `modes` or `push`),
    /// always including `"default"`, in first-appearance order.
    #[must_use]
    pub fn mode_names(&self) -> Vec<String> {
        let mut names = vec![DEFAULT_MODE_NAME.to_string()];
        let mut note = |name: &str| {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        };
        for entry in self.pattern_entries().map(|(_, e)| e) {
            for mode in entry.effective_modes() {
                note(&mode);
            }
            if let Some(push) = &entry.push {
                note(push);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str, modes: Option<&[&str]>, push: Option<&str>, fragment: bool) -> SpecEntry {
        SpecEntry {
            kind: kind.to_string(),
            pattern: "x".to_string(),
            modes: modes.map(|m| m.iter().map(|s| s.to_string()).collect()),
            push: push.map(str::to_string),
            pop: false,
            fragment,
        }
    }

    #[test]
    fn effective_modes_defaults_to_default() {
        let e = entry("t", None, None, false);
        assert_eq!(e.effective_modes(), vec!["default".to_string()]);
    }

    #[test]
    fn effective_modes_uses_explicit_list_when_present() {
        let e = entry("t", Some(&["a", "b"]), None, false);
        assert_eq!(e.effective_modes(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn pattern_entries_and_fragment_entries_partition_by_flag() {
        let spec = LexicalSpec {
            name: "s".to_string(),
            entries: vec![
                entry("frag", None, None, true),
                entry("kind", None, None, false),
            ],
        };
        assert_eq!(spec.pattern_entries().count(), 1);
        assert_eq!(spec.fragment_entries().count(), 1);
    }

    #[test]
    fn mode_names_always_includes_default_first() {
        let spec = LexicalSpec {
            name: "s".to_string(),
            entries: vec![entry("a", Some(&["string"]), Some("nested"), false)],
        };
        assert_eq!(spec.mode_names(), vec!["default", "string", "nested"]);
    }

    #[test]
    fn mode_names_deduplicates_across_entries() {
        let spec = LexicalSpec {
            name: "s".to_string(),
            entries: vec![
                entry("a", Some(&["string"]), None, false),
                entry("b", Some(&["string", "default"]), None, false),
            ],
        };
        assert_eq!(spec.mode_names(), vec!["default", "string"]);
    }
}
