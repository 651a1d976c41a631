//! Symbolic-name resolution for patch rules.
//!
//! Patch rules are written against *stable* names — the names a method or
//! field carries in unobfuscated builds of the target. At load time the
//! actual class may carry obfuscated names instead. A [`SymbolMap`] holds the
//! stable-to-resolved mapping for the current run; resolution is total and
//! falls through to the input name when no mapping exists, so the same rule
//! set runs unchanged against both obfuscated and plain classes.
//!
//! Absence of a mapping is *not* an error here: whether a name actually
//! exists is only observable at class lookup / instruction matching time,
//! which is where misses are detected and reported (see [`crate::rules`]).
//!
//! # Example
//!
//! ```rust
//! use classweave::symbols::{SymbolKind, SymbolMap};
//!
//! let mut map = SymbolMap::new();
//! map.map_method("Beta", "tick", "a");
//!
//! assert_eq!(map.resolve(SymbolKind::Method, "Beta", "tick"), "a");
//! // Unmapped names pass through unchanged.
//! assert_eq!(map.resolve(SymbolKind::Method, "Beta", "isCritical"), "isCritical");
//! assert_eq!(map.resolve(SymbolKind::Field, "Beta", "tick"), "tick");
//! ```

use std::collections::HashMap;

use strum::Display;

/// The namespace a symbol lives in.
///
/// Methods and fields are mapped independently; a class may legally carry a
/// method and a field of the same stable name that resolve differently.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A method name
    #[strum(serialize = "method")]
    Method,
    /// A field name
    #[strum(serialize = "field")]
    Field,
}

/// Read-only stable-name to resolved-name mapping for one transform run.
///
/// Entries are partitioned by [`SymbolKind`] and keyed by the owning class's
/// stable name plus the member's stable name, so two classes can map the
/// same stable member name to different resolved names.
///
/// The map is populated by the host loader before any pass runs and is never
/// mutated during a pass.
#[derive(Debug, Default, Clone)]
pub struct SymbolMap {
    methods: HashMap<String, HashMap<String, String>>,
    fields: HashMap<String, HashMap<String, String>>,
}

impl SymbolMap {
    /// Creates an empty map, under which every name resolves to itself.
    #[must_use]
    pub fn new() -> Self {
        SymbolMap::default()
    }

    /// Registers a method-name mapping for the given owning class.
    pub fn map_method(&mut self, owner: &str, stable: &str, resolved: &str) {
        self.methods
            .entry(owner.to_string())
            .or_default()
            .insert(stable.to_string(), resolved.to_string());
    }

    /// Registers a field-name mapping for the given owning class.
    pub fn map_field(&mut self, owner: &str, stable: &str, resolved: &str) {
        self.fields
            .entry(owner.to_string())
            .or_default()
            .insert(stable.to_string(), resolved.to_string());
    }

    /// Resolves a stable name to the name to look up in the current run.
    ///
    /// Total by design: an unmapped name is returned unchanged, deferring
    /// the "does this member exist" question to the container lookup where
    /// absence is actually observable.
    ///
    /// ## Arguments
    /// * 'kind'   - Whether a method or a field name is being resolved
    /// * 'owner'  - Stable fully qualified name of the owning class
    /// * 'stable' - The stable member name the rule was written against
    #[must_use]
    pub fn resolve<'a>(&'a self, kind: SymbolKind, owner: &str, stable: &'a str) -> &'a str {
        let table = match kind {
            SymbolKind::Method => &self.methods,
            SymbolKind::Field => &self.fields,
        };

        table
            .get(owner)
            .and_then(|members| members.get(stable))
            .map_or(stable, String::as_str)
    }

    /// Number of registered mappings across both kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        let count = |t: &HashMap<String, HashMap<String, String>>| {
            t.values().map(HashMap::len).sum::<usize>()
        };
        count(&self.methods) + count(&self.fields)
    }

    /// Returns `true` when no mappings are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_name_passes_through() {
        let map = SymbolMap::new();
        assert_eq!(map.resolve(SymbolKind::Method, "Beta", "tick"), "tick");
        assert_eq!(map.resolve(SymbolKind::Field, "Beta", "ticks"), "ticks");
    }

    #[test]
    fn test_mapped_method_resolves() {
        let mut map = SymbolMap::new();
        map.map_method("Beta", "tick", "a");
        assert_eq!(map.resolve(SymbolKind::Method, "Beta", "tick"), "a");
    }

    #[test]
    fn test_kinds_are_partitioned() {
        let mut map = SymbolMap::new();
        map.map_method("Beta", "critical", "a");
        map.map_field("Beta", "critical", "b");

        assert_eq!(map.resolve(SymbolKind::Method, "Beta", "critical"), "a");
        assert_eq!(map.resolve(SymbolKind::Field, "Beta", "critical"), "b");
    }

    #[test]
    fn test_owners_are_partitioned() {
        let mut map = SymbolMap::new();
        map.map_method("Beta", "tick", "a");
        map.map_method("Gamma", "tick", "q");

        assert_eq!(map.resolve(SymbolKind::Method, "Beta", "tick"), "a");
        assert_eq!(map.resolve(SymbolKind::Method, "Gamma", "tick"), "q");
        assert_eq!(map.resolve(SymbolKind::Method, "Delta", "tick"), "tick");
    }

    #[test]
    fn test_len_and_is_empty() {
        let mut map = SymbolMap::new();
        assert!(map.is_empty());
        map.map_method("Beta", "tick", "a");
        map.map_field("Beta", "ticks", "b");
        assert_eq!(map.len(), 2);
        assert!(!map.is_empty());
    }
}
