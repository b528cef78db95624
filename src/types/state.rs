//! Block states, their options and resolved mappings.

use crate::resolver::similarity::tokenize;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Per-value mapping table: source value -> (target state -> target value).
pub type ValueTable = BTreeMap<String, BTreeMap<String, String>>;

/// One enumerated value of a block state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateOption {
    /// The raw value, e.g. "north" or "3".
    pub value: String,
    /// Free-form description of the value, used as extra matching context.
    pub description: String,
    /// The matching target value once resolved.
    pub resolved_value: Option<String>,
}

impl StateOption {
    pub fn new(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: description.into(),
            resolved_value: None,
        }
    }

    /// Tokens of `value + "_" + description`.
    pub fn tokens(&self) -> Vec<String> {
        tokenize(&format!("{}_{}", self.value, self.description))
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_value.is_some()
    }
}

/// The translation rule of a block state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StateMapping {
    /// Resolution has not produced a rule. After resolution this marks a
    /// structural state.
    #[default]
    Unset,
    /// Resolved to "no effect". On target states this means the state has
    /// been claimed by a source state.
    Empty,
    /// Explicit per-value table.
    Table(ValueTable),
    /// Pure rename to the named target state with identical values.
    Alias(String),
}

impl StateMapping {
    pub fn is_unset(&self) -> bool {
        matches!(self, StateMapping::Unset)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StateMapping::Empty)
    }
}

/// A named, enumerated block state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    pub name: String,
    /// Options keyed (and kept unique) by value, in insertion order.
    pub options: IndexMap<String, StateOption>,
    pub default_value: String,
    pub mapping: StateMapping,
    /// Value assigned to this state in one permutation.
    pub assigned_value: Option<String>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: IndexMap::new(),
            default_value: String::new(),
            mapping: StateMapping::Unset,
            assigned_value: None,
        }
    }

    /// Builder: add an option without a description.
    pub fn with_option(mut self, value: impl Into<String>) -> Self {
        self.add_option(StateOption::new(value, ""));
        self
    }

    /// Builder: add several options without descriptions.
    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.add_option(StateOption::new(value, ""));
        }
        self
    }

    /// Builder: set the declared default value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Add an option unless one with the same value already exists.
    pub fn add_option(&mut self, option: StateOption) {
        if self.default_value.is_empty() {
            self.default_value = option.value.clone();
        }
        self.options.entry(option.value.clone()).or_insert(option);
    }

    /// Merge the options of another definition of the same state.
    pub fn merge(&mut self, other: &BlockState) {
        if self.default_value.is_empty() {
            self.default_value = other.default_value.clone();
        }
        for option in other.options.values() {
            self.add_option(option.clone());
        }
    }

    pub fn option_values(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    /// Whether both states offer exactly the same set of values.
    pub fn has_same_values(&self, other: &BlockState) -> bool {
        self.options.len() == other.options.len()
            && self.options.keys().all(|value| other.options.contains_key(value))
    }

    pub fn tokens(&self) -> Vec<String> {
        tokenize(&self.name)
    }

    /// A state with no translation rule must be encoded through the identifier.
    pub fn is_structural(&self) -> bool {
        self.mapping.is_unset()
    }

    /// Mark this (target) state as consumed by a source state.
    pub fn claim(&mut self) {
        self.mapping = StateMapping::Empty;
    }

    pub fn is_claimed(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Collapse a table that is a pure rename into alias form.
    pub fn simplify(&mut self) {
        let StateMapping::Table(table) = &self.mapping else {
            return;
        };
        if table.is_empty() {
            return;
        }

        let mut alias: Option<&String> = None;
        for (value, targets) in table {
            let mut targets = targets.iter();
            let (Some((target_name, target_value)), None) = (targets.next(), targets.next()) else {
                return;
            };
            if target_value != value {
                return;
            }
            match alias {
                Some(name) if name != target_name => return,
                _ => alias = Some(target_name),
            }
        }

        if let Some(name) = alias.cloned() {
            self.mapping = StateMapping::Alias(name);
        }
    }
}

/// An insertion-ordered set of block states keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSet {
    states: IndexMap<String, BlockState>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a state, merging options into an existing state of the same name.
    pub fn merge_state(&mut self, state: BlockState) {
        match self.states.get_mut(&state.name) {
            Some(existing) => existing.merge(&state),
            None => {
                self.states.insert(state.name.clone(), state);
            }
        }
    }

    /// Merge every state of another set into this one.
    pub fn merge_all(&mut self, other: &StateSet) {
        for state in other.iter() {
            self.merge_state(state.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&BlockState> {
        self.states.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut BlockState> {
        self.states.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockState> {
        self.states.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BlockState> {
        self.states.values_mut()
    }

    /// Keep only the states for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&BlockState) -> bool,
    {
        self.states.retain(|_, state| keep(state));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl FromIterator<BlockState> for StateSet {
    fn from_iter<I: IntoIterator<Item = BlockState>>(iter: I) -> Self {
        let mut set = StateSet::new();
        for state in iter {
            set.merge_state(state);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str, &str)]) -> ValueTable {
        let mut table = ValueTable::new();
        for (value, target, target_value) in entries {
            table
                .entry(value.to_string())
                .or_default()
                .insert(target.to_string(), target_value.to_string());
        }
        table
    }

    #[test]
    fn test_options_unique_by_value() {
        let mut state = BlockState::new("facing").with_options(["north", "south"]);
        state.add_option(StateOption::new("north", "duplicate"));
        assert_eq!(state.options.len(), 2);
        assert_eq!(state.options["north"].description, "");
        assert_eq!(state.default_value, "north");
    }

    #[test]
    fn test_same_values_ignores_order() {
        let a = BlockState::new("facing").with_options(["north", "south"]);
        let b = BlockState::new("facing").with_options(["south", "north"]);
        let c = BlockState::new("facing").with_options(["north"]);
        assert!(a.has_same_values(&b));
        assert!(!a.has_same_values(&c));
    }

    #[test]
    fn test_simplify_rename_to_alias() {
        let mut state = BlockState::new("direction").with_options(["north", "south"]);
        state.mapping = StateMapping::Table(table(&[
            ("north", "facing", "north"),
            ("south", "facing", "south"),
        ]));
        state.simplify();
        assert_eq!(state.mapping, StateMapping::Alias("facing".to_string()));
    }

    #[test]
    fn test_simplify_keeps_translating_table() {
        let mut state = BlockState::new("facing_direction").with_options(["2", "3"]);
        let original = table(&[("2", "facing", "north"), ("3", "facing", "south")]);
        state.mapping = StateMapping::Table(original.clone());
        state.simplify();
        assert_eq!(state.mapping, StateMapping::Table(original));
    }

    #[test]
    fn test_simplify_keeps_mixed_targets() {
        let mut state = BlockState::new("bits").with_options(["a", "b"]);
        let original = table(&[("a", "x", "a"), ("b", "y", "b")]);
        state.mapping = StateMapping::Table(original.clone());
        state.simplify();
        assert_eq!(state.mapping, StateMapping::Table(original));
    }

    #[test]
    fn test_state_set_merges_options() {
        let mut set = StateSet::new();
        set.merge_state(BlockState::new("age").with_options(["0", "1"]));
        set.merge_state(BlockState::new("age").with_options(["1", "2"]));
        assert_eq!(set.len(), 1);
        let values: Vec<_> = set.get("age").unwrap().option_values().collect();
        assert_eq!(values, vec!["0", "1", "2"]);
    }
}
