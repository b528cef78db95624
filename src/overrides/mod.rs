//! Hand-curated override tables.
//!
//! These tables take precedence over every heuristic in the resolver. They
//! are plain data, injected into the pipeline, and can be loaded from JSON
//! and merged on top of the builtin defaults.

mod builtin;

use crate::error::{Result, TranslationError};
use crate::types::ValueTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// What the state-name table says about one source state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateNameOverride<'a> {
    /// `null` entry: never map this state, keep it structural.
    DoNotMap,
    /// Empty list: the state has no target effect.
    NoEffect,
    /// Alternate target state names to try in order.
    Alternates(&'a [String]),
}

/// The manual override tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverrideTables {
    /// Source state name -> alternate target state names, or `null` for "do not map".
    pub state_names: BTreeMap<String, Option<Vec<String>>>,
    /// Generic value equivalences across editions, looked up in both directions.
    pub value_equivalences: BTreeMap<String, Vec<String>>,
    /// Explicit per-value tables for a source state name.
    pub value_tables: BTreeMap<String, ValueTable>,
    /// Source resource -> target resource renames applied as an edge case.
    pub identifier_renames: BTreeMap<String, String>,
}

impl OverrideTables {
    /// Empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin tables for translating Bedrock Edition into Java Edition.
    pub fn builtin() -> Self {
        builtin::bedrock_to_java()
    }

    /// Parse tables from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tables: OverrideTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Load tables from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Merge another set of tables on top of this one. Entries in `other` win.
    pub fn merge(mut self, other: OverrideTables) -> Self {
        self.state_names.extend(other.state_names);
        self.value_equivalences.extend(other.value_equivalences);
        self.value_tables.extend(other.value_tables);
        self.identifier_renames.extend(other.identifier_renames);
        self
    }

    /// Look up the state-name table.
    pub fn state_name(&self, name: &str) -> Option<StateNameOverride<'_>> {
        self.state_names.get(name).map(|entry| match entry {
            None => StateNameOverride::DoNotMap,
            Some(names) if names.is_empty() => StateNameOverride::NoEffect,
            Some(names) => StateNameOverride::Alternates(names.as_slice()),
        })
    }

    /// Explicit value table for a source state name.
    pub fn value_table(&self, name: &str) -> Option<&ValueTable> {
        self.value_tables.get(name)
    }

    /// Values considered equivalent to `value`, in table order, without duplicates.
    pub fn equivalents(&self, value: &str) -> Vec<&str> {
        let mut result: Vec<&str> = Vec::new();
        if let Some(direct) = self.value_equivalences.get(value) {
            for equivalent in direct {
                if equivalent != value && !result.contains(&equivalent.as_str()) {
                    result.push(equivalent);
                }
            }
        }
        for (key, values) in &self.value_equivalences {
            if key != value
                && values.iter().any(|v| v == value)
                && !result.contains(&key.as_str())
            {
                result.push(key);
            }
        }
        result
    }

    /// Target resource a source resource is renamed to, if any.
    pub fn rename_for(&self, source: &str) -> Option<&str> {
        self.identifier_renames.get(source).map(String::as_str)
    }

    fn validate(&self) -> Result<()> {
        for (state, table) in &self.value_tables {
            if table.is_empty() {
                return Err(TranslationError::InvalidOverrides(format!(
                    "value table for '{}' is empty",
                    state
                )));
            }
        }
        for (source, target) in &self.identifier_renames {
            if target.is_empty() {
                return Err(TranslationError::InvalidOverrides(format!(
                    "rename for '{}' has an empty target",
                    source
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state_name_forms() {
        let json = r#"{
            "stateNames": {
                "age_bit": null,
                "update_bit": [],
                "pillar_axis": ["axis"]
            }
        }"#;
        let tables = OverrideTables::from_json_str(json).unwrap();

        assert_eq!(tables.state_name("age_bit"), Some(StateNameOverride::DoNotMap));
        assert_eq!(tables.state_name("update_bit"), Some(StateNameOverride::NoEffect));
        match tables.state_name("pillar_axis") {
            Some(StateNameOverride::Alternates(names)) => assert_eq!(names, ["axis"]),
            other => panic!("Expected Alternates, got {:?}", other),
        }
        assert_eq!(tables.state_name("facing"), None);
    }

    #[test]
    fn test_equivalents_both_directions() {
        let json = r#"{ "valueEquivalences": { "false": ["0"], "short": ["low"] } }"#;
        let tables = OverrideTables::from_json_str(json).unwrap();

        assert_eq!(tables.equivalents("false"), vec!["0"]);
        assert_eq!(tables.equivalents("0"), vec!["false"]);
        assert_eq!(tables.equivalents("low"), vec!["short"]);
        assert!(tables.equivalents("tall").is_empty());
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = OverrideTables::builtin();
        let user = OverrideTables::from_json_str(
            r#"{ "stateNames": { "pillar_axis": null }, "identifierRenames": { "minecraft:foo": "minecraft:bar" } }"#,
        )
        .unwrap();

        let merged = base.merge(user);
        assert_eq!(merged.state_name("pillar_axis"), Some(StateNameOverride::DoNotMap));
        assert_eq!(merged.rename_for("minecraft:foo"), Some("minecraft:bar"));
        assert!(merged.value_table("facing_direction").is_some());
    }

    #[test]
    fn test_rejects_empty_value_table() {
        let result = OverrideTables::from_json_str(r#"{ "valueTables": { "facing_direction": {} } }"#);
        assert!(matches!(result, Err(TranslationError::InvalidOverrides(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, r#"{ "valueEquivalences": { "true": ["1"] } }"#).unwrap();

        let tables = OverrideTables::load(&path).unwrap();
        assert_eq!(tables.equivalents("1"), vec!["true"]);
    }

    #[test]
    fn test_builtin_facing_direction_table() {
        let tables = OverrideTables::builtin();
        let table = tables.value_table("facing_direction").unwrap();
        assert_eq!(table["2"]["facing"], "north");
        assert_eq!(table["5"]["facing"], "east");
    }
}
