//! Translation entries built from final permutations.

use crate::types::{Block, StateMapping, ValueTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A state mapping as written to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingValue {
    /// Rename the state, keeping its value.
    Rename(String),
    /// Per-value table of target state assignments.
    Values(ValueTable),
}

/// One translation rule for a source block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    /// Structural state values that must match for this entry to apply.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub condition: BTreeMap<String, String>,
    /// Structural state values that are preferred but not required.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub optional_condition: BTreeMap<String, String>,
    /// Target block name.
    #[serde(rename = "name")]
    pub target_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mapping: BTreeMap<String, MappingValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constants: BTreeMap<String, String>,
}

impl TranslationEntry {
    /// Build the entry for a final permutation.
    ///
    /// Returns `None` when the permutation has no single target or when it
    /// changes nothing (same name, no mapping, no constants). With
    /// `optional_defaults` set, condition values equal to the state's
    /// default go into `optional_condition`.
    pub fn from_permutation(permutation: &Block, optional_defaults: bool) -> Option<Self> {
        let target_name = permutation.target_name()?.to_string();

        let mapping: BTreeMap<String, MappingValue> = permutation
            .source_states
            .iter()
            .filter_map(|state| {
                let value = match &state.mapping {
                    StateMapping::Alias(target) if *target != state.name => {
                        MappingValue::Rename(target.clone())
                    }
                    StateMapping::Table(table)
                        if !table.is_empty() && !is_identity(&state.name, table) =>
                    {
                        MappingValue::Values(table.clone())
                    }
                    _ => return None,
                };
                Some((state.name.clone(), value))
            })
            .collect();

        let constants = permutation.constants.clone();

        if target_name == permutation.source.resource && mapping.is_empty() && constants.is_empty() {
            return None;
        }

        let mut condition = BTreeMap::new();
        let mut optional_condition = BTreeMap::new();
        for (name, value) in permutation.condition() {
            let is_default = permutation
                .source_states
                .get(&name)
                .map(|state| state.default_value == value)
                .unwrap_or(false);
            if optional_defaults && is_default {
                optional_condition.insert(name, value);
            } else {
                condition.insert(name, value);
            }
        }

        Some(Self {
            condition,
            optional_condition,
            target_name,
            mapping,
            constants,
        })
    }
}

/// Whether a table maps every value onto itself under the same state name.
fn is_identity(state_name: &str, table: &ValueTable) -> bool {
    table.iter().all(|(value, targets)| {
        targets.len() == 1 && targets.get(state_name).map(|v| v == value).unwrap_or(false)
    })
}
