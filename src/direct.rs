//! Import of pre-solved block mappings.
//!
//! Some mapping sources already pair every source block state string with a
//! target block state string (`name[state=value,...]`). These are converted
//! into the same translation table the resolver produces, so both can be
//! written with the same exporter.

use crate::error::{Result, TranslationError};
use crate::export::{TranslationEntry, TranslationTable};
use crate::types::normalize_resource;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info};

/// Default state values per source block: block -> (state -> value).
pub type DefaultStates = BTreeMap<String, BTreeMap<String, String>>;

/// A parsed `name[state=value,...]` block string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BlockDescriptor {
    pub name: String,
    pub states: BTreeMap<String, String>,
}

impl BlockDescriptor {
    /// Parse a block string. State entries without `=` are ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (name, states) = match input.find('[') {
            Some(open) => {
                let Some(body) = input[open + 1..].strip_suffix(']') else {
                    return Err(TranslationError::InvalidBlockString(format!(
                        "'{}' has an unterminated state list",
                        input
                    )));
                };
                (&input[..open], body)
            }
            None => (input, ""),
        };

        if name.is_empty() {
            return Err(TranslationError::InvalidBlockString(format!(
                "'{}' has no block name",
                input
            )));
        }

        let mut descriptor = BlockDescriptor {
            name: normalize_resource(name),
            states: BTreeMap::new(),
        };
        for pair in states.split(',').filter(|pair| !pair.is_empty()) {
            match pair.split_once('=') {
                Some((state, value)) => {
                    descriptor
                        .states
                        .insert(state.trim().to_string(), value.trim().to_string());
                }
                None => debug!("{}: ignoring state entry '{}'", descriptor.name, pair),
            }
        }
        Ok(descriptor)
    }
}

impl std::str::FromStr for BlockDescriptor {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for BlockDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.states.is_empty() {
            let states: Vec<String> = self
                .states
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            write!(f, "[{}]", states.join(","))?;
        }
        Ok(())
    }
}

/// One source -> target pair with the source states that sit at their default.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DirectMapping {
    source: BlockDescriptor,
    target: BlockDescriptor,
    default_states: BTreeSet<String>,
}

impl DirectMapping {
    fn is_noop(&self) -> bool {
        self.source == self.target
    }

    /// Known corrections to the imported data.
    fn patch(&mut self) {
        if self.target.name.contains("stairs") {
            // A lone stair is straight, not outer_right.
            if let Some(shape) = self.target.states.get_mut("shape") {
                *shape = "straight".to_string();
            }
            return;
        }

        match self.source.name.as_str() {
            "minecraft:trip_wire" => self.drop_condition(&["suspended_bit"]),
            "minecraft:snow_layer" => self.drop_condition(&["covered_bit"]),
            "minecraft:leaves" => self.drop_condition(&["update_bit", "persistent_bit"]),
            "minecraft:chest" | "minecraft:trapped_chest" => {
                if let Some(kind) = self.target.states.get_mut("type") {
                    *kind = "single".to_string();
                }
            }
            _ => {}
        }
    }

    fn drop_condition(&mut self, states: &[&str]) {
        for state in states {
            self.source.states.remove(*state);
        }
    }

    fn into_entry(self) -> TranslationEntry {
        let mut condition = BTreeMap::new();
        let mut optional_condition = BTreeMap::new();
        for (name, value) in self.source.states {
            if self.default_states.contains(&name) {
                optional_condition.insert(name, value);
            } else {
                condition.insert(name, value);
            }
        }

        TranslationEntry {
            condition,
            optional_condition,
            target_name: self.target.name,
            mapping: BTreeMap::new(),
            constants: self.target.states,
        }
    }
}

/// Builds a translation table from pre-solved mapping files.
///
/// Several mapping files can be added; a later pairing for the same source
/// block string replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct DirectImporter {
    defaults: DefaultStates,
    mappings: IndexMap<String, IndexMap<BlockDescriptor, DirectMapping>>,
}

impl DirectImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the per-block default states.
    pub fn with_defaults(mut self, defaults: DefaultStates) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add a mapping object of `source block string -> target block string`.
    pub fn add_mapping(&mut self, mapping: &IndexMap<String, String>) -> Result<()> {
        for (source, target) in mapping {
            let source = BlockDescriptor::parse(source)?;
            let target = BlockDescriptor::parse(target)?;

            let default_states: BTreeSet<String> = self
                .defaults
                .get(&source.name)
                .map(|defaults| {
                    defaults
                        .iter()
                        .filter(|(state, value)| source.states.get(*state) == Some(*value))
                        .map(|(state, _)| state.clone())
                        .collect()
                })
                .unwrap_or_default();

            self.mappings
                .entry(source.name.clone())
                .or_default()
                .insert(
                    source.clone(),
                    DirectMapping {
                        source,
                        target,
                        default_states,
                    },
                );
        }
        Ok(())
    }

    /// Parse and add a mapping document.
    pub fn add_mapping_str(&mut self, json: &str) -> Result<()> {
        let mapping: IndexMap<String, String> = serde_json::from_str(json)?;
        self.add_mapping(&mapping)
    }

    /// Load and add a mapping file.
    pub fn load_mapping<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let contents = std::fs::read_to_string(path)?;
        self.add_mapping_str(&contents)
    }

    /// Number of distinct source block strings.
    pub fn len(&self) -> usize {
        self.mappings.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the translation table.
    ///
    /// Pairings that change nothing are dropped before the fix-ups run.
    pub fn build(self) -> TranslationTable {
        let mut table = TranslationTable::new();
        let mut dropped = 0usize;

        for (source, mappings) in self.mappings {
            let entries: Vec<TranslationEntry> = mappings
                .into_values()
                .filter(|mapping| {
                    let noop = mapping.is_noop();
                    if noop {
                        dropped += 1;
                    }
                    !noop
                })
                .map(|mut mapping| {
                    mapping.patch();
                    mapping.into_entry()
                })
                .collect();
            table.extend(&source, entries);
        }

        info!(
            "Imported {} entries for {} sources ({} unchanged pairings dropped)",
            table.entry_count(),
            table.len(),
            dropped
        );
        table
    }
}

/// Load a `{block: {state: value}}` default state table.
pub fn load_defaults<P: AsRef<Path>>(path: P) -> Result<DefaultStates> {
    let contents = std::fs::read_to_string(path)?;
    let defaults: DefaultStates = serde_json::from_str(&contents)?;
    Ok(defaults
        .into_iter()
        .map(|(block, states)| (normalize_resource(&block), states))
        .collect())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockData {
    name: Option<String>,
    default_state: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct BlockStateData {
    #[serde(default)]
    states: BTreeMap<String, StateValue>,
}

#[derive(Debug, Deserialize)]
struct StateValue {
    value: Option<Value>,
}

/// Derive default states from a block list and a block state list.
///
/// `blocks` is an array of `{"name", "defaultState"}` objects where
/// `defaultState` indexes into `block_states`, an array of
/// `{"states": {state: {"value": ...}}}` objects. Entries missing a field or
/// pointing outside the state list are skipped.
pub fn defaults_from_block_data(blocks: &str, block_states: &str) -> Result<DefaultStates> {
    let blocks: Vec<BlockData> = serde_json::from_str(blocks)?;
    let block_states: Vec<BlockStateData> = serde_json::from_str(block_states)?;

    let mut defaults = DefaultStates::new();
    for block in blocks {
        let (Some(name), Some(state_id)) = (block.name, block.default_state) else {
            continue;
        };
        let Some(state) = usize::try_from(state_id)
            .ok()
            .and_then(|index| block_states.get(index))
        else {
            debug!("{}: default state {} out of range", name, state_id);
            continue;
        };

        let values = state
            .states
            .iter()
            .filter_map(|(state_name, data)| {
                data.value
                    .as_ref()
                    .map(|value| (state_name.clone(), value_to_string(value)))
            });
        defaults
            .entry(normalize_resource(&name))
            .or_default()
            .extend(values);
    }
    Ok(defaults)
}

/// Load default states from a block list file and a block state list file.
pub fn load_block_data_defaults<P: AsRef<Path>, Q: AsRef<Path>>(
    blocks: P,
    block_states: Q,
) -> Result<DefaultStates> {
    let blocks = std::fs::read_to_string(blocks)?;
    let block_states = std::fs::read_to_string(block_states)?;
    defaults_from_block_data(&blocks, &block_states)
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(source, target)| (source.to_string(), target.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_descriptor() {
        let block = BlockDescriptor::parse("minecraft:stone_slab[stone_slab_type=brick,top_slot_bit=1]").unwrap();
        assert_eq!(block.name, "minecraft:stone_slab");
        assert_eq!(block.states["stone_slab_type"], "brick");
        assert_eq!(block.states["top_slot_bit"], "1");
        assert_eq!(block.to_string(), "minecraft:stone_slab[stone_slab_type=brick,top_slot_bit=1]");

        let plain: BlockDescriptor = "dirt".parse().unwrap();
        assert_eq!(plain.name, "minecraft:dirt");
        assert!(plain.states.is_empty());
        assert_eq!(BlockDescriptor::parse("minecraft:air[]").unwrap().states.len(), 0);
    }

    #[test]
    fn test_parse_descriptor_errors() {
        assert!(matches!(
            BlockDescriptor::parse("minecraft:stone[variant=granite"),
            Err(TranslationError::InvalidBlockString(_))
        ));
        assert!(matches!(
            BlockDescriptor::parse("[a=b]"),
            Err(TranslationError::InvalidBlockString(_))
        ));
    }

    #[test]
    fn test_noop_pairings_are_dropped() {
        let mut importer = DirectImporter::new();
        importer
            .add_mapping(&mapping(&[
                ("minecraft:dirt", "minecraft:dirt"),
                ("minecraft:web", "minecraft:cobweb"),
            ]))
            .unwrap();

        let table = importer.build();
        assert!(table.get("minecraft:dirt").is_none());
        assert_eq!(table.get("minecraft:web").unwrap()[0].target_name, "minecraft:cobweb");
    }

    #[test]
    fn test_default_states_become_optional() {
        let defaults = DefaultStates::from([(
            "minecraft:stone_slab".to_string(),
            BTreeMap::from([
                ("stone_slab_type".to_string(), "smooth_stone".to_string()),
                ("top_slot_bit".to_string(), "0".to_string()),
            ]),
        )]);
        let mut importer = DirectImporter::new().with_defaults(defaults);
        importer
            .add_mapping(&mapping(&[(
                "minecraft:stone_slab[stone_slab_type=brick,top_slot_bit=0]",
                "minecraft:brick_slab[type=bottom,waterlogged=false]",
            )]))
            .unwrap();

        let table = importer.build();
        let entry = &table.get("minecraft:stone_slab").unwrap()[0];
        assert_eq!(entry.condition["stone_slab_type"], "brick");
        assert_eq!(entry.optional_condition["top_slot_bit"], "0");
        assert_eq!(entry.constants["type"], "bottom");
        assert!(entry.mapping.is_empty());
    }

    #[test]
    fn test_later_mapping_replaces_earlier() {
        let mut importer = DirectImporter::new();
        importer
            .add_mapping(&mapping(&[("minecraft:grass", "minecraft:grass")]))
            .unwrap();
        importer
            .add_mapping_str(r#"{"minecraft:grass": "minecraft:grass_block[snowy=false]"}"#)
            .unwrap();

        assert_eq!(importer.len(), 1);
        let table = importer.build();
        assert_eq!(table.get("minecraft:grass").unwrap()[0].target_name, "minecraft:grass_block");
    }

    #[test]
    fn test_patches() {
        let mut importer = DirectImporter::new();
        importer
            .add_mapping(&mapping(&[
                (
                    "minecraft:oak_stairs[upside_down_bit=0,weirdo_direction=0]",
                    "minecraft:oak_stairs[facing=east,half=bottom,shape=outer_right,waterlogged=false]",
                ),
                (
                    "minecraft:trip_wire[attached_bit=0,suspended_bit=1]",
                    "minecraft:tripwire[attached=false]",
                ),
                (
                    "minecraft:snow_layer[covered_bit=0,height=1]",
                    "minecraft:snow[layers=2]",
                ),
                (
                    "minecraft:leaves[old_leaf_type=oak,persistent_bit=0,update_bit=1]",
                    "minecraft:oak_leaves[persistent=false]",
                ),
                (
                    "minecraft:trapped_chest[facing_direction=2]",
                    "minecraft:trapped_chest[facing=north,type=right]",
                ),
            ]))
            .unwrap();

        let table = importer.build();
        assert_eq!(table.get("minecraft:oak_stairs").unwrap()[0].constants["shape"], "straight");
        assert_eq!(
            table.get("minecraft:trip_wire").unwrap()[0].condition,
            BTreeMap::from([("attached_bit".to_string(), "0".to_string())])
        );
        assert!(!table.get("minecraft:snow_layer").unwrap()[0]
            .condition
            .contains_key("covered_bit"));
        assert_eq!(
            table.get("minecraft:leaves").unwrap()[0].condition.keys().collect::<Vec<_>>(),
            vec!["old_leaf_type"]
        );
        assert_eq!(table.get("minecraft:trapped_chest").unwrap()[0].constants["type"], "single");
    }

    #[test]
    fn test_defaults_from_block_data() {
        let blocks = r#"[
            {"name": "stone_slab", "defaultState": 1},
            {"name": "minecraft:lever", "defaultState": 2},
            {"name": "minecraft:broken", "defaultState": 99},
            {"displayName": "No Name"}
        ]"#;
        let block_states = r#"[
            {"states": {}},
            {"states": {"stone_slab_type": {"type": "string", "value": "smooth_stone"}, "top_slot_bit": {"type": "byte", "value": 0}}},
            {"states": {"open_bit": {"type": "bool", "value": false}, "lever_direction": {"type": "string"}}}
        ]"#;

        let defaults = defaults_from_block_data(blocks, block_states).unwrap();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults["minecraft:stone_slab"]["stone_slab_type"], "smooth_stone");
        assert_eq!(defaults["minecraft:stone_slab"]["top_slot_bit"], "0");
        assert_eq!(defaults["minecraft:lever"]["open_bit"], "false");
        assert!(!defaults["minecraft:lever"].contains_key("lever_direction"));
    }

    #[test]
    fn test_load_defaults_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.json");
        std::fs::write(&path, r#"{"lever": {"open_bit": "0"}}"#).unwrap();

        let defaults = load_defaults(&path).unwrap();
        assert_eq!(defaults["minecraft:lever"]["open_bit"], "0");
    }
}
