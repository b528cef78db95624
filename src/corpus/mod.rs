//! Input corpus ingestion.
//!
//! Records are merged by source resource into a [`BlockRegistry`]. The
//! target states listed by each record are registered in a
//! [`TargetSchema`] under every candidate target resource, so a block is
//! always resolved against everything known about its candidates.

pub mod record;

pub use record::{CorpusRecord, OptionRecord, StateRecord};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Result, TranslationError};
use crate::types::{Block, Identifier, StateMapping, StateSet};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Target states known per target resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSchema {
    states: IndexMap<String, StateSet>,
}

impl TargetSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register states for a target resource, merging options.
    pub fn register(&mut self, resource: &str, states: &StateSet) {
        self.states
            .entry(resource.to_string())
            .or_default()
            .merge_all(states);
    }

    pub fn get(&self, resource: &str) -> Option<&StateSet> {
        self.states.get(resource)
    }

    /// Union of the states registered for all candidates.
    pub fn states_for<'i, I>(&self, candidates: I) -> StateSet
    where
        I: IntoIterator<Item = &'i Identifier>,
    {
        let mut union = StateSet::new();
        for candidate in candidates {
            if let Some(states) = self.states.get(&candidate.resource) {
                union.merge_all(states);
            }
        }
        union
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// All source blocks of a corpus, keyed by source resource in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: IndexMap<String, Block>,
    schema: TargetSchema,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest raw JSON records, skipping malformed ones.
    ///
    /// Returns one `MalformedRecord` diagnostic per skipped record.
    pub fn ingest<I>(&mut self, records: I) -> Diagnostics
    where
        I: IntoIterator<Item = Value>,
    {
        let mut diagnostics = Diagnostics::new();
        let mut accepted = 0usize;

        for (index, value) in records.into_iter().enumerate() {
            let parsed = serde_json::from_value::<CorpusRecord>(value)
                .map_err(TranslationError::from)
                .and_then(CorpusRecord::into_block);

            match parsed {
                Ok(block) => {
                    self.insert(block);
                    accepted += 1;
                }
                Err(e) => {
                    warn!("Skipping corpus record #{}: {}", index, e);
                    diagnostics.push(Diagnostic::MalformedRecord {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Ingested {} records into {} blocks ({} skipped)",
            accepted,
            self.blocks.len(),
            diagnostics.len()
        );
        diagnostics
    }

    /// Add a block, merging it into an existing block of the same source resource.
    pub fn insert(&mut self, block: Block) {
        for candidate in &block.target_candidates {
            self.schema.register(&candidate.resource, &block.target_states);
        }

        match self.blocks.get_mut(&block.source.resource) {
            Some(existing) => existing.absorb(block),
            None => {
                self.blocks.insert(block.source.resource.clone(), block);
            }
        }
    }

    pub fn get(&self, resource: &str) -> Option<&Block> {
        self.blocks.get(resource)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// A copy of a block ready for resolution.
    ///
    /// Its target states are the block's own merged with the schema entries
    /// of every candidate, all unclaimed.
    pub fn prepare(&self, block: &Block) -> Block {
        let mut prepared = block.clone();
        prepared
            .target_states
            .merge_all(&self.schema.states_for(&block.target_candidates));
        for state in prepared.target_states.iter_mut() {
            state.mapping = StateMapping::Unset;
            state.assigned_value = None;
        }
        prepared
    }

    /// Target states a resolved permutation of `block` may carry once
    /// `target` is chosen: the block's own target states plus the schema
    /// entry of that target.
    pub fn states_of(&self, block: &Block, target: &Identifier) -> StateSet {
        let mut states = block.target_states.clone();
        if let Some(known) = self.schema.get(&target.resource) {
            states.merge_all(known);
        }
        states
    }
}

/// Parse a corpus document into raw records.
///
/// The document must be a JSON array. Individual records are validated on
/// ingestion so one bad record does not reject the whole file.
pub fn parse_records(json: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(records) => Ok(records),
        other => Err(TranslationError::MalformedRecord(format!(
            "corpus must be a JSON array, found {}",
            json_kind(&other)
        ))),
    }
}

/// Load raw records from a corpus file.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let contents = std::fs::read_to_string(path)?;
    parse_records(&contents)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wool_records() -> Vec<Value> {
        vec![
            json!({
                "sourceIdentifier": {"resource": "minecraft:wool", "label": "White Wool"},
                "targetIdentifierCandidates": [{"resource": "minecraft:white_wool"}],
                "sourceStates": [{"name": "color", "options": ["white"]}]
            }),
            json!({
                "sourceIdentifier": {"resource": "minecraft:wool", "label": "Red Wool"},
                "targetIdentifierCandidates": [{"resource": "minecraft:red_wool"}],
                "sourceStates": [{"name": "color", "options": ["red"]}]
            }),
        ]
    }

    #[test]
    fn test_merges_records_by_resource() {
        let mut registry = BlockRegistry::new();
        let diagnostics = registry.ingest(wool_records());

        assert!(diagnostics.is_empty());
        assert_eq!(registry.len(), 1);
        let wool = registry.get("minecraft:wool").unwrap();
        assert_eq!(wool.source.label, "Wool");
        assert_eq!(wool.target_candidates.len(), 2);
        assert_eq!(wool.source_states.get("color").unwrap().options.len(), 2);
    }

    #[test]
    fn test_label_without_common_words_stays_empty() {
        let mut registry = BlockRegistry::new();
        registry.ingest(["Red Wool", "Blue Stone", "Green Sand"].map(|label| {
            json!({"sourceIdentifier": {"resource": "minecraft:wool", "label": label}})
        }));

        assert_eq!(registry.get("minecraft:wool").unwrap().source.label, "");
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let mut records = wool_records();
        records.insert(1, json!({"targetIdentifierCandidates": []}));
        records.push(json!("not a record"));

        let mut registry = BlockRegistry::new();
        let diagnostics = registry.ingest(records);

        assert_eq!(registry.len(), 1);
        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::MalformedRecord { index: 1, .. })
        ));
    }

    #[test]
    fn test_prepare_unions_candidate_schema() {
        let mut registry = BlockRegistry::new();
        registry.ingest(vec![
            json!({
                "sourceIdentifier": {"resource": "minecraft:stone_slab"},
                "targetIdentifierCandidates": [{"resource": "minecraft:brick_slab"}],
                "targetStates": [{"name": "type", "options": ["bottom", "top"]}]
            }),
            json!({
                "sourceIdentifier": {"resource": "minecraft:double_stone_slab"},
                "targetIdentifierCandidates": [{"resource": "minecraft:brick_slab"}],
                "targetStates": [{"name": "type", "options": ["double"]}, {"name": "waterlogged", "options": ["false"]}]
            }),
        ]);

        let slab = registry.get("minecraft:stone_slab").unwrap();
        assert_eq!(slab.target_states.len(), 1);

        let prepared = registry.prepare(slab);
        let kind = prepared.target_states.get("type").unwrap();
        assert_eq!(kind.option_values().collect::<Vec<_>>(), vec!["bottom", "top", "double"]);
        assert!(prepared.target_states.contains("waterlogged"));
        assert!(prepared.leftover_target_states().count() == 2);
    }

    #[test]
    fn test_states_of_chosen_target_only() {
        let mut registry = BlockRegistry::new();
        registry.ingest(vec![
            json!({
                "sourceIdentifier": {"resource": "minecraft:grass"},
                "targetIdentifierCandidates": [{"resource": "minecraft:grass_block"}],
                "targetStates": [{"name": "snowy", "options": ["false", "true"]}]
            }),
            json!({
                "sourceIdentifier": {"resource": "minecraft:dirt"},
                "targetIdentifierCandidates": [{"resource": "minecraft:dirt"}, {"resource": "minecraft:grass_block"}]
            }),
        ]);

        let dirt = registry.get("minecraft:dirt").unwrap();
        assert!(registry.prepare(dirt).target_states.contains("snowy"));

        let own = registry.states_of(dirt, &Identifier::new("minecraft:dirt", ""));
        assert!(own.is_empty());
        let grass = registry.states_of(dirt, &Identifier::new("minecraft:grass_block", ""));
        assert!(grass.contains("snowy"));
    }

    #[test]
    fn test_parse_records_requires_array() {
        assert_eq!(parse_records("[]").unwrap().len(), 0);
        assert!(matches!(
            parse_records(r#"{"records": []}"#),
            Err(TranslationError::MalformedRecord(_))
        ));
        assert!(matches!(parse_records("[1,"), Err(TranslationError::Json(_))));
    }

    #[test]
    fn test_load_records_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(&path, serde_json::to_string(&wool_records()).unwrap()).unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
    }
}
