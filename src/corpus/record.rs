//! Serde model of one corpus record.

use crate::error::{Result, TranslationError};
use crate::types::{normalize_resource, Block, BlockState, Identifier, StateOption};
use serde::{Deserialize, Serialize};

/// One record of the input corpus.
///
/// Several records may describe the same source resource; they are merged
/// into a single [`Block`] on ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusRecord {
    pub source_identifier: Identifier,
    #[serde(default)]
    pub target_identifier_candidates: Vec<Identifier>,
    #[serde(default)]
    pub source_states: Vec<StateRecord>,
    #[serde(default)]
    pub target_states: Vec<StateRecord>,
}

/// A block state as listed in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub name: String,
    #[serde(default)]
    pub options: Vec<OptionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// An option either as a bare value or with a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionRecord {
    Value(String),
    Described {
        value: String,
        #[serde(default)]
        description: String,
    },
}

impl OptionRecord {
    fn into_option(self) -> StateOption {
        match self {
            OptionRecord::Value(value) => StateOption::new(value, ""),
            OptionRecord::Described { value, description } => StateOption::new(value, description),
        }
    }
}

impl StateRecord {
    fn into_state(self) -> Result<BlockState> {
        if self.name.trim().is_empty() {
            return Err(TranslationError::MalformedRecord(
                "state with an empty name".to_string(),
            ));
        }

        let mut state = BlockState::new(self.name);
        for option in self.options {
            state.add_option(option.into_option());
        }
        if let Some(default) = self.default {
            state.default_value = default;
        }
        Ok(state)
    }
}

impl CorpusRecord {
    /// Validate the record and convert it into a block.
    ///
    /// Resources are normalized to `namespace:path`. The record's target
    /// states are attached to the block; the caller registers them in the
    /// target schema.
    pub fn into_block(self) -> Result<Block> {
        if self.source_identifier.resource.trim().is_empty() {
            return Err(TranslationError::MalformedRecord(
                "empty source resource".to_string(),
            ));
        }

        let mut block = Block::new(Identifier::normalized(
            &self.source_identifier.resource,
            self.source_identifier.label,
        ));

        for candidate in self.target_identifier_candidates {
            if candidate.resource.trim().is_empty() {
                return Err(TranslationError::MalformedRecord(format!(
                    "{}: empty target candidate resource",
                    block.source.resource
                )));
            }
            block.target_candidates.insert(Identifier::new(
                normalize_resource(&candidate.resource),
                candidate.label,
            ));
        }

        for state in self.source_states {
            block.source_states.merge_state(state.into_state()?);
        }
        for state in self.target_states {
            block.target_states.merge_state(state.into_state()?);
        }

        Ok(block)
    }
}
