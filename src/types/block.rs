//! Source blocks and their permutations.

use super::{BlockState, Identifier, StateSet};
use crate::resolver::similarity::tokenize;
use indexmap::IndexSet;
use std::collections::BTreeMap;

/// How many times a structural state's assigned value is repeated in the
/// permutation name, so structural discriminators dominate generic overlap.
const ASSIGNED_VALUE_WEIGHT: usize = 3;

/// One source block together with everything needed to translate it.
///
/// Cloning a block deep-copies all of its state sets, so permutations never
/// share mutable state with each other or with the registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub source: Identifier,
    /// Candidate target identifiers, narrowed to one once resolved.
    pub target_candidates: IndexSet<Identifier>,
    pub source_states: StateSet,
    /// Target schema states this block is resolved against.
    pub target_states: StateSet,
    /// Fixed target state values written for this block.
    pub constants: BTreeMap<String, String>,
}

impl Block {
    pub fn new(source: Identifier) -> Self {
        Self {
            source,
            target_candidates: IndexSet::new(),
            source_states: StateSet::new(),
            target_states: StateSet::new(),
            constants: BTreeMap::new(),
        }
    }

    /// Builder: add a target identifier candidate.
    pub fn with_candidate(mut self, candidate: Identifier) -> Self {
        self.target_candidates.insert(candidate);
        self
    }

    /// Builder: add a source state.
    pub fn with_source_state(mut self, state: BlockState) -> Self {
        self.source_states.merge_state(state);
        self
    }

    /// Builder: add a target schema state.
    pub fn with_target_state(mut self, state: BlockState) -> Self {
        self.target_states.merge_state(state);
        self
    }

    /// Merge another record for the same source resource into this block.
    pub fn absorb(&mut self, other: Block) {
        self.source.merge_label(&other.source.label);
        self.target_candidates.extend(other.target_candidates);
        self.source_states.merge_all(&other.source_states);
        self.target_states.merge_all(&other.target_states);
        for (name, value) in other.constants {
            self.constants.entry(name).or_insert(value);
        }
    }

    /// Source states that could not be expressed as target states.
    pub fn structural_states(&self) -> impl Iterator<Item = &BlockState> {
        self.source_states.iter().filter(|state| state.is_structural())
    }

    /// The single resolved target identifier, if narrowed down.
    pub fn chosen_target(&self) -> Option<&Identifier> {
        if self.target_candidates.len() == 1 {
            self.target_candidates.first()
        } else {
            None
        }
    }

    /// Replace all candidates with a single target identifier.
    pub fn set_target(&mut self, target: Identifier) {
        self.target_candidates.clear();
        self.target_candidates.insert(target);
    }

    /// Target name to emit, or `None` while several candidates remain.
    ///
    /// A block without any candidate keeps its source name.
    pub fn target_name(&self) -> Option<&str> {
        if self.target_candidates.is_empty() {
            return Some(&self.source.resource);
        }
        self.chosen_target().map(|target| target.resource.as_str())
    }

    /// Structural states with an assigned value, as `state -> value`.
    pub fn condition(&self) -> BTreeMap<String, String> {
        self.structural_states()
            .filter_map(|state| {
                state
                    .assigned_value
                    .as_ref()
                    .map(|value| (state.name.clone(), value.clone()))
            })
            .collect()
    }

    /// Tokens describing this permutation: source path, label, and each
    /// assigned structural value repeated for weight.
    pub fn name_tokens(&self) -> Vec<String> {
        let mut tokens = self.source.tokens();
        for state in self.structural_states() {
            if let Some(value) = &state.assigned_value {
                let value_tokens = tokenize(value);
                for _ in 0..ASSIGNED_VALUE_WEIGHT {
                    tokens.extend(value_tokens.iter().cloned());
                }
            }
        }
        tokens
    }

    /// Target schema states not claimed by any source state.
    pub fn leftover_target_states(&self) -> impl Iterator<Item = &BlockState> {
        self.target_states.iter().filter(|state| !state.is_claimed())
    }

    /// Drop unclaimed target states the chosen target does not have.
    pub fn restrict_leftovers(&mut self, known: &StateSet) {
        self.target_states
            .retain(|state| state.is_claimed() || known.contains(&state.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StateMapping;

    #[test]
    fn test_absorb_merges_records() {
        let mut block = Block::new(Identifier::new("minecraft:wool", "White Wool"))
            .with_candidate(Identifier::new("minecraft:white_wool", ""))
            .with_source_state(BlockState::new("color").with_options(["white"]));
        let other = Block::new(Identifier::new("minecraft:wool", "Red Wool"))
            .with_candidate(Identifier::new("minecraft:red_wool", ""))
            .with_candidate(Identifier::new("minecraft:white_wool", ""))
            .with_source_state(BlockState::new("color").with_options(["red"]));

        block.absorb(other);

        assert_eq!(block.source.label, "Wool");
        assert_eq!(block.target_candidates.len(), 2);
        assert_eq!(block.source_states.get("color").unwrap().options.len(), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let block = Block::new(Identifier::new("minecraft:lever", ""))
            .with_source_state(BlockState::new("open_bit").with_options(["0", "1"]));
        let mut copy = block.clone();
        copy.source_states.get_mut("open_bit").unwrap().assigned_value = Some("1".into());
        copy.source_states.get_mut("open_bit").unwrap().mapping = StateMapping::Empty;

        let original = block.source_states.get("open_bit").unwrap();
        assert!(original.assigned_value.is_none());
        assert!(original.is_structural());
    }

    #[test]
    fn test_name_tokens_weight_assigned_values() {
        let mut block = Block::new(Identifier::new("minecraft:stone_slab", "Slab"))
            .with_source_state(BlockState::new("stone_slab_type").with_options(["brick"]));
        block
            .source_states
            .get_mut("stone_slab_type")
            .unwrap()
            .assigned_value = Some("brick".into());

        let tokens = block.name_tokens();
        assert_eq!(tokens.iter().filter(|t| *t == "brick").count(), 3);
        assert_eq!(
            block.condition().get("stone_slab_type").map(String::as_str),
            Some("brick")
        );
    }

    #[test]
    fn test_target_name() {
        let mut block = Block::new(Identifier::new("minecraft:dirt", ""));
        assert_eq!(block.target_name(), Some("minecraft:dirt"));

        block.target_candidates.insert(Identifier::new("minecraft:coarse_dirt", ""));
        block.target_candidates.insert(Identifier::new("minecraft:rooted_dirt", ""));
        assert_eq!(block.target_name(), None);

        block.set_target(Identifier::new("minecraft:coarse_dirt", ""));
        assert_eq!(block.target_name(), Some("minecraft:coarse_dirt"));
    }

    #[test]
    fn test_restrict_leftovers_keeps_claimed() {
        let mut facing = BlockState::new("facing").with_options(["north"]);
        facing.claim();
        let mut block = Block::new(Identifier::new("minecraft:furnace", ""))
            .with_target_state(facing)
            .with_target_state(BlockState::new("lit").with_options(["false", "true"]))
            .with_target_state(BlockState::new("snowy").with_options(["false", "true"]));

        let known: StateSet = [BlockState::new("lit")].into_iter().collect();
        block.restrict_leftovers(&known);

        let names: Vec<&str> = block.target_states.names().collect();
        assert_eq!(names, vec!["facing", "lit"]);
    }
}
