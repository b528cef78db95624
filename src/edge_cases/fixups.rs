//! In-place edge-case rules: renames, bit fields and constant fix-ups.

use super::EdgeCaseRule;
use crate::types::{Block, Identifier};
use std::collections::BTreeMap;
use tracing::debug;

/// Forces the target identifier of specific source blocks.
#[derive(Debug, Clone, Default)]
pub struct RenameRule {
    renames: BTreeMap<String, String>,
}

impl RenameRule {
    pub fn new(renames: BTreeMap<String, String>) -> Self {
        Self { renames }
    }
}

impl EdgeCaseRule for RenameRule {
    fn name(&self) -> &str {
        "rename"
    }

    fn apply(&self, permutation: &mut Block) -> Option<Vec<Block>> {
        if let Some(target) = self.renames.get(&permutation.source.resource) {
            permutation.set_target(Identifier::normalized(target, ""));
        }
        None
    }
}

/// Decodes a bit-packed integer state into independent boolean constants.
///
/// Bit `i` of the assigned value sets `flags[i]` to "true" or "false". The
/// packed state stays in the condition so each value gets its own entry.
#[derive(Debug, Clone)]
pub struct BitFieldRule {
    state: String,
    flags: Vec<String>,
}

impl BitFieldRule {
    pub fn new(state: impl Into<String>, flags: &[&str]) -> Self {
        Self {
            state: state.into(),
            flags: flags.iter().map(|flag| flag.to_string()).collect(),
        }
    }
}

impl EdgeCaseRule for BitFieldRule {
    fn name(&self) -> &str {
        "bit_field"
    }

    fn apply(&self, permutation: &mut Block) -> Option<Vec<Block>> {
        let state = permutation.source_states.get(&self.state)?;
        if !state.is_structural() {
            return None;
        }
        let assigned = state.assigned_value.as_ref()?;
        let Ok(bits) = assigned.parse::<u32>() else {
            debug!(
                "{}: '{}={}' is not a bit field",
                permutation.source.resource, self.state, assigned
            );
            return None;
        };

        for (index, flag) in self.flags.iter().enumerate() {
            let set = u32::try_from(index)
                .ok()
                .and_then(|shift| 1u32.checked_shl(shift))
                .is_some_and(|mask| bits & mask != 0);
            permutation
                .constants
                .insert(flag.clone(), set.to_string());
        }
        None
    }
}

/// A constant forced on targets whose name contains a marker.
#[derive(Debug, Clone)]
pub struct ConstantFixup {
    /// Substring of the target resource that triggers the fix-up.
    pub target_contains: String,
    pub state: String,
    pub value: String,
}

impl ConstantFixup {
    pub fn new(target_contains: &str, state: &str, value: &str) -> Self {
        Self {
            target_contains: target_contains.to_string(),
            state: state.to_string(),
            value: value.to_string(),
        }
    }
}

/// Overrides guessed constants that are known to be wrong.
///
/// A fix-up only applies when the target actually has the state, either as
/// a constant or as an unclaimed target state.
#[derive(Debug, Clone)]
pub struct ConstantFixupRule {
    fixups: Vec<ConstantFixup>,
}

impl ConstantFixupRule {
    pub fn new(fixups: Vec<ConstantFixup>) -> Self {
        Self { fixups }
    }
}

impl Default for ConstantFixupRule {
    fn default() -> Self {
        Self::new(vec![
            // Stairs default to an outer shape; a lone stair is straight.
            ConstantFixup::new("stairs", "shape", "straight"),
            ConstantFixup::new("chest", "type", "single"),
        ])
    }
}

impl EdgeCaseRule for ConstantFixupRule {
    fn name(&self) -> &str {
        "constant_fixup"
    }

    fn apply(&self, permutation: &mut Block) -> Option<Vec<Block>> {
        let target = permutation.target_name()?.to_string();

        for fixup in &self.fixups {
            if !target.contains(&fixup.target_contains) {
                continue;
            }
            let has_state = permutation.constants.contains_key(&fixup.state)
                || permutation
                    .leftover_target_states()
                    .any(|state| state.name == fixup.state);
            if has_state {
                permutation
                    .constants
                    .insert(fixup.state.clone(), fixup.value.clone());
            }
        }
        None
    }
}
