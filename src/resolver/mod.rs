//! Block state and identifier resolution.
//!
//! This module matches source states against target states, expands
//! structural states into permutations and picks the target identifier of
//! each permutation.

pub mod similarity;
pub mod option_resolver;
pub mod state_resolver;
pub mod permutation;
pub mod identifier_resolver;

pub use identifier_resolver::{resolve_leftover_states, resolve_target};
pub use option_resolver::{resolve_option, OptionMatch};
pub use permutation::expand;
pub use similarity::{score, tokenize};
pub use state_resolver::{StateResolution, StateResolver};

use crate::diagnostics::Diagnostics;
use crate::overrides::OverrideTables;
use crate::types::{Block, Identifier, StateSet};

/// Resolve a block's states, expand it, and pick a target for each permutation.
///
/// The block is expected to carry a fresh (unclaimed) target state set.
/// `target_states` returns the states the chosen target actually has; only
/// those are filled as constants. Permutations whose target stays ambiguous
/// get no constants here and are left to the edge-case rules.
pub fn resolve_block<F>(
    tables: &OverrideTables,
    mut block: Block,
    target_states: F,
    include_default_constants: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<Block>
where
    F: Fn(&Identifier) -> StateSet,
{
    StateResolver::new(tables).resolve_block(&mut block, diagnostics);

    let mut permutations = expand(&block);
    for permutation in &mut permutations {
        if !resolve_target(permutation) {
            continue;
        }
        let target = permutation
            .chosen_target()
            .unwrap_or(&permutation.source)
            .clone();
        permutation.restrict_leftovers(&target_states(&target));
        resolve_leftover_states(permutation, include_default_constants);
    }

    permutations
}
