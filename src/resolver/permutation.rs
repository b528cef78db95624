//! Permutation expansion over structural states.

use crate::types::Block;

/// Expand a resolved block into one permutation per combination of
/// structural state values.
///
/// Every structural state contributes "no value assigned" plus each of its
/// option values, so a block with structural states of 3 and 2 options
/// yields 4 x 3 permutations. A block without structural states yields a
/// single clone of itself. Order is deterministic: states in insertion
/// order, the unassigned branch first, then options in insertion order.
pub fn expand(block: &Block) -> Vec<Block> {
    let structural: Vec<(String, Vec<Option<String>>)> = block
        .structural_states()
        .map(|state| {
            let mut choices = vec![None];
            choices.extend(state.option_values().map(|value| Some(value.to_string())));
            (state.name.clone(), choices)
        })
        .collect();

    let mut permutations = vec![block.clone()];

    for (name, choices) in &structural {
        let mut next = Vec::with_capacity(permutations.len() * choices.len());
        for permutation in &permutations {
            for choice in choices {
                let mut copy = permutation.clone();
                if let Some(state) = copy.source_states.get_mut(name) {
                    state.assigned_value = choice.clone();
                }
                next.push(copy);
            }
        }
        permutations = next;
    }

    permutations
}

/// Number of permutations [`expand`] will produce for a block.
pub fn permutation_count(block: &Block) -> usize {
    block
        .structural_states()
        .map(|state| state.options.len() + 1)
        .product()
}
