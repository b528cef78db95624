//! Target identifier selection and leftover target-state filling.

use super::similarity::{best_match, score, tokenize, BestMatch};
use crate::types::{is_truthy, Block};
use tracing::debug;

/// Minimum name score for a leftover state to count as named by the block.
const STATE_NAMED_THRESHOLD: f64 = 0.5;
/// Boost multiplier applied to truthy options of a state the block names.
const TRUTHY_BOOST: f64 = 4.0;

/// Narrow a permutation's target candidates down to one.
///
/// Returns `false` when the candidates stay ambiguous. Edge-case rules may
/// still pick a target later, so no diagnostic is recorded here.
pub fn resolve_target(permutation: &mut Block) -> bool {
    if permutation.target_candidates.len() <= 1 {
        return true;
    }

    let name_tokens = permutation.name_tokens();
    let scores = permutation
        .target_candidates
        .iter()
        .map(|candidate| score(&name_tokens, &candidate.tokens()));

    let chosen = match best_match(scores) {
        BestMatch::Unique(index, _) => permutation.target_candidates.get_index(index).cloned(),
        BestMatch::Tied(_) | BestMatch::NoMatch => {
            let source = &permutation.source;
            permutation
                .target_candidates
                .iter()
                .find(|candidate| candidate.resource == source.resource)
                .or_else(|| {
                    permutation
                        .target_candidates
                        .iter()
                        .find(|candidate| !source.label.is_empty() && candidate.label == source.label)
                })
                .cloned()
        }
    };

    match chosen {
        Some(target) => {
            permutation.set_target(target);
            true
        }
        None => {
            debug!(
                "{}[{}]: {} candidates remain",
                permutation.source.resource,
                format_condition(permutation),
                permutation.target_candidates.len()
            );
            false
        }
    }
}

/// Fill target-only states that no source state claimed with constants.
///
/// A state the block's name mentions prefers a truthy option; otherwise the
/// option whose value best matches the name wins; otherwise the declared
/// default is used. With `include_defaults` off, values equal to the
/// default are not written.
pub fn resolve_leftover_states(permutation: &mut Block, include_defaults: bool) {
    let name_tokens = permutation.name_tokens();
    let mut constants = Vec::new();

    for state in permutation.leftover_target_states() {
        if permutation.constants.contains_key(&state.name) {
            continue;
        }

        let name_score = score(&name_tokens, &state.tokens());
        let named = name_score > STATE_NAMED_THRESHOLD;

        let mut best: Option<&str> = None;
        let mut best_score = 0.0;
        for value in state.option_values() {
            let mut similarity = score(&name_tokens, &tokenize(value));
            if named && is_truthy(value) {
                similarity += TRUTHY_BOOST * name_score;
            }
            if similarity > best_score {
                best_score = similarity;
                best = Some(value);
            }
        }

        let value = match best {
            Some(value) => value,
            None if !state.default_value.is_empty() => state.default_value.as_str(),
            None => continue,
        };

        if include_defaults || value != state.default_value {
            constants.push((state.name.clone(), value.to_string()));
        }
    }

    permutation.constants.extend(constants);
}

/// Render a permutation condition as `state=value,...`.
pub fn format_condition(permutation: &Block) -> String {
    permutation
        .condition()
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(",")
}
