//! Matching a single state option against a target state's options.

use super::similarity::score;
use crate::overrides::OverrideTables;
use crate::types::StateOption;
use indexmap::IndexMap;

/// How an option was matched, from most to least confident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMatch {
    /// The target has the exact same value.
    Exact,
    /// The target has a value listed as equivalent in the override tables.
    Equivalent,
    /// Best token-overlap score over value and description.
    Similar,
    /// The descriptions are identical.
    Description,
    /// Nothing matched; the first target value was taken.
    Fallback,
}

/// Resolve `option` against `candidates`, setting its `resolved_value`.
///
/// Returns `None` only when there are no candidates at all.
pub fn resolve_option(
    option: &mut StateOption,
    candidates: &IndexMap<String, StateOption>,
    tables: &OverrideTables,
) -> Option<OptionMatch> {
    let (value, how) = match_option(option, candidates, tables)?;
    option.resolved_value = Some(value);
    Some(how)
}

fn match_option(
    option: &StateOption,
    candidates: &IndexMap<String, StateOption>,
    tables: &OverrideTables,
) -> Option<(String, OptionMatch)> {
    if candidates.contains_key(&option.value) {
        return Some((option.value.clone(), OptionMatch::Exact));
    }

    for equivalent in tables.equivalents(&option.value) {
        if candidates.contains_key(equivalent) {
            return Some((equivalent.to_string(), OptionMatch::Equivalent));
        }
    }

    // Ties keep the first candidate encountered.
    let tokens = option.tokens();
    let mut best: Option<&StateOption> = None;
    let mut best_score = 0.0;
    for candidate in candidates.values() {
        let similarity = score(&tokens, &candidate.tokens());
        if similarity > best_score {
            best_score = similarity;
            best = Some(candidate);
        }
    }
    if let Some(candidate) = best {
        return Some((candidate.value.clone(), OptionMatch::Similar));
    }

    if !option.description.is_empty() {
        if let Some(candidate) = candidates
            .values()
            .find(|candidate| candidate.description == option.description)
        {
            return Some((candidate.value.clone(), OptionMatch::Description));
        }
    }

    candidates
        .values()
        .next()
        .map(|candidate| (candidate.value.clone(), OptionMatch::Fallback))
}
