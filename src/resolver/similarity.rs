//! Token-overlap similarity scoring.
//!
//! Every fuzzy match in the resolver (option values, state names, target
//! identifiers, leftover target states) goes through [`score`].

/// Score awarded when a token matches exactly.
const EXACT_MATCH: f64 = 1.0;
/// Score awarded when a token is a substring of (or contains) another.
const PARTIAL_MATCH: f64 = 0.1;
/// Penalty for a token with no counterpart at all.
const UNMATCHED_PENALTY: f64 = 0.00001;

/// Split a name into lower-case tokens.
///
/// Spaces are treated as underscores, then the string is split on `_`.
/// Empty tokens (from doubled or trailing separators) are dropped.
pub fn tokenize(name: &str) -> Vec<String> {
    name.to_lowercase()
        .replace(' ', "_")
        .split('_')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Score how well `tokens_b` is covered by `tokens_a`.
///
/// Each token of `tokens_b` adds 1.0 on an exact match in `tokens_a`,
/// 0.1 when it contains or is contained by some token of `tokens_a`, and
/// otherwise subtracts a tiny penalty so that fewer spurious tokens win ties.
pub fn score<A, B>(tokens_a: &[A], tokens_b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut similarity = 0.0;

    for token_b in tokens_b {
        let token_b = token_b.as_ref();

        if tokens_a.iter().any(|a| a.as_ref() == token_b) {
            similarity += EXACT_MATCH;
        } else if tokens_a.iter().any(|a| {
            let a = a.as_ref();
            a.contains(token_b) || token_b.contains(a)
        }) {
            similarity += PARTIAL_MATCH;
        } else {
            similarity -= UNMATCHED_PENALTY;
        }
    }

    similarity
}

/// Score two raw names against each other after tokenizing both.
pub fn score_names(a: &str, b: &str) -> f64 {
    score(&tokenize(a), &tokenize(b))
}

/// Outcome of picking the best-scoring candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BestMatch {
    /// Exactly one candidate reached the highest positive score.
    Unique(usize, f64),
    /// Several candidates share the highest positive score.
    Tied(f64),
    /// No candidate scored above zero.
    NoMatch,
}

/// Pick the candidate with the unique highest score above zero.
pub fn best_match(scores: impl IntoIterator<Item = f64>) -> BestMatch {
    let mut best_index = None;
    let mut best_score = 0.0;
    let mut tie_count = 0;

    for (index, value) in scores.into_iter().enumerate() {
        if value > best_score {
            best_score = value;
            best_index = Some(index);
            tie_count = 1;
        } else if value == best_score && best_index.is_some() {
            tie_count += 1;
        }
    }

    match best_index {
        Some(index) if tie_count == 1 => BestMatch::Unique(index, best_score),
        Some(_) => BestMatch::Tied(best_score),
        None => BestMatch::NoMatch,
    }
}
