//! Collected resolution diagnostics.
//!
//! Resolution never aborts. Anything that could not be matched is logged
//! through `tracing` and recorded here so it can be followed up by hand.

use serde::Serialize;

/// A single unresolved or low-confidence item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// Several target states tied for a source state's name.
    #[serde(rename_all = "camelCase")]
    AmbiguousState {
        block: String,
        state: String,
        candidates: Vec<String>,
    },
    /// No target state could be found for a source state.
    #[serde(rename_all = "camelCase")]
    UnresolvedState { block: String, state: String },
    /// An option fell back to the first candidate value.
    #[serde(rename_all = "camelCase")]
    LowConfidenceOption {
        block: String,
        state: String,
        value: String,
        resolved: String,
    },
    /// A final permutation was dropped because its target identifier could
    /// not be narrowed to a single candidate.
    #[serde(rename_all = "camelCase")]
    AmbiguousIdentifier {
        block: String,
        condition: String,
        candidates: Vec<String>,
    },
    /// A corpus record was skipped.
    #[serde(rename_all = "camelCase")]
    MalformedRecord { index: usize, reason: String },
    /// A manual table referenced a target state the block does not have.
    #[serde(rename_all = "camelCase")]
    MissingTargetState {
        block: String,
        state: String,
        target_state: String,
    },
}

impl Diagnostic {
    /// Source block the diagnostic is about, if any.
    pub fn block(&self) -> Option<&str> {
        match self {
            Diagnostic::AmbiguousState { block, .. }
            | Diagnostic::UnresolvedState { block, .. }
            | Diagnostic::LowConfidenceOption { block, .. }
            | Diagnostic::AmbiguousIdentifier { block, .. }
            | Diagnostic::MissingTargetState { block, .. } => Some(block),
            Diagnostic::MalformedRecord { .. } => None,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::AmbiguousState {
                block,
                state,
                candidates,
            } => write!(
                f,
                "{}: state '{}' is ambiguous between {}",
                block,
                state,
                candidates.join(", ")
            ),
            Diagnostic::UnresolvedState { block, state } => {
                write!(f, "{}: no target state for '{}'", block, state)
            }
            Diagnostic::LowConfidenceOption {
                block,
                state,
                value,
                resolved,
            } => write!(
                f,
                "{}: '{}={}' guessed as '{}'",
                block, state, value, resolved
            ),
            Diagnostic::AmbiguousIdentifier {
                block,
                condition,
                candidates,
            } => write!(
                f,
                "{}[{}]: no mapping found among {}",
                block,
                condition,
                candidates.join(", ")
            ),
            Diagnostic::MalformedRecord { index, reason } => {
                write!(f, "record #{} skipped: {}", index, reason)
            }
            Diagnostic::MissingTargetState {
                block,
                state,
                target_state,
            } => write!(
                f,
                "{}: '{}' references missing target state '{}'",
                block, state, target_state
            ),
        }
    }
}

/// Ordered collection of diagnostics from one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count diagnostics matching a predicate.
    pub fn count_where(&self, predicate: impl Fn(&Diagnostic) -> bool) -> usize {
        self.entries.iter().filter(|d| predicate(d)).count()
    }
}
