//! Source block state to target block state resolution.

use super::option_resolver::{resolve_option, OptionMatch};
use super::similarity::score;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::overrides::{OverrideTables, StateNameOverride};
use crate::types::{Block, BlockState, StateMapping, StateSet, ValueTable};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// How a source state was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateResolution {
    /// An explicit value table from the override tables was applied.
    ManualTable,
    /// The override tables say to leave this state structural.
    DoNotMap,
    /// The override tables say this state has no target effect.
    NoEffect,
    /// A target state with the same name and values exists.
    Identity(String),
    /// An alternate name from the override tables matched.
    Alternate(String),
    /// The unique best name-similarity match.
    Similar(String),
    /// Several target states tied on name similarity.
    Ambiguous,
    /// Nothing matched.
    Unresolved,
}

impl StateResolution {
    /// Whether the state ended up structural (mapping left unset).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            StateResolution::DoNotMap | StateResolution::Ambiguous | StateResolution::Unresolved
        )
    }
}

/// Resolves source states against a target state set.
pub struct StateResolver<'a> {
    tables: &'a OverrideTables,
}

impl<'a> StateResolver<'a> {
    pub fn new(tables: &'a OverrideTables) -> Self {
        Self { tables }
    }

    /// Resolve every source state of a block in order.
    ///
    /// Target states that get matched are claimed, so later source states
    /// can no longer pick them up through similarity.
    pub fn resolve_block(&self, block: &mut Block, diagnostics: &mut Diagnostics) {
        let block_name = block.source.resource.clone();
        for state in block.source_states.iter_mut() {
            self.resolve(&block_name, state, &mut block.target_states, diagnostics);
        }
    }

    /// Resolve a single source state against `targets`.
    pub fn resolve(
        &self,
        block_name: &str,
        state: &mut BlockState,
        targets: &mut StateSet,
        diagnostics: &mut Diagnostics,
    ) -> StateResolution {
        if let Some(table) = self.tables.value_table(&state.name) {
            self.apply_value_table(block_name, state, table, targets, diagnostics);
            return StateResolution::ManualTable;
        }

        let alternates = match self.tables.state_name(&state.name) {
            Some(StateNameOverride::DoNotMap) => {
                debug!("{}: '{}' is kept structural by override", block_name, state.name);
                return StateResolution::DoNotMap;
            }
            Some(StateNameOverride::NoEffect) => {
                state.mapping = StateMapping::Empty;
                return StateResolution::NoEffect;
            }
            Some(StateNameOverride::Alternates(names)) => names,
            None => &[],
        };

        if let Some(target) = targets.get_mut(&state.name) {
            if target.has_same_values(state) {
                let mut table = ValueTable::new();
                for option in state.options.values_mut() {
                    option.resolved_value = Some(option.value.clone());
                    table.insert(
                        option.value.clone(),
                        BTreeMap::from([(target.name.clone(), option.value.clone())]),
                    );
                }
                state.mapping = StateMapping::Table(table);
                state.simplify();
                target.claim();
                return StateResolution::Identity(target.name.clone());
            }
        }

        for alternate in alternates {
            if let Some(target) = targets.get_mut(alternate) {
                self.resolve_against(block_name, state, target, diagnostics);
                return StateResolution::Alternate(alternate.clone());
            }
        }

        self.resolve_by_similarity(block_name, state, targets, diagnostics)
    }

    fn resolve_by_similarity(
        &self,
        block_name: &str,
        state: &mut BlockState,
        targets: &mut StateSet,
        diagnostics: &mut Diagnostics,
    ) -> StateResolution {
        let tokens = state.tokens();
        let scored: Vec<(String, f64)> = targets
            .iter()
            .filter(|target| !target.is_claimed())
            .map(|target| (target.name.clone(), score(&tokens, &target.tokens())))
            .collect();

        let best_score = scored
            .iter()
            .map(|(_, similarity)| *similarity)
            .fold(0.0, f64::max);
        let best: Vec<&String> = scored
            .iter()
            .filter(|(_, similarity)| best_score > 0.0 && *similarity == best_score)
            .map(|(name, _)| name)
            .collect();

        match best.as_slice() {
            [name] => {
                let name = (*name).clone();
                if let Some(target) = targets.get_mut(&name) {
                    self.resolve_against(block_name, state, target, diagnostics);
                }
                StateResolution::Similar(name)
            }
            [] => {
                warn!("{}: no target state found for '{}'", block_name, state.name);
                diagnostics.push(Diagnostic::UnresolvedState {
                    block: block_name.to_string(),
                    state: state.name.clone(),
                });
                StateResolution::Unresolved
            }
            tied => {
                let candidates: Vec<String> = tied.iter().map(|name| (*name).clone()).collect();
                warn!(
                    "{}: state '{}' is ambiguous between {:?}",
                    block_name, state.name, candidates
                );
                diagnostics.push(Diagnostic::AmbiguousState {
                    block: block_name.to_string(),
                    state: state.name.clone(),
                    candidates,
                });
                StateResolution::Ambiguous
            }
        }
    }

    /// Resolve every option of `state` against `target` and claim it.
    fn resolve_against(
        &self,
        block_name: &str,
        state: &mut BlockState,
        target: &mut BlockState,
        diagnostics: &mut Diagnostics,
    ) {
        let mut table = ValueTable::new();
        for option in state.options.values_mut() {
            let how = resolve_option(option, &target.options, self.tables);
            if how == Some(OptionMatch::Fallback) {
                let resolved = option.resolved_value.clone().unwrap_or_default();
                debug!(
                    "{}: '{}={}' guessed as '{}={}'",
                    block_name, state.name, option.value, target.name, resolved
                );
                diagnostics.push(Diagnostic::LowConfidenceOption {
                    block: block_name.to_string(),
                    state: state.name.clone(),
                    value: option.value.clone(),
                    resolved,
                });
            }

            let mut targets = BTreeMap::new();
            if let Some(resolved) = &option.resolved_value {
                targets.insert(target.name.clone(), resolved.clone());
            }
            table.insert(option.value.clone(), targets);
        }

        state.mapping = StateMapping::Table(table);
        state.simplify();
        target.claim();
    }

    fn apply_value_table(
        &self,
        block_name: &str,
        state: &mut BlockState,
        manual: &ValueTable,
        targets: &mut StateSet,
        diagnostics: &mut Diagnostics,
    ) {
        let table: ValueTable = if state.options.is_empty() {
            manual.clone()
        } else {
            state
                .options
                .values_mut()
                .map(|option| {
                    let entry = manual.get(&option.value).cloned().unwrap_or_else(|| {
                        debug!(
                            "{}: override table for '{}' has no entry for '{}'",
                            block_name, state.name, option.value
                        );
                        BTreeMap::new()
                    });
                    if entry.len() == 1 {
                        option.resolved_value = entry.values().next().cloned();
                    }
                    (option.value.clone(), entry)
                })
                .collect()
        };

        let referenced: BTreeSet<&String> = table.values().flat_map(|entry| entry.keys()).collect();
        for target_name in referenced {
            match targets.get_mut(target_name) {
                Some(target) => target.claim(),
                None => {
                    warn!(
                        "{}: override for '{}' references missing target state '{}'",
                        block_name, state.name, target_name
                    );
                    diagnostics.push(Diagnostic::MissingTargetState {
                        block: block_name.to_string(),
                        state: state.name.clone(),
                        target_state: target_name.clone(),
                    });
                }
            }
        }

        state.mapping = StateMapping::Table(table);
        state.simplify();
    }
}
