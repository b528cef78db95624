//! Colour-indexed identifier explosion.

use super::EdgeCaseRule;
use crate::types::{Block, Identifier, StateMapping};
use std::collections::BTreeMap;

/// Dye colours in index order.
pub const COLOURS: [&str; 16] = [
    "white",
    "orange",
    "magenta",
    "light_blue",
    "yellow",
    "lime",
    "pink",
    "gray",
    "light_gray",
    "cyan",
    "purple",
    "blue",
    "brown",
    "green",
    "red",
    "black",
];

/// Splits a block with a consumed colour state into one permutation per
/// colour, each targeting `<namespace>:<colour>_<base>`.
///
/// The rule fires on permutations where the colour state was resolved to
/// "no effect" and carries no assigned value. Each output assigns the
/// colour value and turns the state back into a condition.
#[derive(Debug, Clone)]
pub struct ColourExplosionRule {
    state_names: Vec<String>,
    /// Source path -> base name used after the colour prefix.
    base_names: BTreeMap<String, String>,
}

impl ColourExplosionRule {
    pub fn new(state_names: &[&str], base_names: &[(&str, &str)]) -> Self {
        Self {
            state_names: state_names.iter().map(|s| s.to_string()).collect(),
            base_names: base_names
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    fn base_name<'b>(&'b self, block: &'b Block) -> &'b str {
        let path = block.source.path();
        self.base_names.get(path).map(String::as_str).unwrap_or(path)
    }
}

impl Default for ColourExplosionRule {
    fn default() -> Self {
        Self::new(
            &["color"],
            &[
                ("stained_hardened_clay", "terracotta"),
                ("concretepowder", "concrete_powder"),
                ("shulker_box", "shulker_box"),
            ],
        )
    }
}

/// Colour name for an option value: a palette index or a colour name.
pub fn colour_name(value: &str) -> Option<&str> {
    if let Ok(index) = value.parse::<usize>() {
        return COLOURS.get(index).copied();
    }
    match value {
        "silver" => Some("light_gray"),
        other => COLOURS.iter().copied().find(|colour| *colour == other),
    }
}

impl EdgeCaseRule for ColourExplosionRule {
    fn name(&self) -> &str {
        "colour_explosion"
    }

    fn apply(&self, permutation: &mut Block) -> Option<Vec<Block>> {
        let state = permutation.source_states.iter().find(|state| {
            self.state_names.contains(&state.name)
                && state.mapping.is_empty()
                && state.assigned_value.is_none()
        })?;

        let state_name = state.name.clone();
        let values: Vec<String> = if state.options.is_empty() {
            (0..COLOURS.len()).map(|index| index.to_string()).collect()
        } else {
            state.option_values().map(str::to_string).collect()
        };

        let namespace = permutation.source.namespace().to_string();
        let base = self.base_name(permutation).to_string();

        let outputs = values
            .into_iter()
            .filter_map(|value| {
                let colour = colour_name(&value)?;
                let mut copy = permutation.clone();
                if let Some(state) = copy.source_states.get_mut(&state_name) {
                    state.mapping = StateMapping::Unset;
                    state.assigned_value = Some(value.clone());
                }
                copy.set_target(Identifier::new(format!("{}:{}_{}", namespace, colour, base), ""));
                Some(copy)
            })
            .collect();

        Some(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockState;

    fn coloured(resource: &str, options: &[&str]) -> Block {
        let mut color = BlockState::new("color").with_options(options.iter().copied());
        color.mapping = StateMapping::Empty;
        Block::new(Identifier::new(resource, "")).with_source_state(color)
    }

    #[test]
    fn test_colour_name() {
        assert_eq!(colour_name("0"), Some("white"));
        assert_eq!(colour_name("15"), Some("black"));
        assert_eq!(colour_name("16"), None);
        assert_eq!(colour_name("silver"), Some("light_gray"));
        assert_eq!(colour_name("lime"), Some("lime"));
        assert_eq!(colour_name("mauve"), None);
    }

    #[test]
    fn test_explodes_named_colours() {
        let rule = ColourExplosionRule::default();
        let mut block = coloured("minecraft:wool", &["white", "silver", "red"]);

        let outputs = rule.apply(&mut block).unwrap();
        let targets: Vec<_> = outputs.iter().filter_map(|b| b.target_name()).collect();
        assert_eq!(
            targets,
            vec!["minecraft:white_wool", "minecraft:light_gray_wool", "minecraft:red_wool"]
        );
        assert_eq!(outputs[1].condition()["color"], "silver");
    }

    #[test]
    fn test_explodes_index_without_options() {
        let rule = ColourExplosionRule::default();
        let mut block = coloured("minecraft:stained_hardened_clay", &[]);

        let outputs = rule.apply(&mut block).unwrap();
        assert_eq!(outputs.len(), 16);
        assert_eq!(outputs[9].target_name(), Some("minecraft:cyan_terracotta"));
        assert_eq!(outputs[9].condition()["color"], "9");
    }

    #[test]
    fn test_ignores_unconsumed_colour_state() {
        let rule = ColourExplosionRule::default();
        let mut block = Block::new(Identifier::new("minecraft:bed", ""))
            .with_source_state(BlockState::new("color").with_options(["red"]));
        assert!(rule.apply(&mut block).is_none());
    }
}
