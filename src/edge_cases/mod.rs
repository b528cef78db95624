//! Hand-written exceptions applied to resolved permutations.
//!
//! Rules run in order against every permutation. A rule may rewrite the
//! permutation in place (target identifier, constants, mappings) or return a
//! replacement list. All rules run even after one has fired; every non-empty
//! replacement list is added to the result, and the permutation itself is
//! kept only when no rule replaced it.

mod colour;
mod fixups;

pub use colour::{ColourExplosionRule, COLOURS};
pub use fixups::{BitFieldRule, ConstantFixupRule, RenameRule};

use crate::overrides::OverrideTables;
use crate::types::Block;
use tracing::debug;

/// A special case the generic resolver cannot express.
pub trait EdgeCaseRule {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Apply the rule. Returning `Some` with a non-empty list replaces the
    /// permutation with those blocks.
    fn apply(&self, permutation: &mut Block) -> Option<Vec<Block>>;
}

/// An ordered list of edge-case rules.
#[derive(Default)]
pub struct EdgeCaseRules {
    rules: Vec<Box<dyn EdgeCaseRule>>,
}

impl EdgeCaseRules {
    /// An empty rule list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin Bedrock -> Java rules, using the renames from `tables`.
    pub fn builtin(tables: &OverrideTables) -> Self {
        Self::new()
            .with_rule(RenameRule::new(tables.identifier_renames.clone()))
            .with_rule(BitFieldRule::new(
                "multi_face_direction_bits",
                &["down", "up", "south", "west", "north", "east"],
            ))
            .with_rule(BitFieldRule::new(
                "vine_direction_bits",
                &["south", "west", "north", "east"],
            ))
            .with_rule(ColourExplosionRule::default())
            .with_rule(ConstantFixupRule::default())
    }

    /// Builder: append a rule.
    pub fn with_rule<R: EdgeCaseRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against one permutation.
    pub fn apply(&self, mut permutation: Block) -> Vec<Block> {
        let mut replacements = Vec::new();

        for rule in &self.rules {
            if let Some(outputs) = rule.apply(&mut permutation) {
                if !outputs.is_empty() {
                    debug!(
                        "{}: rule '{}' produced {} permutations",
                        permutation.source.resource,
                        rule.name(),
                        outputs.len()
                    );
                    replacements.extend(outputs);
                }
            }
        }

        if replacements.is_empty() {
            vec![permutation]
        } else {
            replacements
        }
    }
}

impl std::fmt::Debug for EdgeCaseRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Identifier;

    struct Split(&'static str, &'static [&'static str]);

    impl EdgeCaseRule for Split {
        fn name(&self) -> &str {
            self.0
        }

        fn apply(&self, permutation: &mut Block) -> Option<Vec<Block>> {
            Some(
                self.1
                    .iter()
                    .map(|target| {
                        let mut copy = permutation.clone();
                        copy.set_target(Identifier::new(*target, ""));
                        copy
                    })
                    .collect(),
            )
        }
    }

    struct Touch;

    impl EdgeCaseRule for Touch {
        fn name(&self) -> &str {
            "touch"
        }

        fn apply(&self, permutation: &mut Block) -> Option<Vec<Block>> {
            permutation.constants.insert("touched".into(), "true".into());
            None
        }
    }

    fn block() -> Block {
        Block::new(Identifier::new("minecraft:test", ""))
    }

    #[test]
    fn test_no_rules_keeps_permutation() {
        let rules = EdgeCaseRules::new();
        let result = rules.apply(block());
        assert_eq!(result, vec![block()]);
    }

    #[test]
    fn test_in_place_rewrite_is_kept() {
        let rules = EdgeCaseRules::new().with_rule(Touch);
        let result = rules.apply(block());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].constants["touched"], "true");
    }

    #[test]
    fn test_empty_replacement_is_ignored() {
        let rules = EdgeCaseRules::new().with_rule(Split("none", &[]));
        assert_eq!(rules.apply(block()).len(), 1);
    }

    #[test]
    fn test_every_replacing_rule_contributes() {
        let rules = EdgeCaseRules::new()
            .with_rule(Touch)
            .with_rule(Split("first", &["minecraft:a", "minecraft:b"]))
            .with_rule(Split("second", &["minecraft:c"]));

        let result = rules.apply(block());
        let targets: Vec<_> = result.iter().filter_map(|b| b.target_name()).collect();
        assert_eq!(targets, vec!["minecraft:a", "minecraft:b", "minecraft:c"]);
        assert!(result.iter().all(|b| b.constants.contains_key("touched")));
    }

    #[test]
    fn test_builtin_rule_order() {
        let rules = EdgeCaseRules::builtin(&OverrideTables::builtin());
        assert_eq!(
            format!("{:?}", rules),
            r#"["rename", "bit_field", "bit_field", "colour_explosion", "constant_fixup"]"#
        );
    }
}
