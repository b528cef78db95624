//! Namespaced block identifiers.

use crate::resolver::similarity::tokenize;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Default namespace applied to bare resource names.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced resource name plus a human-readable label.
///
/// Identity is by `resource` only: two identifiers with different labels
/// but the same resource compare and hash equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    /// Resource location, e.g. "minecraft:stone_slab".
    pub resource: String,
    /// Display label, e.g. "Stone Slab".
    #[serde(default)]
    pub label: String,
    /// Set once a label conflict was merged; an empty label then means the
    /// merged labels share no words, not that no label is known.
    #[serde(skip)]
    label_merged: bool,
}

impl Identifier {
    pub fn new(resource: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            label: label.into(),
            label_merged: false,
        }
    }

    /// Create an identifier, prefixing the default namespace when missing.
    pub fn normalized(resource: &str, label: impl Into<String>) -> Self {
        Self::new(normalize_resource(resource), label)
    }

    /// Get the namespace (e.g., "minecraft").
    pub fn namespace(&self) -> &str {
        self.resource
            .split_once(':')
            .map(|(namespace, _)| namespace)
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Get the path without namespace (e.g., "stone_slab").
    pub fn path(&self) -> &str {
        self.resource
            .split_once(':')
            .map(|(_, path)| path)
            .unwrap_or(&self.resource)
    }

    /// Name tokens used for similarity matching: path tokens then label tokens.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = tokenize(self.path());
        tokens.extend(tokenize(&self.label));
        tokens
    }

    /// Merge another label for the same resource.
    ///
    /// On conflict the label keeps only the words both labels share, so the
    /// merged label describes what every merged record has in common.
    pub fn merge_label(&mut self, other: &str) {
        if other.is_empty() || self.label == other {
            return;
        }
        if self.label.is_empty() {
            if !self.label_merged {
                self.label = other.to_string();
            }
            return;
        }

        let theirs = tokenize(other);
        let common: Vec<&str> = label_words(&self.label)
            .filter(|word| theirs.contains(&word.to_lowercase()))
            .collect();
        self.label = common.join(" ");
        self.label_merged = true;
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource.hash(state);
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.label.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{} ({})", self.resource, self.label)
        }
    }
}

/// Prefix the default namespace to a bare resource name.
pub fn normalize_resource(resource: &str) -> String {
    if resource.contains(':') {
        resource.to_string()
    } else {
        format!("{}:{}", DEFAULT_NAMESPACE, resource)
    }
}

fn label_words(label: &str) -> impl Iterator<Item = &str> {
    label
        .split(|c: char| c == ' ' || c == '_')
        .filter(|word| !word.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_by_resource() {
        let a = Identifier::new("minecraft:stone", "Stone");
        let b = Identifier::new("minecraft:stone", "Smooth Stone");
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_namespace_and_path() {
        let id = Identifier::new("minecraft:stone_slab", "");
        assert_eq!(id.namespace(), "minecraft");
        assert_eq!(id.path(), "stone_slab");

        let bare = Identifier::new("stone", "");
        assert_eq!(bare.namespace(), "minecraft");
        assert_eq!(bare.path(), "stone");
        assert_eq!(Identifier::normalized("stone", "").resource, "minecraft:stone");
    }

    #[test]
    fn test_tokens() {
        let id = Identifier::new("minecraft:stone_slab", "Smooth Slab");
        assert_eq!(id.tokens(), vec!["stone", "slab", "smooth", "slab"]);
    }

    #[test]
    fn test_merge_label_keeps_common_words() {
        let mut id = Identifier::new("minecraft:wool", "White Wool");
        id.merge_label("Orange Wool");
        assert_eq!(id.label, "Wool");

        id.merge_label("Wool");
        assert_eq!(id.label, "Wool");

        let mut empty = Identifier::new("minecraft:wool", "");
        empty.merge_label("Wool");
        assert_eq!(empty.label, "Wool");
    }

    #[test]
    fn test_merge_label_stays_empty_without_common_words() {
        let mut id = Identifier::new("minecraft:wool", "Red Wool");
        id.merge_label("Blue Stone");
        assert_eq!(id.label, "");

        id.merge_label("Green Sand");
        assert_eq!(id.label, "");
    }
}
