//! Translation table serialization.
//!
//! Final permutations become [`TranslationEntry`] values grouped by source
//! resource, then written as the JSON translation document.

pub mod entry;
pub mod json;

pub use entry::{MappingValue, TranslationEntry};
pub use json::{to_json_string, write_document, TranslationDocument, Translator};

use std::collections::BTreeMap;

/// Translation entries keyed by source resource, in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: BTreeMap<String, Vec<TranslationEntry>>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries for a source resource. Empty lists add no key.
    pub fn extend(&mut self, source: &str, entries: impl IntoIterator<Item = TranslationEntry>) {
        let mut entries = entries.into_iter().peekable();
        if entries.peek().is_none() {
            return;
        }
        self.entries
            .entry(source.to_string())
            .or_default()
            .extend(entries);
    }

    pub fn get(&self, source: &str) -> Option<&[TranslationEntry]> {
        self.entries.get(source).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<TranslationEntry>)> {
        self.entries.iter()
    }

    /// Number of source resources with at least one entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries across all source resources.
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<TranslationEntry>> {
        self.entries
    }
}

impl From<BTreeMap<String, Vec<TranslationEntry>>> for TranslationTable {
    fn from(entries: BTreeMap<String, Vec<TranslationEntry>>) -> Self {
        Self { entries }
    }
}
