//! JSON translation document export.
//!
//! The document is an array of translator objects, each optionally bounded
//! by data version, holding the translations keyed by source resource:
//!
//! ```json
//! [{ "minDataVersion": 3700, "translations": { "minecraft:web": [{ "name": "minecraft:cobweb" }] } }]
//! ```

use super::{TranslationEntry, TranslationTable};
use crate::error::{Result, TranslationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One translator object of the document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_data_version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_data_version: Option<i32>,
    #[serde(default)]
    pub translations: BTreeMap<String, Vec<TranslationEntry>>,
}

/// The full translation document.
pub type TranslationDocument = Vec<Translator>;

impl Translator {
    pub fn new(table: TranslationTable) -> Self {
        Self {
            min_data_version: None,
            max_data_version: None,
            translations: table.into_inner(),
        }
    }

    /// Builder: restrict the translator to a data version range.
    pub fn with_data_versions(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_data_version = min;
        self.max_data_version = max;
        self
    }

    /// Parse a document and return its translators.
    pub fn parse_document(json: &str) -> Result<TranslationDocument> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serialize a single translator as a pretty-printed document.
pub fn to_json_string(translator: &Translator) -> Result<String> {
    if let (Some(min), Some(max)) = (translator.min_data_version, translator.max_data_version) {
        if min > max {
            return Err(TranslationError::Export(format!(
                "minDataVersion {} is greater than maxDataVersion {}",
                min, max
            )));
        }
    }

    let document: &[Translator] = std::slice::from_ref(translator);
    let mut json = serde_json::to_string_pretty(document)?;
    json.push('\n');
    Ok(json)
}

/// Write a translator document to a file.
pub fn write_document<P: AsRef<Path>>(path: P, translator: &Translator) -> Result<()> {
    let json = to_json_string(translator)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MappingValue;
    use pretty_assertions::assert_eq;

    fn sample_table() -> TranslationTable {
        let mut table = TranslationTable::new();
        let mut mapping = BTreeMap::new();
        mapping.insert("pillar_axis".to_string(), MappingValue::Rename("axis".into()));
        table.extend(
            "minecraft:log",
            vec![TranslationEntry {
                condition: BTreeMap::from([("old_log_type".to_string(), "oak".to_string())]),
                target_name: "minecraft:oak_log".into(),
                mapping,
                ..Default::default()
            }],
        );
        table
    }

    #[test]
    fn test_document_layout() {
        let translator = Translator::new(sample_table()).with_data_versions(Some(3700), None);
        let json = to_json_string(&translator).unwrap();

        let expected = r#"[
  {
    "minDataVersion": 3700,
    "translations": {
      "minecraft:log": [
        {
          "condition": {
            "old_log_type": "oak"
          },
          "name": "minecraft:oak_log",
          "mapping": {
            "pillar_axis": "axis"
          }
        }
      ]
    }
  }
]
"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_parse_document() {
        let translator = Translator::new(sample_table());
        let json = to_json_string(&translator).unwrap();
        let parsed = Translator::parse_document(&json).unwrap();
        assert_eq!(parsed, vec![translator]);
    }

    #[test]
    fn test_rejects_inverted_version_range() {
        let translator = Translator::new(TranslationTable::new()).with_data_versions(Some(10), Some(5));
        assert!(matches!(to_json_string(&translator), Err(TranslationError::Export(_))));
    }

    #[test]
    fn test_write_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks_translation.json");
        write_document(&path, &Translator::new(sample_table())).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"minecraft:oak_log\""));
    }
}
