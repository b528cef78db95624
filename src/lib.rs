//! # Blockstate Translator
//!
//! A Rust library for building block-state translation tables between two
//! Minecraft editions.
//!
//! ## Overview
//!
//! This library takes a corpus of source blocks (with their states and the
//! candidate target blocks they may correspond to) and produces a
//! translation table: for every source block, a list of entries saying which
//! target block to use under which state condition, how source states map
//! onto target states, and which target states are fixed constants.
//!
//! ## Quick Start
//!
//! ```ignore
//! use blockstate_translator::{load_corpus, Pipeline};
//!
//! // Builtin Bedrock -> Java override tables and edge-case rules
//! let mut pipeline = Pipeline::builtin();
//!
//! // Ingest the corpus; malformed records are skipped and reported
//! pipeline.ingest(load_corpus("path/to/corpus.json")?);
//!
//! // Resolve and write the translation document
//! let output = pipeline.run();
//! output.write("blocks.json")?;
//!
//! for diagnostic in output.diagnostics.iter() {
//!     println!("{}", diagnostic);
//! }
//! ```
//!
//! ## Custom Tables
//!
//! Override tables are plain data. Load your own and merge them over the
//! builtin ones, or start from empty tables for another pair of taxonomies:
//!
//! ```ignore
//! use blockstate_translator::{EdgeCaseRules, OverrideTables, Pipeline};
//!
//! let tables = OverrideTables::builtin().merge(OverrideTables::load("overrides.json")?);
//! let pipeline = Pipeline::with_overrides(tables);
//!
//! let bare = Pipeline::new(OverrideTables::new(), EdgeCaseRules::new());
//! ```

pub mod error;
pub mod types;
pub mod corpus;
pub mod overrides;
pub mod resolver;
pub mod edge_cases;
pub mod export;
pub mod diagnostics;
pub mod pipeline;
pub mod direct;

// Re-export main types for convenience
pub use error::{TranslationError, Result};
pub use types::{Block, BlockState, Identifier, StateMapping, StateOption, StateSet, ValueTable};
pub use corpus::{BlockRegistry, CorpusRecord, TargetSchema};
pub use overrides::{OverrideTables, StateNameOverride};
pub use edge_cases::{EdgeCaseRule, EdgeCaseRules};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput};
pub use export::{MappingValue, TranslationEntry, TranslationTable, Translator};
pub use direct::{BlockDescriptor, DefaultStates, DirectImporter};

/// Load raw corpus records from a JSON file.
pub fn load_corpus<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<serde_json::Value>> {
    corpus::load_records(path)
}

/// Parse raw corpus records from a JSON string.
pub fn parse_corpus(json: &str) -> Result<Vec<serde_json::Value>> {
    corpus::parse_records(json)
}

/// Similarity score between two names, on their tokens.
pub fn similarity(a: &str, b: &str) -> f64 {
    resolver::similarity::score_names(a, b)
}
