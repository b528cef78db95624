//! End-to-end translation pipeline.
//!
//! Ingests corpus records, resolves every block against the target schema,
//! runs the edge-case rules and collects the translation table together
//! with the diagnostics of the run.

use crate::corpus::{self, BlockRegistry};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::edge_cases::EdgeCaseRules;
use crate::error::Result;
use crate::export::{self, TranslationEntry, TranslationTable, Translator};
use crate::overrides::OverrideTables;
use crate::resolver::{self, identifier_resolver::format_condition};
use crate::types::Block;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Lowest data version the emitted translator applies to.
    pub min_data_version: Option<i32>,
    /// Highest data version the emitted translator applies to.
    pub max_data_version: Option<i32>,
    /// Emit condition values equal to the state default as `optionalCondition`.
    pub optional_default_conditions: bool,
    /// Write leftover target states as constants even when they resolve to
    /// their default value.
    pub emit_default_constants: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_data_version: None,
            max_data_version: None,
            optional_default_conditions: false,
            emit_default_constants: true,
        }
    }
}

impl PipelineConfig {
    /// Restrict the output to a data version range.
    pub fn with_data_versions(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_data_version = min;
        self.max_data_version = max;
        self
    }

    pub fn with_optional_default_conditions(mut self, enabled: bool) -> Self {
        self.optional_default_conditions = enabled;
        self
    }

    pub fn with_default_constants(mut self, enabled: bool) -> Self {
        self.emit_default_constants = enabled;
        self
    }
}

/// Output of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: TranslationTable,
    pub diagnostics: Diagnostics,
    pub min_data_version: Option<i32>,
    pub max_data_version: Option<i32>,
}

impl PipelineOutput {
    /// The translator object for the document.
    pub fn translator(&self) -> Translator {
        Translator::new(self.table.clone())
            .with_data_versions(self.min_data_version, self.max_data_version)
    }

    /// Serialize the translation document.
    pub fn to_json(&self) -> Result<String> {
        export::to_json_string(&self.translator())
    }

    /// Write the translation document to a file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        export::write_document(path, &self.translator())
    }

    /// Serialize the diagnostics as a JSON array.
    pub fn diagnostics_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.diagnostics)?)
    }
}

/// The translation pipeline.
///
/// Owns the block registry built from the corpus. Override tables and
/// edge-case rules are injected, so several pipelines with different data
/// can coexist.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    overrides: OverrideTables,
    rules: EdgeCaseRules,
    registry: BlockRegistry,
    ingest_diagnostics: Diagnostics,
}

impl Pipeline {
    /// Create a pipeline with explicit override tables and rules.
    pub fn new(overrides: OverrideTables, rules: EdgeCaseRules) -> Self {
        Self {
            config: PipelineConfig::default(),
            overrides,
            rules,
            registry: BlockRegistry::new(),
            ingest_diagnostics: Diagnostics::new(),
        }
    }

    /// Pipeline with the builtin Bedrock -> Java tables and rules.
    pub fn builtin() -> Self {
        Self::with_overrides(OverrideTables::builtin())
    }

    /// Pipeline using `overrides` and the builtin rules built from them.
    pub fn with_overrides(overrides: OverrideTables) -> Self {
        let rules = EdgeCaseRules::builtin(&overrides);
        Self::new(overrides, rules)
    }

    /// Builder: set the configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn overrides(&self) -> &OverrideTables {
        &self.overrides
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Ingest raw corpus records. Malformed records are skipped and reported.
    pub fn ingest<I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = Value>,
    {
        let diagnostics = self.registry.ingest(records);
        self.ingest_diagnostics.extend(diagnostics);
        self
    }

    /// Ingest a corpus file.
    pub fn ingest_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let records = corpus::load_records(path)?;
        Ok(self.ingest(records))
    }

    /// Add an already-built block.
    pub fn insert_block(&mut self, block: Block) -> &mut Self {
        self.registry.insert(block);
        self
    }

    /// Resolve every block and build the translation table.
    ///
    /// Resolution works on copies of the registry blocks, so running the
    /// pipeline twice produces the same output.
    pub fn run(&self) -> PipelineOutput {
        let mut diagnostics = self.ingest_diagnostics.clone();
        let mut table = TranslationTable::new();

        for block in self.registry.blocks() {
            let entries = self.resolve_block(block, &mut diagnostics);
            debug!("{}: {} entries", block.source.resource, entries.len());
            table.extend(&block.source.resource, entries);
        }

        info!(
            "Resolved {} blocks into {} entries for {} sources ({} diagnostics)",
            self.registry.len(),
            table.entry_count(),
            table.len(),
            diagnostics.len()
        );

        PipelineOutput {
            table,
            diagnostics,
            min_data_version: self.config.min_data_version,
            max_data_version: self.config.max_data_version,
        }
    }

    /// Resolve one registry block into its translation entries.
    pub fn resolve_block(&self, block: &Block, diagnostics: &mut Diagnostics) -> Vec<TranslationEntry> {
        let prepared = self.registry.prepare(block);
        let permutations = resolver::resolve_block(
            &self.overrides,
            prepared,
            |target| self.registry.states_of(block, target),
            self.config.emit_default_constants,
            diagnostics,
        );

        let mut entries = Vec::new();
        for permutation in permutations {
            for output in self.rules.apply(permutation) {
                if output.target_name().is_none() {
                    let condition = format_condition(&output);
                    let candidates: Vec<String> = output
                        .target_candidates
                        .iter()
                        .map(|candidate| candidate.resource.clone())
                        .collect();
                    warn!(
                        "{}[{}]: no mapping found among {:?}, dropped",
                        output.source.resource, condition, candidates
                    );
                    diagnostics.push(Diagnostic::AmbiguousIdentifier {
                        block: output.source.resource.clone(),
                        condition,
                        candidates,
                    });
                    continue;
                }
                if let Some(entry) =
                    TranslationEntry::from_permutation(&output, self.config.optional_default_conditions)
                {
                    entries.push(entry);
                }
            }
        }
        entries
    }
}
