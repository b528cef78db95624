//! Blockstate Translator CLI
//!
//! Build block-state translation tables from a corpus or from pre-solved mappings.

use blockstate_translator::{
    direct, load_corpus, similarity, DirectImporter, OverrideTables, Pipeline, PipelineConfig,
    Translator,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockstate-translator")]
#[command(author, version, about = "Build block-state translation tables between Minecraft editions", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a corpus into a translation document
    Resolve {
        /// Corpus JSON file
        #[arg(short, long)]
        corpus: PathBuf,

        /// Override tables JSON file, merged over the builtin tables
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Start from empty override tables instead of the builtin ones
        #[arg(long)]
        no_builtin_overrides: bool,

        /// Output document path
        #[arg(short, long)]
        output: PathBuf,

        /// Write the diagnostics report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Emit condition values at their default as optional conditions
        #[arg(long)]
        optional_default_conditions: bool,

        #[command(flatten)]
        versions: DataVersions,
    },

    /// Convert pre-solved block string mappings into a translation document
    ImportDirect {
        /// Mapping JSON file(s) of `source block string -> target block string`
        #[arg(short, long, required = true, num_args = 1..)]
        mapping: Vec<PathBuf>,

        /// Default states as `{block: {state: value}}`
        #[arg(long, conflicts_with_all = ["blocks", "block_states"])]
        defaults: Option<PathBuf>,

        /// Block list with `defaultState` ids
        #[arg(long, requires = "block_states")]
        blocks: Option<PathBuf>,

        /// Block state list indexed by `defaultState`
        #[arg(long, requires = "blocks")]
        block_states: Option<PathBuf>,

        /// Output document path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        versions: DataVersions,
    },

    /// Print the similarity score between two names
    Score {
        a: String,
        b: String,
    },
}

#[derive(Args)]
struct DataVersions {
    /// Lowest data version the translations apply to
    #[arg(long)]
    min_data_version: Option<i32>,

    /// Highest data version the translations apply to
    #[arg(long)]
    max_data_version: Option<i32>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Resolve {
            corpus,
            overrides,
            no_builtin_overrides,
            output,
            report,
            optional_default_conditions,
            versions,
        } => {
            let tables = load_tables(overrides.as_deref(), no_builtin_overrides)?;
            let config = PipelineConfig::default()
                .with_data_versions(versions.min_data_version, versions.max_data_version)
                .with_optional_default_conditions(optional_default_conditions);
            resolve(&corpus, tables, config, &output, report.as_deref())?;
        }
        Commands::ImportDirect {
            mapping,
            defaults,
            blocks,
            block_states,
            output,
            versions,
        } => {
            let defaults = match (defaults, blocks, block_states) {
                (Some(path), _, _) => direct::load_defaults(path)?,
                (None, Some(blocks), Some(block_states)) => {
                    direct::load_block_data_defaults(blocks, block_states)?
                }
                _ => direct::DefaultStates::new(),
            };
            import_direct(&mapping, defaults, &output, versions)?;
        }
        Commands::Score { a, b } => {
            println!("{:.5}", similarity(&a, &b));
        }
    }

    Ok(())
}

fn load_tables(
    path: Option<&Path>,
    no_builtin: bool,
) -> Result<OverrideTables, Box<dyn std::error::Error>> {
    let base = if no_builtin {
        OverrideTables::new()
    } else {
        OverrideTables::builtin()
    };
    Ok(match path {
        Some(path) => {
            println!("Loading override tables from {:?}...", path);
            base.merge(OverrideTables::load(path)?)
        }
        None => base,
    })
}

fn resolve(
    corpus_path: &Path,
    tables: OverrideTables,
    config: PipelineConfig,
    output_path: &Path,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading corpus from {:?}...", corpus_path);
    let records = load_corpus(corpus_path)?;
    println!("  Found {} records", records.len());

    let mut pipeline = Pipeline::with_overrides(tables).with_config(config);
    pipeline.ingest(records);
    println!("  Merged into {} blocks", pipeline.registry().len());

    let output = pipeline.run();
    output.write(output_path)?;
    println!(
        "Wrote {} entries for {} blocks to {:?}",
        output.table.entry_count(),
        output.table.len(),
        output_path
    );

    if let Some(report_path) = report_path {
        fs::write(report_path, output.diagnostics_json()?)?;
        println!("Wrote {} diagnostics to {:?}", output.diagnostics.len(), report_path);
    } else if !output.diagnostics.is_empty() {
        println!("{} items need manual follow-up (use --report to save them)", output.diagnostics.len());
    }

    Ok(())
}

fn import_direct(
    mapping_paths: &[PathBuf],
    defaults: direct::DefaultStates,
    output_path: &Path,
    versions: DataVersions,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Default states known for {} blocks", defaults.len());
    let mut importer = DirectImporter::new().with_defaults(defaults);
    for path in mapping_paths {
        println!("Loading mapping from {:?}...", path);
        importer.load_mapping(path)?;
    }

    let table = importer.build();
    let translator = Translator::new(table)
        .with_data_versions(versions.min_data_version, versions.max_data_version);
    blockstate_translator::export::write_document(output_path, &translator)?;
    println!(
        "Wrote translations for {} blocks to {:?}",
        translator.translations.len(),
        output_path
    );

    Ok(())
}
