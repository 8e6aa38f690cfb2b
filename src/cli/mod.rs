//! Command-line interface for graph-anchors.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **build**: Build an anchor dictionary from a graph and its snarls
//! - **match**: Match read alignments against a dictionary
//! - **from-reads**: Build a dictionary from read-supported paths, then match
//! - **tables**: Write count/position tables from a counted dictionary
//! - **select-reads**: Copy the FASTQ records of reads that support an anchor
//!
//! ## Usage
//!
//! ```text
//! # Build anchors, taking canonical paths from the GRCh38 path
//! graph-anchors build --graph hprc.gfa.gz --snarls hprc.snarls.jsonl \
//!     --reference-path GRCh38#0#chr20 --output-prefix out/chr20
//!
//! # Match alignments (several files are merged)
//! graph-anchors match --graph hprc.gfa.gz --dictionary out/chr20.anchors.json \
//!     --alignments reads1.gaf.gz --alignments reads2.gaf.gz --output-prefix out/chr20
//!
//! # JSON summary for scripting
//! graph-anchors match ... --format json
//!
//! # Counts table for plotting
//! graph-anchors tables --dictionary out/chr20.counts.json --output-prefix out/chr20
//!
//! # Reads behind the anchors, for assembly QC
//! graph-anchors select-reads --anchors out/chr20.anchors_with_reads.json \
//!     --fastq reads.fastq.gz --output-prefix out/chr20
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::dictionary::builder::{BuildConfig, DEFAULT_MAX_SEARCH_STEPS};
use crate::graph::VariationGraph;
use crate::matching::engine::{MatchingConfig, DEFAULT_BATCH_SIZE};
use crate::parsing::{gfa::parse_gfa_file, snarls::parse_snarls_file};

pub mod build;
pub mod from_reads;
pub mod match_reads;
pub mod select_reads;
pub mod tables;

#[derive(Parser)]
#[command(name = "graph-anchors")]
#[command(version)]
#[command(about = "Extract snarl anchors from a pangenome graph and match read alignments to them")]
#[command(
    long_about = "graph-anchors decomposes a variation graph into leaf snarls and turns each one into an anchor: a canonical walk between two boundary nodes.\n\nRead alignments (GAF) are then scanned for anchor boundaries and classified as:\n- Path matches, when the read follows the anchor's walk node for node\n- Base-level matches, when the aligned bases over the anchor are also free of edits"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for the run summary
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an anchor dictionary from a graph and its snarl decomposition
    Build(build::BuildArgs),

    /// Match read alignments against an anchor dictionary
    Match(match_reads::MatchArgs),

    /// Build anchors from the paths reads take, then match the same reads
    FromReads(from_reads::FromReadsArgs),

    /// Write per-anchor count and position tables
    Tables(tables::TablesArgs),

    /// Copy the FASTQ records of reads that match an anchor base for base
    SelectReads(select_reads::SelectReadsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Graph input shared by the commands that need one
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Graph in GFA format (optionally gzipped)
    #[arg(long, required = true)]
    pub graph: PathBuf,
}

impl GraphArgs {
    /// Load the graph without its snarls
    ///
    /// # Errors
    ///
    /// Returns an error if the GFA cannot be read or parsed.
    pub fn load(&self) -> anyhow::Result<VariationGraph> {
        Ok(parse_gfa_file(&self.graph)?)
    }
}

/// Graph plus snarl decomposition, for the commands that build anchors
#[derive(Args, Debug)]
pub struct SnarlGraphArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Snarl decomposition as JSON lines (`vg view -R` output, optionally gzipped)
    #[arg(long, required = true)]
    pub snarls: PathBuf,

    /// Path whose crossings become canonical paths (repeatable, tried in order;
    /// default: every path in the graph)
    #[arg(long = "reference-path")]
    pub reference_paths: Vec<String>,

    /// Path used for anchor positions (default: first reference path)
    #[arg(long)]
    pub position_path: Option<String>,

    /// Node budget for the fallback walk search in one snarl
    #[arg(long, default_value_t = DEFAULT_MAX_SEARCH_STEPS)]
    pub max_search_steps: usize,
}

impl SnarlGraphArgs {
    /// Load the graph and attach its snarl tree
    ///
    /// # Errors
    ///
    /// Returns an error if either input cannot be read or parsed.
    pub fn load(&self) -> anyhow::Result<VariationGraph> {
        let snarls = parse_snarls_file(&self.snarls)?;
        Ok(self.graph.load()?.with_snarls(snarls))
    }

    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            reference_paths: self.reference_paths.clone(),
            max_search_steps: self.max_search_steps,
        }
    }
}

/// Alignment input and run settings for the matching commands
#[derive(Args, Debug)]
pub struct AlignmentArgs {
    /// Alignments in GAF format (repeatable; each file is one shard)
    #[arg(long = "alignments", required = true)]
    pub alignments: Vec<PathBuf>,

    /// Worker threads for classification (0 = all cores)
    #[arg(short = 't', long, default_value = "0")]
    pub threads: usize,

    /// Alignment lines classified per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Stop after this many alignment records
    #[arg(long)]
    pub max_records: Option<u64>,

    /// Also write one row per anchor boundary hit to PREFIX.trace.tsv
    #[arg(long)]
    pub trace: bool,
}

impl AlignmentArgs {
    pub fn matching_config(&self) -> MatchingConfig {
        MatchingConfig {
            threads: self.threads,
            batch_size: self.batch_size,
            max_records: self.max_records,
        }
    }
}
