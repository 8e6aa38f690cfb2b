use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use tracing::info;

use crate::cli::build::dictionary_path;
use crate::cli::{AlignmentArgs, GraphArgs, OutputFormat};
use crate::dictionary::store::AnchorDictionary;
use crate::graph::VariationGraph;
use crate::matching::association::MatchRun;
use crate::matching::counts::AnchorCounts;
use crate::matching::engine::AlignmentMatcher;
use crate::report::association::{write_anchors_with_reads, write_association_tsv};
use crate::report::trace::write_trace_header;
use crate::utils::io::{create_output, with_suffix};

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Anchor dictionary written by `build` or `from-reads`
    #[arg(long, required = true)]
    pub dictionary: PathBuf,

    #[command(flatten)]
    pub alignments: AlignmentArgs,

    /// Prefix for all output files
    #[arg(short, long, required = true)]
    pub output_prefix: PathBuf,

    /// Write the counted dictionary as bincode (PREFIX.counts.bin) instead of JSON
    #[arg(long)]
    pub binary: bool,
}

/// Execute match subcommand
///
/// # Errors
///
/// Returns an error if the graph or dictionary cannot be loaded, an
/// alignment file cannot be read, or an output cannot be written. Malformed
/// alignment lines are skipped, not errors.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let graph = args.graph.load()?;
    if verbose {
        crate::cli::build::print_graph_stats(&graph);
    }

    let loaded = AnchorDictionary::load(&args.dictionary)?;
    if loaded.counts.is_some() {
        info!("Ignoring read counts stored in {}", args.dictionary.display());
    }
    if verbose {
        eprintln!(
            "Loaded {} anchors ({} sentinels)",
            loaded.dictionary.len(),
            loaded.dictionary.sentinel_count()
        );
    }

    let outcome = match_alignments(&graph, &loaded.dictionary, &args.alignments, &args.output_prefix)?;
    let written = write_outputs(&args.output_prefix, &loaded.dictionary, &outcome.run, args.binary)?;

    match format {
        OutputFormat::Text => print_text_summary(&outcome, &written),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary_json(&outcome))?);
        }
        OutputFormat::Tsv => print_tsv_summary(&outcome),
    }

    Ok(())
}

/// A finished run and how long it took
pub(crate) struct MatchOutcome {
    pub run: MatchRun,
    pub elapsed: Duration,
}

/// Run the matcher over every alignment file, writing the trace if asked
pub(crate) fn match_alignments(
    graph: &VariationGraph,
    dictionary: &AnchorDictionary,
    args: &AlignmentArgs,
    prefix: &Path,
) -> anyhow::Result<MatchOutcome> {
    let matcher = AlignmentMatcher::new(dictionary, graph).with_config(args.matching_config());
    let started = Instant::now();

    let run = if args.trace {
        let mut writer = create_output(&with_suffix(prefix, ".trace.tsv"))?;
        write_trace_header(&mut writer)?;
        let run = matcher.run_files(&args.alignments, Some(&mut writer as &mut dyn Write))?;
        writer.flush()?;
        run
    } else {
        matcher.run_files(&args.alignments, None)?
    };

    Ok(MatchOutcome {
        run,
        elapsed: started.elapsed(),
    })
}

/// Write the association tables and the counted dictionary; returns the paths written
pub(crate) fn write_outputs(
    prefix: &Path,
    dictionary: &AnchorDictionary,
    run: &MatchRun,
    binary: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let path_file = with_suffix(prefix, ".reads_with_anchors.tsv");
    let mut writer = create_output(&path_file)?;
    write_association_tsv(&mut writer, run.association.path_matches())?;
    writer.flush()?;

    let bp_file = with_suffix(prefix, ".bpmatched_reads_with_anchors.tsv");
    let mut writer = create_output(&bp_file)?;
    write_association_tsv(&mut writer, run.association.bp_matches())?;
    writer.flush()?;

    let anchors_file = with_suffix(prefix, ".anchors_with_reads.json");
    let mut writer = create_output(&anchors_file)?;
    write_anchors_with_reads(&mut writer, dictionary, &run.association)?;
    writer.flush()?;

    let counts = AnchorCounts::aggregate(dictionary, &run.association);
    let counts_file = dictionary_path(prefix, "counts", binary);
    dictionary.save(&counts_file, Some(&counts))?;

    Ok(vec![path_file, bp_file, anchors_file, counts_file])
}

/// Mean time per record, when any record was seen
fn per_record(outcome: &MatchOutcome) -> Option<Duration> {
    let records = u32::try_from(outcome.run.stats.records).ok()?;
    (records > 0).then(|| outcome.elapsed / records)
}

fn ratio_text(run: &MatchRun) -> String {
    run.ratio()
        .map_or_else(|| "undefined".to_string(), |ratio| format!("{ratio:.2}"))
}

pub(crate) fn print_text_summary(outcome: &MatchOutcome, written: &[PathBuf]) {
    let run = &outcome.run;
    println!("Lines read:         {}", run.stats.lines);
    println!("Records:            {}", run.stats.records);
    println!("  without anchors:  {}", run.stats.skipped_records);
    println!("Malformed lines:    {}", run.stats.malformed_lines);
    println!("Anchor boundaries:  {}", run.stats.sentinel_hits);
    println!(
        "Anchor-read path matches = {}, sequence matches = {}",
        run.counters.reads_matching_path, run.counters.reads_matching_sequence
    );
    println!("Ratio = {}", ratio_text(run));
    match per_record(outcome) {
        Some(mean) => println!("Elapsed: {:.2?} ({mean:.2?} per record)", outcome.elapsed),
        None => println!("Elapsed: {:.2?}", outcome.elapsed),
    }
    for path in written {
        println!("Wrote {}", path.display());
    }
}

pub(crate) fn summary_json(outcome: &MatchOutcome) -> serde_json::Value {
    let run = &outcome.run;
    let ratio = run
        .ratio()
        .map_or_else(|| serde_json::json!("undefined"), |ratio| serde_json::json!(ratio));
    serde_json::json!({
        "lines": run.stats.lines,
        "records": run.stats.records,
        "skipped_records": run.stats.skipped_records,
        "malformed_lines": run.stats.malformed_lines,
        "sentinel_hits": run.stats.sentinel_hits,
        "reads_matching_path": run.counters.reads_matching_path,
        "reads_matching_sequence": run.counters.reads_matching_sequence,
        "ratio": ratio,
        "elapsed_seconds": outcome.elapsed.as_secs_f64(),
        "seconds_per_record": per_record(outcome).map(|mean| mean.as_secs_f64()),
    })
}

pub(crate) fn print_tsv_summary(outcome: &MatchOutcome) {
    let run = &outcome.run;
    println!("lines\trecords\tskipped_records\tmalformed_lines\tsentinel_hits\treads_matching_path\treads_matching_sequence\tratio\telapsed_seconds");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.3}",
        run.stats.lines,
        run.stats.records,
        run.stats.skipped_records,
        run.stats.malformed_lines,
        run.stats.sentinel_hits,
        run.counters.reads_matching_path,
        run.counters.reads_matching_sequence,
        ratio_text(run),
        outcome.elapsed.as_secs_f64()
    );
}
