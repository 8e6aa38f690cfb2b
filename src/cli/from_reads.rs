use std::io::BufRead;
use std::path::PathBuf;

use clap::Args;
use tracing::{debug, info};

use crate::cli::{build, match_reads, AlignmentArgs, OutputFormat, SnarlGraphArgs};
use crate::core::snarl::LeafSnarl;
use crate::dictionary::builder::AnchorDictionaryBuilder;
use crate::dictionary::votes::{ReadPathVotes, VoteCollector};
use crate::parsing::gaf::AlignmentRecord;
use crate::utils::io::open_input;

#[derive(Args)]
pub struct FromReadsArgs {
    #[command(flatten)]
    pub input: SnarlGraphArgs,

    #[command(flatten)]
    pub alignments: AlignmentArgs,

    /// Prefix for all output files
    #[arg(short, long, required = true)]
    pub output_prefix: PathBuf,

    /// Write dictionaries as bincode (.bin) instead of JSON
    #[arg(long)]
    pub binary: bool,
}

/// Execute from-reads subcommand
///
/// # Errors
///
/// Returns an error if the inputs cannot be loaded, the snarl tree is
/// corrupt, or an output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FromReadsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let graph = args.input.load()?;
    if verbose {
        build::print_graph_stats(&graph);
    }

    let builder = AnchorDictionaryBuilder::new(&graph).with_config(args.input.build_config());
    let (leaf_snarls, _) = builder.leaf_snarls()?;
    let votes = collect_votes(&leaf_snarls, &args.alignments)?;
    info!("Read support found for {} of {} leaf snarls", votes.len(), leaf_snarls.len());

    let output = builder.with_read_votes(votes).build_from_snarls(leaf_snarls)?;
    let dictionary = build::annotate(&graph, &output.dictionary, args.input.position_path.as_deref())?;
    let mut written = build::write_outputs(&args.output_prefix, &dictionary, &output.leaf_snarls, args.binary)?;

    let outcome =
        match_reads::match_alignments(&graph, &dictionary, &args.alignments, &args.output_prefix)?;
    written.extend(match_reads::write_outputs(
        &args.output_prefix,
        &dictionary,
        &outcome.run,
        args.binary,
    )?);

    match format {
        OutputFormat::Text => {
            build::print_text_summary(&output.stats, &dictionary, &[]);
            println!();
            match_reads::print_text_summary(&outcome, &written);
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "build": build::summary_json(&output.stats, &dictionary),
                "match": match_reads::summary_json(&outcome),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Tsv => {
            build::print_tsv_summary(&output.stats, &dictionary);
            println!();
            match_reads::print_tsv_summary(&outcome);
        }
    }

    Ok(())
}

/// Count snarl crossings over the same records the matching pass will see
fn collect_votes(leaf_snarls: &[LeafSnarl], args: &AlignmentArgs) -> anyhow::Result<ReadPathVotes> {
    let mut collector = VoteCollector::new(leaf_snarls);
    let mut records = 0u64;
    let mut malformed = 0u64;

    'files: for path in &args.alignments {
        for line in open_input(path)?.lines() {
            if args.max_records.is_some_and(|limit| records >= limit) {
                break 'files;
            }
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match AlignmentRecord::from_gaf(&line) {
                Ok(record) => {
                    collector.add_record(&record);
                    records += 1;
                }
                Err(e) => {
                    debug!("{}: skipping malformed line: {e}", path.display());
                    malformed += 1;
                }
            }
        }
    }

    info!("Collected read paths from {records} records ({malformed} malformed lines)");
    Ok(collector.finish())
}
