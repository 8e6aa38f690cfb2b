use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use noodles::fastq;
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::report::selection::{load_supporting_names, open_fastq, select_records, SelectionStats};
use crate::utils::io::{create_output, with_suffix};

#[derive(Args)]
pub struct SelectReadsArgs {
    /// Anchors with supporting reads, written by `match` (PREFIX.anchors_with_reads.json)
    #[arg(long, required = true)]
    pub anchors: PathBuf,

    /// Reads in FASTQ format (repeatable, optionally gzipped)
    #[arg(long = "fastq", required = true)]
    pub fastq: Vec<PathBuf>,

    /// Prefix for the output FASTQ (PREFIX.selected.fastq)
    #[arg(short, long, required = true)]
    pub output_prefix: PathBuf,
}

/// Execute select-reads subcommand
///
/// # Errors
///
/// Returns an error if the anchors document or a FASTQ file cannot be read,
/// a FASTQ record is malformed, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SelectReadsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let names = load_supporting_names(&args.anchors)?;
    if verbose {
        eprintln!("Loaded {} supporting read names", names.len());
    }

    let output = with_suffix(&args.output_prefix, ".selected.fastq");
    let mut writer = fastq::io::Writer::new(create_output(&output)?);
    let mut found = HashSet::new();
    let mut stats = SelectionStats::default();

    for path in &args.fastq {
        let mut reader = open_fastq(path)?;
        let file_stats = select_records(&mut reader, &mut writer, &names, &mut found)?;
        info!(
            "{}: selected {} of {} records",
            path.display(),
            file_stats.selected,
            file_stats.records
        );
        stats.merge(file_stats);
    }
    writer.get_mut().flush()?;

    let missing = names.len() - found.len();
    if missing > 0 {
        warn!("{missing} supporting reads were not found in the FASTQ input");
    }

    match format {
        OutputFormat::Text => {
            println!("Supporting reads:   {}", names.len());
            println!("FASTQ records:      {}", stats.records);
            println!("Selected records:   {}", stats.selected);
            println!("Missing reads:      {missing}");
            println!("Wrote {}", output.display());
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "supporting_reads": names.len(),
                "records": stats.records,
                "selected": stats.selected,
                "missing": missing,
                "output": output.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Tsv => {
            println!("supporting_reads\trecords\tselected\tmissing");
            println!(
                "{}\t{}\t{}\t{missing}",
                names.len(),
                stats.records,
                stats.selected
            );
        }
    }

    Ok(())
}
