use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::dictionary::store::AnchorDictionary;
use crate::matching::counts::AnchorCounts;
use crate::report::tables::write_counts;
use crate::utils::io::{create_output, with_suffix};

#[derive(Args)]
pub struct TablesArgs {
    /// Counted dictionary written by `match` (PREFIX.counts.json or .bin)
    #[arg(long, required = true)]
    pub dictionary: PathBuf,

    /// Prefix for the output table
    #[arg(short, long, required = true)]
    pub output_prefix: PathBuf,
}

/// Execute tables subcommand
///
/// # Errors
///
/// Returns an error if the dictionary cannot be loaded or the table cannot
/// be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: TablesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let loaded = AnchorDictionary::load(&args.dictionary)?;
    let dictionary = loaded.dictionary;
    let counts = loaded.counts.unwrap_or_else(|| {
        warn!(
            "{} carries no read counts; writing zero counts",
            args.dictionary.display()
        );
        AnchorCounts::zeroed(&dictionary)
    });
    if verbose {
        eprintln!("Loaded {} anchors", dictionary.len());
    }

    let table = with_suffix(&args.output_prefix, ".counts.tsv");
    let mut writer = create_output(&table)?;
    write_counts(&mut writer, &dictionary, &counts)?;
    writer.flush()?;

    let positioned = dictionary
        .anchors()
        .iter()
        .filter(|anchor| anchor.position.is_some())
        .count();
    let with_bp_reads = counts.bp.iter().filter(|(_, count)| *count > 0).count();

    match format {
        OutputFormat::Text => {
            println!("Anchors:             {}", dictionary.len());
            println!("  with position:     {positioned}");
            println!("  with bp reads:     {with_bp_reads}");
            println!("Path read total:     {}", counts.path.total());
            println!("Bp read total:       {}", counts.bp.total());
            println!("Wrote {}", table.display());
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "anchors": dictionary.len(),
                "with_position": positioned,
                "with_bp_reads": with_bp_reads,
                "path_reads": counts.path.total(),
                "bp_reads": counts.bp.total(),
                "table": table.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Tsv => {
            println!("anchors\twith_position\twith_bp_reads\tpath_reads\tbp_reads");
            println!(
                "{}\t{positioned}\t{with_bp_reads}\t{}\t{}",
                dictionary.len(),
                counts.path.total(),
                counts.bp.total()
            );
        }
    }

    Ok(())
}
