use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::{OutputFormat, SnarlGraphArgs};
use crate::core::snarl::LeafSnarl;
use crate::dictionary::builder::{AnchorDictionaryBuilder, BuildStats};
use crate::dictionary::position::PositionAnnotator;
use crate::dictionary::store::AnchorDictionary;
use crate::graph::{GraphIndex, VariationGraph};
use crate::report::tables::{write_bandage_colours, write_leaf_snarls, write_sizes};
use crate::utils::io::{create_output, with_suffix};

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub input: SnarlGraphArgs,

    /// Prefix for all output files
    #[arg(short, long, required = true)]
    pub output_prefix: PathBuf,

    /// Write the dictionary as bincode (PREFIX.anchors.bin) instead of JSON
    #[arg(long)]
    pub binary: bool,
}

/// Execute build subcommand
///
/// # Errors
///
/// Returns an error if the inputs cannot be loaded, the snarl tree is
/// corrupt, or an output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: BuildArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let graph = args.input.load()?;
    if verbose {
        print_graph_stats(&graph);
    }

    let output = AnchorDictionaryBuilder::new(&graph)
        .with_config(args.input.build_config())
        .build()?;
    let dictionary = annotate(&graph, &output.dictionary, args.input.position_path.as_deref())?;
    let written = write_outputs(&args.output_prefix, &dictionary, &output.leaf_snarls, args.binary)?;

    match format {
        OutputFormat::Text => print_text_summary(&output.stats, &dictionary, &written),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary_json(&output.stats, &dictionary))?);
        }
        OutputFormat::Tsv => print_tsv_summary(&output.stats, &dictionary),
    }

    Ok(())
}

pub(crate) fn print_graph_stats(graph: &VariationGraph) {
    eprintln!(
        "Loaded graph: {} nodes, {} edges, {} paths, {} snarls",
        graph.node_count(),
        graph.edge_count(),
        graph.path_count(),
        graph.snarl_count()
    );
}

/// Position snapshot of `dictionary`, on `position_path` when given
pub(crate) fn annotate(
    graph: &VariationGraph,
    dictionary: &AnchorDictionary,
    position_path: Option<&str>,
) -> anyhow::Result<AnchorDictionary> {
    let mut annotator = PositionAnnotator::new(graph);
    if let Some(name) = position_path {
        annotator = annotator.with_reference(name);
    }
    Ok(annotator.annotate(dictionary)?)
}

/// Dictionary file for `prefix`: `PREFIX.<stem>.json`, or `.bin` for bincode
pub(crate) fn dictionary_path(prefix: &Path, stem: &str, binary: bool) -> PathBuf {
    let extension = if binary { "bin" } else { "json" };
    with_suffix(prefix, &format!(".{stem}.{extension}"))
}

/// Write the dictionary and the build tables; returns the paths written
pub(crate) fn write_outputs(
    prefix: &Path,
    dictionary: &AnchorDictionary,
    leaf_snarls: &[LeafSnarl],
    binary: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let dictionary_file = dictionary_path(prefix, "anchors", binary);
    dictionary.save(&dictionary_file, None)?;

    let sizes_file = with_suffix(prefix, ".sizes.tsv");
    let mut writer = create_output(&sizes_file)?;
    write_sizes(&mut writer, dictionary)?;
    writer.flush()?;

    let bandage_file = with_suffix(prefix, ".bandage.csv");
    let mut writer = create_output(&bandage_file)?;
    write_bandage_colours(&mut writer, dictionary)?;
    writer.flush()?;

    let snarls_file = with_suffix(prefix, ".snarls.tsv");
    let mut writer = create_output(&snarls_file)?;
    write_leaf_snarls(&mut writer, leaf_snarls)?;
    writer.flush()?;

    Ok(vec![dictionary_file, sizes_file, bandage_file, snarls_file])
}

fn positioned(dictionary: &AnchorDictionary) -> usize {
    dictionary
        .anchors()
        .iter()
        .filter(|anchor| anchor.position.is_some())
        .count()
}

pub(crate) fn print_text_summary(stats: &BuildStats, dictionary: &AnchorDictionary, written: &[PathBuf]) {
    println!("Leaf snarls:      {}", stats.leaf_snarls);
    println!("  degenerate:     {}", stats.degenerate);
    println!("  unreachable:    {}", stats.unreachable);
    println!(
        "Anchors:          {} ({} reference, {} reads, {} search)",
        stats.anchors, stats.from_reference, stats.from_reads, stats.from_search
    );
    println!("Sentinels:        {}", dictionary.sentinel_count());
    if stats.shared_sentinels > 0 {
        println!("  shared:         {}", stats.shared_sentinels);
    }
    println!("With position:    {}", positioned(dictionary));
    for path in written {
        println!("Wrote {}", path.display());
    }
}

pub(crate) fn summary_json(stats: &BuildStats, dictionary: &AnchorDictionary) -> serde_json::Value {
    serde_json::json!({
        "leaf_snarls": stats.leaf_snarls,
        "degenerate": stats.degenerate,
        "unreachable": stats.unreachable,
        "anchors": stats.anchors,
        "from_reference": stats.from_reference,
        "from_reads": stats.from_reads,
        "from_search": stats.from_search,
        "sentinels": dictionary.sentinel_count(),
        "shared_sentinels": stats.shared_sentinels,
        "with_position": positioned(dictionary),
    })
}

pub(crate) fn print_tsv_summary(stats: &BuildStats, dictionary: &AnchorDictionary) {
    println!("leaf_snarls\tdegenerate\tunreachable\tanchors\tfrom_reference\tfrom_reads\tfrom_search\tsentinels\tshared_sentinels\twith_position");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        stats.leaf_snarls,
        stats.degenerate,
        stats.unreachable,
        stats.anchors,
        stats.from_reference,
        stats.from_reads,
        stats.from_search,
        dictionary.sentinel_count(),
        stats.shared_sentinels,
        positioned(dictionary)
    );
}
