use clap::Parser;
use tracing_subscriber::EnvFilter;

use graph_anchors::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("graph_anchors=debug,info")
    } else {
        EnvFilter::new("graph_anchors=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Build(args) => {
            cli::build::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Match(args) => {
            cli::match_reads::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::FromReads(args) => {
            cli::from_reads::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Tables(args) => {
            cli::tables::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::SelectReads(args) => {
            cli::select_reads::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
