//! splnet: diff, merge and apply spline network files.

mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use config::SplnetConfig;

#[derive(Debug, Parser)]
#[command(name = "splnet", version, about = "Diff and merge spline network files")]
struct Cli {
    /// Log debug detail (remapping decisions, section parsing)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write the changes from one network to another as a diff document
    Generate {
        /// Network the changes are relative to
        base: PathBuf,
        /// Network with the changes applied
        edited: PathBuf,
        /// Output diff document (default: diff.json, or [output] diff in splnet.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Apply a diff document to a network
    Apply {
        /// Network to change
        base: PathBuf,
        /// Diff document
        diff: PathBuf,
        /// Output network (default: overwrite the base network)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge the changes of several edited copies back into their base network
    Merge {
        /// Network every copy was made from
        base: PathBuf,
        /// Edited copies, merged in the order given
        #[arg(required = true)]
        edited: Vec<PathBuf>,
        /// Output network (default: overwrite the base network)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Combine complete networks into a new one
    FullMerge {
        /// Networks, merged in the order given
        #[arg(required = true)]
        networks: Vec<PathBuf>,
        /// Output network (default: merged.splnet, or [output] network in splnet.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print version information
    Version,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version requests are not usage errors.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = SplnetConfig::load_or_default(&cwd)?;
    logging::init_logging(logging::resolve_level(
        cli.verbose,
        cli.quiet,
        &config.logging.level,
    ));

    match cli.command {
        Commands::Generate {
            base,
            edited,
            output,
        } => commands::generate::run(&base, &edited, output.as_deref(), &config),

        Commands::Apply { base, diff, output } => {
            commands::apply::run(&base, &diff, output.as_deref())
        }

        Commands::Merge {
            base,
            edited,
            output,
        } => commands::merge::run(&base, &edited, output.as_deref()),

        Commands::FullMerge { networks, output } => {
            commands::full_merge::run(&networks, output.as_deref(), &config)
        }

        Commands::Version => {
            println!("splnet {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
