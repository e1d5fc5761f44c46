//! PairPack CLI - byte-pair packages from the command line
//!
//! Packs a directory tree (or a single file) into one self-checking package
//! and restores it.

mod commands;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use commands::{cmd_create, cmd_extract, cmd_list, cmd_test};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pairpack")]
#[command(author, version, about = "Byte-pair archive packer")]
#[command(long_about = "
PairPack packs a directory tree into a single package using multi-pass
byte-pair substitution, and restores it exactly.

Examples:
  pairpack create project
  pairpack create project out.pkg --level 8 --exclude 'target, *.git, **.tmp'
  pairpack list project.pkg
  pairpack list project.pkg --json
  pairpack extract project.pkg -o restored
  pairpack test project.pkg
")]
struct Cli {
    /// Increase log detail (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a directory or file into a package
    #[command(alias = "c")]
    Create {
        /// Directory or file to pack
        source: PathBuf,

        /// Output package (default: <source name>.pkg)
        output: Option<PathBuf>,

        /// Maximum substitution passes per file (1-255)
        #[arg(short, long, default_value_t = 4, allow_negative_numbers = true)]
        level: i64,

        /// Comma separated exclusions: `*name` skips entries named `name`
        /// anywhere, `**.tmp` skips names ending in `.tmp`, others match the path
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Compress files on all cores
        #[arg(short = 'j', long)]
        parallel: bool,

        /// Hide the progress display
        #[arg(long)]
        no_progress: bool,
    },

    /// Extract a package
    #[command(alias = "x")]
    Extract {
        /// Package to extract
        package: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// List package contents
    #[command(alias = "l")]
    List {
        /// Package to list
        package: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Test package integrity
    #[command(alias = "t")]
    Test {
        /// Package to test
        package: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let verbose = cli.verbose > 0;

    let result = match cli.command {
        Commands::Create {
            source,
            output,
            level,
            exclude,
            parallel,
            no_progress,
        } => cmd_create(
            &source,
            output.as_deref(),
            level,
            &exclude,
            parallel,
            verbose,
            !no_progress,
        ),
        Commands::Extract {
            package,
            output,
            no_progress,
        } => cmd_extract(&package, &output, verbose, !no_progress),
        Commands::List { package, json } => cmd_list(&package, verbose, json),
        Commands::Test { package } => cmd_test(&package, verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
