//! TermDB CLI
//!
//! Command-line tools for termbase stores.
//!
//! # Commands
//!
//! - `list` - List the stores of a directory
//! - `inspect` - Display store statistics and termbases
//! - `verify` - Check referential integrity
//! - `search` - Run a term search
//! - `compact` - Rewrite the journal as a single snapshot

mod commands;

use clap::{Parser, Subcommand};
use commands::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// TermDB command-line store tools.
#[derive(Parser)]
#[command(name = "termdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the store files
    #[arg(global = true, short, long, default_value = ".")]
    path: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the stores in the directory
    List,

    /// Display store statistics and termbases
    Inspect {
        /// Store name
        store: String,

        /// Show per-termbase term counts
        #[arg(short, long)]
        termbases: bool,
    },

    /// Check referential integrity of a store
    Verify {
        /// Store name
        store: String,
    },

    /// Search the terms of a termbase
    Search {
        /// Store name
        store: String,

        /// Termbase id
        #[arg(short, long)]
        termbase: u64,

        /// Main language of the results
        #[arg(short, long)]
        lang: String,

        /// Lemma must equal this text (repeatable)
        #[arg(long)]
        exact: Vec<String>,

        /// Lemma must contain this text (repeatable)
        #[arg(long)]
        fuzzy: Vec<String>,

        /// Accept fuzzy matches within this edit distance
        #[arg(long)]
        max_distance: Option<usize>,

        /// Only print the number of matches
        #[arg(short, long)]
        count: bool,
    },

    /// Rewrite the journal as a single snapshot
    Compact {
        /// Store name
        store: String,

        /// Dry run - show what would be done
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List => commands::list::run(&cli.path, cli.format)?,
        Commands::Inspect { store, termbases } => {
            commands::inspect::run(&cli.path, &store, termbases, cli.format)?;
        }
        Commands::Verify { store } => commands::verify::run(&cli.path, &store, cli.format)?,
        Commands::Search {
            store,
            termbase,
            lang,
            exact,
            fuzzy,
            max_distance,
            count,
        } => {
            let query = commands::search::Query {
                termbase,
                lang,
                exact,
                fuzzy,
                max_distance,
                count,
            };
            commands::search::run(&cli.path, &store, &query, cli.format)?;
        }
        Commands::Compact { store, dry_run } => {
            commands::compact::run(&cli.path, &store, dry_run, cli.format)?;
        }
        Commands::Version => {
            println!("TermDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("TermDB Core v{}", termdb_core::VERSION);
        }
    }

    Ok(())
}
