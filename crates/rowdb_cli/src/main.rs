//! RowDB CLI
//!
//! Command-line tools for RowDB data directories.
//!
//! # Commands
//!
//! - `list` - List table files in a data directory
//! - `inspect` - Display a table's generator, row count and fields
//! - `verify` - Check table files against the table invariants
//! - `dump` - Print a table's rows as JSON

mod commands;
mod error;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RowDB command-line data directory tools.
#[derive(Parser)]
#[command(name = "rowdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the data directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Table file extension
    #[arg(global = true, short, long, default_value = rowdb_core::DEFAULT_FILE_EXTENSION)]
    extension: String,

    /// Name of the identifier field
    #[arg(global = true, long, default_value = rowdb_core::DEFAULT_ID_FIELD)]
    id_field: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List table files in the data directory
    List,

    /// Display a table's generator, row count and fields
    Inspect {
        /// Table base filename (without extension)
        name: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify table invariants
    Verify {
        /// Only verify this table (default: all tables)
        name: Option<String>,
    },

    /// Print a table's rows as JSON
    Dump {
        /// Table base filename (without extension)
        name: String,

        /// Maximum number of rows to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let tables = |command: &str| -> Result<commands::TableDir, Box<dyn std::error::Error>> {
        let path = cli
            .path
            .clone()
            .ok_or_else(|| format!("Data directory path required for {command}"))?;
        Ok(commands::TableDir::open(path, &cli.extension, &cli.id_field)?)
    };

    match &cli.command {
        Commands::List => {
            commands::list::run(&tables("list")?)?;
        }
        Commands::Inspect { name, format } => {
            commands::inspect::run(&tables("inspect")?, name, format)?;
        }
        Commands::Verify { name } => {
            commands::verify::run(&tables("verify")?, name.as_deref())?;
        }
        Commands::Dump { name, limit } => {
            commands::dump::run(&tables("dump")?, name, *limit)?;
        }
        Commands::Version => {
            println!("RowDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("RowDB Core v{}", rowdb_core::VERSION);
        }
    }

    Ok(())
}
