//! AgentDB CLI
//!
//! Command-line tools for AgentDB database files.
//!
//! # Commands
//!
//! - `init` - Create a database file with id and api_key
//! - `inspect` - Display database metadata and records
//! - `append` - Append one record and commit
//! - `verify` - Check that the file is a valid database

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// AgentDB command-line database tools.
#[derive(Parser)]
#[command(name = "agentdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database file
    Init {
        /// Database id (number or string)
        #[arg(long)]
        id: String,

        /// API key (number or string)
        #[arg(long)]
        api_key: String,
    },

    /// Display database metadata and records
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Append one record and commit it
    Append {
        /// Record role
        #[arg(short, long)]
        role: String,

        /// Record content as JSON; bare text is stored as a string
        #[arg(short, long)]
        content: String,
    },

    /// Verify that the file is a valid database
    Verify,

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
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Init { id, api_key } => {
            let path = cli.path.ok_or("Database path required for init")?;
            commands::init::run(&path, &id, &api_key)?;
        }
        Commands::Inspect { format } => {
            let path = cli.path.ok_or("Database path required for inspect")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Append { role, content } => {
            let path = cli.path.ok_or("Database path required for append")?;
            commands::append::run(&path, &role, &content)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Database path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Version => {
            println!("AgentDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("AgentDB Core v{}", agentdb_core::VERSION);
            println!(
                "Supported file versions: {:?}",
                agentdb_core::SUPPORTED_VERSIONS
            );
        }
    }

    Ok(())
}
