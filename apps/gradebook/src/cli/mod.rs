//! # Gradebook CLI Module
//!
//! This module implements the CLI interface for the gradebook service.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (default when no command is given)
//! - `init` - Create the database and its tables
//! - `list` - List students
//! - `add` - Add a student
//! - `update` - Replace a student's name and marks
//! - `delete` - Delete a student
//! - `stats` - Show pass/fail statistics
//! - `export` - Write the CSV export to a file
//! - `import` - Add students from a CSV file

mod commands;

use clap::{Parser, Subcommand};
use gradebook_core::{GradebookError, StoreBackend, primitives::DEFAULT_PASSING_THRESHOLD};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Gradebook - student records server
///
/// Stores student names and marks, reports pass/fail statistics and exports
/// the records as CSV.
#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the student database
    #[arg(short = 'D', long, global = true, default_value = gradebook_core::primitives::DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Storage backend: "redb" (ACID database) or "memory" (volatile)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: StoreBackend,

    /// Minimum marks counted as a pass
    #[arg(
        short = 't',
        long,
        global = true,
        default_value_t = DEFAULT_PASSING_THRESHOLD,
        allow_negative_numbers = true
    )]
    pub passing_threshold: i64,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = gradebook_core::primitives::DEFAULT_HOST)]
        host: String,

        /// Port to bind to (defaults to $PORT, then 5000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the database and its tables
    Init,

    /// List students
    List {
        /// Sort key (id, name, marks)
        #[arg(short, long)]
        sort_by: Option<String>,

        /// Sort order (asc, desc)
        #[arg(short, long, default_value = "asc")]
        order: String,
    },

    /// Add a student
    Add {
        /// Student name
        #[arg(short, long)]
        name: String,

        /// Marks
        #[arg(short, long, allow_negative_numbers = true)]
        marks: i64,
    },

    /// Replace a student's name and marks
    Update {
        /// Student ID
        #[arg(long)]
        id: u64,

        /// New name
        #[arg(short, long)]
        name: String,

        /// New marks
        #[arg(short, long, allow_negative_numbers = true)]
        marks: i64,
    },

    /// Delete a student
    Delete {
        /// Student ID
        #[arg(long)]
        id: u64,
    },

    /// Show pass/fail statistics
    Stats,

    /// Write the CSV export to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Add students from a CSV file with a `Name,Marks` header
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), GradebookError> {
    let ctx = CommandContext {
        database: cli.database,
        backend: cli.backend,
        passing_threshold: cli.passing_threshold,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&ctx, &host, port).await,
        None => cmd_server(&ctx, gradebook_core::primitives::DEFAULT_HOST, None).await,
        Some(Commands::Init) => cmd_init(&ctx),
        Some(Commands::List { sort_by, order }) => cmd_list(&ctx, sort_by.as_deref(), &order),
        Some(Commands::Add { name, marks }) => cmd_add(&ctx, name, marks),
        Some(Commands::Update { id, name, marks }) => cmd_update(&ctx, id, name, marks),
        Some(Commands::Delete { id }) => cmd_delete(&ctx, id),
        Some(Commands::Stats) => cmd_stats(&ctx),
        Some(Commands::Export { output }) => cmd_export(&ctx, &output),
        Some(Commands::Import { input }) => cmd_import(&ctx, &input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["gradebook"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.backend, StoreBackend::Redb);
        assert_eq!(cli.passing_threshold, 33);
    }

    #[test]
    fn server_flags() {
        let cli = Cli::try_parse_from(["gradebook", "-B", "memory", "server", "-p", "8081"])
            .expect("parse");
        assert_eq!(cli.backend, StoreBackend::Memory);
        match cli.command {
            Some(Commands::Server { port, host }) => {
                assert_eq!(port, Some(8081));
                assert_eq!(host, "0.0.0.0");
            }
            other => unreachable!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn negative_marks_are_accepted() {
        let cli = Cli::try_parse_from(["gradebook", "add", "-n", "Low", "-m", "-4"])
            .expect("parse");
        match cli.command {
            Some(Commands::Add { name, marks }) => {
                assert_eq!(name, "Low");
                assert_eq!(marks, -4);
            }
            other => unreachable!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["gradebook", "-B", "sqlite", "stats"]).is_err());
    }
}
