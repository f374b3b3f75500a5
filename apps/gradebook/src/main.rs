//! # Gradebook - Student Records Server
//!
//! The main binary for the gradebook service.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for record maintenance, statistics and CSV export
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          apps/gradebook (THE BINARY)         │
//! │                                              │
//! │   ┌─────────────┐        ┌─────────────┐     │
//! │   │    CLI      │        │  HTTP API   │     │
//! │   │   (clap)    │        │   (axum)    │     │
//! │   └──────┬──────┘        └──────┬──────┘     │
//! │          └───────────┬──────────┘            │
//! │                      ▼                       │
//! │              ┌────────────────┐              │
//! │              │ gradebook-core │              │
//! │              │  (THE LOGIC)   │              │
//! │              └────────────────┘              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server on $PORT (default 5000)
//! gradebook
//! gradebook server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! gradebook add -n "Jane Doe" -m 72
//! gradebook stats
//! gradebook export -o student_records.csv
//! ```

use clap::Parser;
use gradebook::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // GRADEBOOK_LOG_FORMAT=json switches to machine-parseable output.
    let log_format =
        std::env::var("GRADEBOOK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gradebook=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
   ___              _     _                 _
  / __|_ _ __ _ __| |___| |__  ___  ___ | |__
 | (_ | '_/ _` / _` / -_) '_ \/ _ \/ _ \| / /
  \___|_| \__,_\__,_\___|_.__/\___/\___/|_\_\

  Student Records Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
