//! Sentinel inspector CLI.
//!
//! Sentinel is an in-process interception buffer, not a server (spec §1
//! Non-goals: no persistence, no network transport). This binary is a
//! thin, read-only inspector over one in-memory [`sentinel_core::Agent`]
//! seeded with representative traffic — it never writes to disk and never
//! opens a socket.
//!
//! # Quick Start
//!
//! ```bash
//! sentinel status
//! sentinel inspect --limit 10
//! sentinel watch --refresh-ms 1000
//! ```

mod commands;
mod demo;
mod style;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Sentinel - inspector for the in-process interception buffer.
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show intercept, quarantine, and rate-limiter counters.
    Status,

    /// List or look up quarantined-evidence metadata.
    Inspect {
        /// Look up a single entry by its exact signature.
        #[arg(long)]
        signature: Option<String>,

        /// Maximum number of entries to show when listing.
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Emit machine-readable JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Continuously inject sample traffic and reprint status.
    Watch {
        /// Milliseconds between refreshes.
        #[arg(long, default_value_t = 1000)]
        refresh_ms: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    style::set_no_color(cli.no_color);

    let spinner = style::spinner::create_spinner("seeding agent with sample traffic");
    let agent = demo::seeded_agent();
    style::spinner::finish_success(&spinner, "agent ready");

    match cli.command {
        Commands::Status => {
            commands::status::run(&agent);
            Ok(())
        }
        Commands::Inspect { signature, limit, json } => {
            commands::inspect::run(&agent, signature.as_deref(), limit, json);
            Ok(())
        }
        Commands::Watch { refresh_ms } => {
            commands::watch::run(&agent, refresh_ms);
            Ok(())
        }
    }
}
