//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Time-attendance ledger.
///
/// Records clock-in/clock-out events in an append-only log and derives
/// current state and worked-time totals from the history on demand.
#[derive(Debug, Parser)]
#[command(name = "punch", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Act as this user instead of the configured one.
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clock in to start your shift.
    In,

    /// Clock out to end your shift.
    Out,

    /// Show clock-in and clock-out history with totals.
    Log {
        /// View another user's history (admin only).
        #[arg(long)]
        user: Option<String>,
    },

    /// Show users currently clocked in (admin only).
    Active,

    /// Show your current attendance state.
    Status,
}
