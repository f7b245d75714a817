//! Attendance ledger CLI library.
//!
//! This crate is the command dispatcher: it gates permission, invokes
//! the ledger, applies the external presence marker, and renders
//! results. All user-facing text lives here, never in the core.

mod cli;
pub mod commands;
mod config;
mod presence;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use presence::FilePresenceMarker;
