//! CLI subcommand implementations.

pub mod active;
pub mod clock_in;
pub mod clock_out;
pub mod log;
pub mod status;

/// Display format for event timestamps, matching the stored second
/// precision.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
