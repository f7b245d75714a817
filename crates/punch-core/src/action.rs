//! Clock action enum as the single source of truth for action strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two kinds of attendance event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockAction {
    In,
    Out,
}

impl ClockAction {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "clock_in",
            Self::Out => "clock_out",
        }
    }
}

impl fmt::Display for ClockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClockAction {
    type Err = UnknownClockAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clock_in" | "clockin" => Ok(Self::In),
            "clock_out" | "clockout" => Ok(Self::Out),
            _ => Err(UnknownClockAction(s.to_string())),
        }
    }
}

impl Serialize for ClockAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ClockAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown action strings.
#[derive(Debug, Clone)]
pub struct UnknownClockAction(String);

impl fmt::Display for UnknownClockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown clock action: {}", self.0)
    }
}

impl std::error::Error for UnknownClockAction {}
