//! Error type shared by every stage of a solar-term query.

use thiserror::Error;

use crate::chinese::ephemeris::ParseError;

/// Failures that can occur while loading ephemeris data or producing a
/// report.
///
/// Only [`Error::EphemerisUnavailable`] and [`Error::Computation`] ever reach
/// the interactive shell from a report; the loader-level variants are folded
/// into the attempt list of `EphemerisUnavailable`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
    #[error("no ephemeris source could be loaded ({})", .attempts.join("; "))]
    EphemerisUnavailable { attempts: Vec<String> },
    #[error("invalid year '{input}': {reason}")]
    InvalidYearInput { input: String, reason: String },
    #[error("computation failed: {0}")]
    Computation(String),
    #[error("malformed ephemeris data: {0}")]
    Parse(#[from] ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("download failed: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, Error>;
