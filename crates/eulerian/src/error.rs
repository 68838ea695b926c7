//! Error type shared by all stages.
//!
//! Usage errors (bad dimension), I/O failures, malformed record lines, and the
//! canonicalizer's orbit-sum invariant are the only failure modes. None of them
//! is retried: every stage is deterministic.

use std::fmt;

/// Which pipeline stage rejected an argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Canon,
    Sat,
    Total,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canon => f.write_str("canon"),
            Self::Sat => f.write_str("sat"),
            Self::Total => f.write_str("total"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    InvalidDimension {
        stage: Stage,
        d: u32,
        allowed: &'static str,
    },
    Io(std::io::Error),
    Parse {
        line: usize,
        reason: String,
    },
    /// Sum of distinct-image counts differs from the number of subsets scanned.
    OrbitSumMismatch {
        orbit_sum: u64,
        scanned: u64,
    },
}

impl Error {
    pub(crate) fn dimension(stage: Stage, d: u32, allowed: &'static str) -> Self {
        Self::InvalidDimension { stage, d, allowed }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { stage, d, allowed } => {
                write!(f, "{stage}: dimension {d} not supported (allowed: {allowed})")
            }
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            Self::OrbitSumMismatch { orbit_sum, scanned } => write!(
                f,
                "orbit sizes sum to {orbit_sum} but {scanned} subsets were scanned"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
