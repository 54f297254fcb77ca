//! Error type shared by the check and version-script pipelines.

use std::path::PathBuf;

use crate::compare::Finding;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while checking an ABI or generating a version script.
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    /// The exported ABI drifted from the recorded baseline.
    ///
    /// Carries every finding of the run, not just the first one.
    #[error(
        "ABI for {library} has changed ({} finding(s)) - please fix library version then rerun with --update",
        .findings.len()
    )]
    AbiChanged {
        /// Library whose ABI changed.
        library: String,
        /// Every removed, changed or added symbol.
        findings: Vec<Finding>,
    },

    /// A baseline, stamp or version script could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Persistence {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: PortError,
    },

    /// An input file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: PortError,
    },

    /// A legacy version script violated the block structure.
    #[error("malformed version script at line {line}: {reason}")]
    MalformedVersionScript {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// Configuration was missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),
}
