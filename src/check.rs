//! The ABI check: compare a fresh signature dump against the recorded
//! baseline, or record a new baseline.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::compare::{compare, Finding};
use crate::context::ServiceContext;
use crate::error::AbiError;
use crate::pattern::PatternList;
use crate::signature;
use crate::store;

/// Control flags owned by the build layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Overwrite the baseline with the current signatures instead of comparing.
    pub update: bool,
    /// Skip the check entirely.
    pub disabled: bool,
    /// Compare even when the up-to-date stamp matches.
    pub force: bool,
}

/// Inputs of one library's check.
#[derive(Debug, Clone, Copy)]
pub struct CheckRequest<'a> {
    /// Library name used in messages.
    pub library: &'a str,
    /// Raw `symbol: signature` dump of the freshly built library.
    pub dump: &'a str,
    /// Baseline signature file.
    pub baseline: &'a Path,
    /// Symbols taking part in the comparison.
    pub patterns: &'a PatternList,
}

/// Successful result of a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The check is disabled.
    Skipped,
    /// Nothing changed since the last passing check.
    UpToDate,
    /// No baseline existed, or an update was requested; one was written.
    BaselineGenerated {
        /// Baseline that was written.
        path: PathBuf,
        /// Number of recorded symbols.
        symbols: usize,
    },
    /// The current ABI matches the baseline.
    Passed {
        /// Number of compared symbols.
        symbols: usize,
    },
}

/// Machine-readable summary of a check run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Library that was checked.
    pub library: String,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
    /// Outcome; absent when the ABI changed.
    pub outcome: Option<CheckOutcome>,
    /// Every compatibility problem found.
    pub findings: Vec<Finding>,
}

impl CheckReport {
    /// Builds a report from the result of [`run_check`].
    #[must_use]
    pub fn from_result(
        library: &str,
        checked_at: DateTime<Utc>,
        result: &Result<CheckOutcome, AbiError>,
    ) -> Self {
        let (outcome, findings) = match result {
            Ok(outcome) => (Some(outcome.clone()), Vec::new()),
            Err(AbiError::AbiChanged { findings, .. }) => (None, findings.clone()),
            Err(_) => (None, Vec::new()),
        };
        Self { library: library.to_string(), checked_at, outcome, findings }
    }
}

/// Runs the ABI check for one library.
///
/// With no baseline on disk, or with `update` set, the current signatures are
/// written as the new baseline and the run succeeds. Otherwise the baseline
/// is compared against the dump and every finding is reported at once.
///
/// # Errors
///
/// Returns [`AbiError::AbiChanged`] carrying all findings when the ABI
/// drifted, and I/O errors when the baseline or stamp cannot be read or
/// written.
pub fn run_check(
    ctx: &ServiceContext,
    request: &CheckRequest<'_>,
    options: CheckOptions,
) -> Result<CheckOutcome, AbiError> {
    if options.disabled {
        info!("{}: ABI check disabled", request.library);
        return Ok(CheckOutcome::Skipped);
    }

    let current = signature::parse(request.dump, request.patterns);
    let current_text = signature::serialize(&current);

    let baseline_text = if ctx.fs.exists(request.baseline) {
        Some(store::read(ctx, request.baseline)?)
    } else {
        None
    };

    let baseline_text = match baseline_text {
        Some(text) if !options.update => text,
        _ => {
            store::write(ctx, request.baseline, &current_text)?;
            warn!("Generated ABI signatures {}", request.baseline.display());
            let stamp = fingerprint(&current_text, &current_text, request.patterns);
            store::write(ctx, &stamp_path(request.baseline), &stamp)?;
            return Ok(CheckOutcome::BaselineGenerated {
                path: request.baseline.to_path_buf(),
                symbols: current.len(),
            });
        }
    };

    let stamp_file = stamp_path(request.baseline);
    let stamp = fingerprint(&baseline_text, &current_text, request.patterns);
    if !options.force && ctx.fs.read_to_string(&stamp_file).is_ok_and(|s| s.trim() == stamp) {
        info!("{}: ABI unchanged since last check", request.library);
        return Ok(CheckOutcome::UpToDate);
    }

    let baseline = signature::parse(&baseline_text, request.patterns);
    let findings = compare(&baseline, &current);
    if !findings.is_empty() {
        for finding in &findings {
            debug!("{}: {finding}", request.library);
        }
        return Err(AbiError::AbiChanged { library: request.library.to_string(), findings });
    }

    store::write(ctx, &stamp_file, &stamp)?;
    Ok(CheckOutcome::Passed { symbols: current.len() })
}

/// `<baseline>.stamp`.
fn stamp_path(baseline: &Path) -> PathBuf {
    let mut path = baseline.as_os_str().to_owned();
    path.push(".stamp");
    PathBuf::from(path)
}

/// SHA-256 over the baseline, the current signatures and the patterns.
fn fingerprint(baseline: &str, current: &str, patterns: &PatternList) -> String {
    let mut hasher = Sha256::new();
    let patterns = patterns.to_strings().join("\n");
    for part in [baseline, current, patterns.as_str()] {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
