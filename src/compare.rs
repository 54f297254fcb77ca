//! Diffing of signature snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signature::{normalize_varargs, SignatureSet};

/// One discrepancy between a baseline and the current ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Exported in the baseline, gone now.
    Removed {
        /// Symbol name.
        symbol: String,
        /// Signature recorded in the baseline.
        signature: String,
    },
    /// Exported in both, with a different signature.
    Changed {
        /// Symbol name.
        symbol: String,
        /// Signature recorded in the baseline.
        old_signature: String,
        /// Signature of the current build.
        new_signature: String,
    },
    /// Exported now, absent from the baseline.
    Added {
        /// Symbol name.
        symbol: String,
        /// Signature of the current build.
        signature: String,
    },
}

impl Finding {
    /// The symbol this finding is about.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Removed { symbol, .. }
            | Self::Changed { symbol, .. }
            | Self::Added { symbol, .. } => symbol,
        }
    }

    /// Returns `true` when fixing this needs a major version bump.
    #[must_use]
    pub fn requires_major_bump(&self) -> bool {
        matches!(self, Self::Removed { .. } | Self::Changed { .. })
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Removed { symbol, signature } => write!(
                f,
                "symbol {symbol} has been removed - please update major version\n\
                 \tsignature: {signature}"
            ),
            Self::Changed { symbol, old_signature, new_signature } => write!(
                f,
                "symbol {symbol} has changed - please update major version\n\
                 \told_signature: {old_signature}\n\tnew_signature: {new_signature}"
            ),
            Self::Added { symbol, signature } => write!(
                f,
                "symbol {symbol} has been added - please mark it _PRIVATE_ or update minor \
                 version\n\tsignature: {signature}"
            ),
        }
    }
}

/// Compares a baseline against the current snapshot.
///
/// Every symbol of both snapshots is visited, so the result lists all
/// problems at once: removals and changes in baseline order, then additions.
/// Signatures are compared with the variadic marker ignored.
#[must_use]
pub fn compare(old: &SignatureSet, new: &SignatureSet) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (symbol, old_sig) in old.iter() {
        match new.get(symbol) {
            None => findings.push(Finding::Removed {
                symbol: symbol.to_string(),
                signature: old_sig.to_string(),
            }),
            Some(new_sig) if normalize_varargs(old_sig) != normalize_varargs(new_sig) => {
                findings.push(Finding::Changed {
                    symbol: symbol.to_string(),
                    old_signature: old_sig.to_string(),
                    new_signature: new_sig.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    for (symbol, new_sig) in new.iter() {
        if !old.contains(symbol) {
            findings.push(Finding::Added {
                symbol: symbol.to_string(),
                signature: new_sig.to_string(),
            });
        }
    }

    findings
}

/// Formats findings for `library` as a human-readable report.
#[must_use]
pub fn format_findings(library: &str, findings: &[Finding]) -> String {
    if findings.is_empty() {
        return format!("{library}: ABI matches the baseline.");
    }

    let mut lines: Vec<String> =
        findings.iter().map(|finding| format!("{library}: {finding}")).collect();

    let total = findings.len();
    lines.push(format!(
        "{total} ABI problem{} found in {library}.",
        if total == 1 { "" } else { "s" }
    ));
    lines.join("\n")
}
