//! Release identifiers.
//!
//! Two kinds of tag exist and are deliberately separate types:
//! [`DottedVersion`] comes from baseline filenames and orders numerically per
//! component, while [`SymbolicTag`] names version-script blocks and only
//! supports equality.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dotted numeric release such as `1.0.10`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DottedVersion {
    raw: String,
    parts: Vec<u64>,
}

impl DottedVersion {
    /// Parses a release made of `.`-separated decimal components.
    ///
    /// Returns `None` when any component is empty or not a number.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let parts =
            raw.split('.').map(|part| part.parse::<u64>().ok()).collect::<Option<Vec<_>>>()?;
        Some(Self { raw: raw.to_string(), parts })
    }

    /// The release as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for DottedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DottedVersion {}

impl PartialOrd for DottedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DottedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // `1.01` and `1.1` compare equal numerically; fall back to the text so
        // Ord stays consistent with Eq.
        self.parts.cmp(&other.parts).then_with(|| self.raw.cmp(&other.raw))
    }
}

impl fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for DottedVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("not a dotted version: {value}"))
    }
}

impl From<DottedVersion> for String {
    fn from(value: DottedVersion) -> Self {
        value.raw
    }
}

/// A version-script block name such as `LIBFOO_1.2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolicTag(String);

impl SymbolicTag {
    /// Builds a tag from a library or version name.
    ///
    /// Only the last path component is kept, `-` and `+` become `_`, and the
    /// result is uppercased.
    #[must_use]
    pub fn transform(name: &str) -> Self {
        let base = name.rsplit('/').next().unwrap_or(name);
        Self(base.replace(['-', '+'], "_").to_uppercase())
    }

    /// Uses `tag` verbatim.
    #[must_use]
    pub fn verbatim(tag: &str) -> Self {
        Self(tag.to_string())
    }

    /// The block name for `release` of the library tagged `self`.
    #[must_use]
    pub fn release(&self, release: &DottedVersion) -> Self {
        Self(format!("{}_{}", self.0, release.as_str()))
    }

    /// The tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolicTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
