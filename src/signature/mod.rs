//! ABI signatures: normalisation, the signature-file format, and the
//! [`SignatureSet`] snapshot type.

pub mod codec;
pub mod normalize;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use codec::{parse, serialize};
pub use normalize::{normalize, normalize_varargs};

/// One library's exported ABI at one point in time: symbol → signature.
///
/// Symbols are unique and iterate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureSet {
    symbols: BTreeMap<String, String>,
}

impl SignatureSet {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `signature` for `symbol`, replacing any earlier entry.
    pub fn insert(&mut self, symbol: impl Into<String>, signature: impl Into<String>) {
        self.symbols.insert(symbol.into(), signature.into());
    }

    /// Signature recorded for `symbol`.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.symbols.get(symbol).map(String::as_str)
    }

    /// Returns `true` if `symbol` is exported.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` when no symbols are exported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol names in sorted order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    /// `(symbol, signature)` pairs in sorted symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.symbols.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SignatureSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (symbol, signature) in iter {
            set.insert(symbol, signature);
        }
        set
    }
}
