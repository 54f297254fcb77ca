//! Symbol → first-release mapping built from historical baselines.

use std::collections::BTreeMap;

use crate::signature::SignatureSet;
use crate::version::DottedVersion;

/// Records, for each symbol, the release in which it was first exported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolVersionMap {
    entries: BTreeMap<String, DottedVersion>,
}

impl SymbolVersionMap {
    /// Folds snapshots, oldest first, into a map.
    ///
    /// A symbol keeps the release of the first snapshot that exports it; later
    /// snapshots never overwrite an entry.
    pub fn build<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = (&'a DottedVersion, &'a SignatureSet)>,
    {
        let mut map = Self::default();
        for (release, snapshot) in history {
            map.record(release, snapshot);
        }
        map
    }

    /// Adds every symbol of `snapshot` not yet present under `release`.
    pub fn record(&mut self, release: &DottedVersion, snapshot: &SignatureSet) {
        for symbol in snapshot.symbols() {
            if !self.entries.contains_key(symbol) {
                self.entries.insert(symbol.to_string(), release.clone());
            }
        }
    }

    /// Release in which `symbol` first appeared.
    #[must_use]
    pub fn release_of(&self, symbol: &str) -> Option<&DottedVersion> {
        self.entries.get(symbol)
    }

    /// Symbols first exported in `release`, sorted.
    #[must_use]
    pub fn introduced_in(&self, release: &DottedVersion) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, first)| *first == release)
            .map(|(symbol, _)| symbol.as_str())
            .collect()
    }

    /// Every known symbol, sorted.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no symbol is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> DottedVersion {
        DottedVersion::parse(raw).unwrap()
    }

    fn snapshot(symbols: &[&str]) -> SignatureSet {
        symbols.iter().map(|s| (*s, "int (void)")).collect()
    }

    #[test]
    fn earliest_release_wins() {
        let (v1, v2) = (v("1"), v("2"));
        let (s1, s2) = (snapshot(&["a"]), snapshot(&["a", "b"]));
        let map = SymbolVersionMap::build([(&v1, &s1), (&v2, &s2)]);
        assert_eq!(map.release_of("a"), Some(&v1));
        assert_eq!(map.release_of("b"), Some(&v2));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn removed_symbols_keep_their_release() {
        let (v1, v2) = (v("1.0"), v("2.0"));
        let (s1, s2) = (snapshot(&["gone"]), snapshot(&["kept"]));
        let map = SymbolVersionMap::build([(&v1, &s1), (&v2, &s2)]);
        assert_eq!(map.introduced_in(&v1), vec!["gone"]);
        assert_eq!(map.introduced_in(&v2), vec!["kept"]);
    }

    #[test]
    fn introduced_in_is_sorted() {
        let v1 = v("0.1");
        let s1 = snapshot(&["zz", "aa", "mm"]);
        let map = SymbolVersionMap::build([(&v1, &s1)]);
        assert_eq!(map.introduced_in(&v1), vec!["aa", "mm", "zz"]);
    }

    #[test]
    fn empty_history_gives_empty_map() {
        let map = SymbolVersionMap::build(Vec::<(&DottedVersion, &SignatureSet)>::new());
        assert!(map.is_empty());
    }
}
