//! The flat `symbol: signature` baseline file format.

use log::debug;

use super::normalize::normalize;
use super::SignatureSet;
use crate::pattern::PatternList;

/// Parses a signature file or raw dump into a [`SignatureSet`].
///
/// Every line containing `:` is a signature line: the symbol is the text
/// before the first `:` and the rest is normalised into the signature. Other
/// lines are skipped. Symbols not selected by `patterns` are dropped, and a
/// repeated symbol keeps its last signature.
#[must_use]
pub fn parse(text: &str, patterns: &PatternList) -> SignatureSet {
    let mut set = SignatureSet::new();
    for line in text.lines() {
        let Some((symbol, raw)) = line.split_once(':') else {
            continue;
        };
        if !patterns.selects(symbol) {
            continue;
        }
        let signature = normalize(raw);
        debug!("{raw} -> {signature}");
        set.insert(symbol, signature);
    }
    set
}

/// Renders `set` as one `symbol: signature` line per symbol, sorted by symbol.
#[must_use]
pub fn serialize(set: &SignatureSet) -> String {
    set.iter().map(|(symbol, signature)| format!("{symbol}: {signature}\n")).collect()
}
