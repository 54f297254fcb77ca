//! Ordered include/exclude symbol patterns.
//!
//! A pattern list decides two things: which symbols take part in ABI
//! comparison, and which symbols end up `global` or `local` in a generated
//! version script. Matching uses `fnmatch`-style globs.

use std::fmt;

use glob::Pattern;

/// A single glob, optionally negated with a leading `!`.
#[derive(Debug, Clone)]
pub enum MatchPattern {
    /// Symbols matching the glob are included.
    Include(Glob),
    /// Symbols matching the glob are excluded unless a later include matches.
    Exclude(Glob),
}

/// A compiled glob that remembers its source text.
#[derive(Debug, Clone)]
pub struct Glob {
    source: String,
    compiled: Option<Pattern>,
}

impl Glob {
    /// Compiles `source`. Globs that fail to compile match only themselves.
    ///
    /// Runs of `*` are collapsed first, so `foo_**` behaves like `foo_*` as it
    /// does under `fnmatch`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self { source: source.to_string(), compiled: Pattern::new(&collapse_stars(source)).ok() }
    }

    /// The glob text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if `symbol` matches this glob.
    #[must_use]
    pub fn matches(&self, symbol: &str) -> bool {
        match &self.compiled {
            Some(pattern) => pattern.matches(symbol),
            None => self.source == symbol,
        }
    }
}

fn collapse_stars(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut after_star = false;
    for c in source.chars() {
        if c == '*' && after_star {
            continue;
        }
        after_star = c == '*';
        out.push(c);
    }
    out
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Glob {}

impl MatchPattern {
    /// Parses `!glob` as an exclusion and anything else as an inclusion.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix('!') {
            Some(rest) => Self::Exclude(Glob::new(rest)),
            None => Self::Include(Glob::new(text)),
        }
    }

    /// The glob without its negation marker.
    #[must_use]
    pub fn glob(&self) -> &Glob {
        match self {
            Self::Include(glob) | Self::Exclude(glob) => glob,
        }
    }

    /// Returns `true` for `!` patterns.
    #[must_use]
    pub fn is_exclude(&self) -> bool {
        matches!(self, Self::Exclude(_))
    }
}

impl PartialEq for MatchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.is_exclude() == other.is_exclude() && self.glob() == other.glob()
    }
}

impl Eq for MatchPattern {}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include(glob) => f.write_str(glob.as_str()),
            Self::Exclude(glob) => write!(f, "!{}", glob.as_str()),
        }
    }
}

/// An ordered list of [`MatchPattern`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternList {
    patterns: Vec<MatchPattern>,
}

impl PatternList {
    /// Creates an empty list, which includes every symbol.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses each string with [`MatchPattern::parse`], keeping order.
    pub fn parse<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { patterns: items.into_iter().map(|s| MatchPattern::parse(s.as_ref())).collect() }
    }

    /// Appends a pattern.
    pub fn push(&mut self, pattern: MatchPattern) {
        self.patterns.push(pattern);
    }

    /// Appends a pattern unless an identical one is already present.
    pub fn push_unique(&mut self, pattern: MatchPattern) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    /// Returns `true` when the list holds no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates over the patterns in order.
    pub fn iter(&self) -> impl Iterator<Item = &MatchPattern> {
        self.patterns.iter()
    }

    /// Globs of the inclusion patterns, in order.
    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().filter(|p| !p.is_exclude()).map(|p| p.glob().as_str())
    }

    /// Globs of the exclusion patterns, in order, without the `!`.
    pub fn excludes(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().filter(|p| p.is_exclude()).map(|p| p.glob().as_str())
    }

    /// Decides whether `symbol` is selected by this list.
    ///
    /// Patterns are scanned in order. The first matching inclusion selects the
    /// symbol. A matching exclusion is remembered and the scan continues; if no
    /// later inclusion matches, the symbol is rejected. A symbol matched by no
    /// pattern at all is selected, as is every symbol for an empty list.
    #[must_use]
    pub fn selects(&self, symbol: &str) -> bool {
        let mut excluded = false;
        for pattern in &self.patterns {
            if !pattern.glob().matches(symbol) {
                continue;
            }
            match pattern {
                MatchPattern::Include(_) => return true,
                MatchPattern::Exclude(_) => excluded = true,
            }
        }
        !excluded
    }

    /// The list as strings, exclusions carrying their `!`.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.patterns.iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<MatchPattern> for PatternList {
    fn from_iter<T: IntoIterator<Item = MatchPattern>>(iter: T) -> Self {
        Self { patterns: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_selects_everything() {
        let list = PatternList::new();
        assert!(list.selects("anything"));
    }

    #[test]
    fn first_include_wins() {
        let list = PatternList::parse(["foo_*", "!foo_bar"]);
        assert!(list.selects("foo_bar"));
    }

    #[test]
    fn exclude_defers_to_later_include() {
        let list = PatternList::parse(["!foo_*", "foo_bar"]);
        assert!(list.selects("foo_bar"));
        assert!(!list.selects("foo_baz"));
    }

    #[test]
    fn unmatched_symbol_is_selected() {
        let list = PatternList::parse(["!priv_*"]);
        assert!(list.selects("pub_fn"));
        assert!(!list.selects("priv_fn"));
    }

    #[test]
    fn glob_classes_and_wildcards() {
        let list = PatternList::parse(["!*", "ldb_[a-c]?"]);
        assert!(list.selects("ldb_ax"));
        assert!(!list.selects("ldb_dx"));
        assert!(!list.selects("ldb_a"));
    }

    #[test]
    fn includes_and_excludes_keep_order() {
        let list = PatternList::parse(["a", "!b", "c", "!d"]);
        assert_eq!(list.includes().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(list.excludes().collect::<Vec<_>>(), vec!["b", "d"]);
        assert_eq!(list.to_strings(), vec!["a", "!b", "c", "!d"]);
    }

    #[test]
    fn push_unique_skips_duplicates() {
        let mut list = PatternList::parse(["a"]);
        list.push_unique(MatchPattern::parse("a"));
        list.push_unique(MatchPattern::parse("!a"));
        assert_eq!(list.to_strings(), vec!["a", "!a"]);
    }

    #[test]
    fn repeated_stars_match_like_one() {
        let list = PatternList::parse(["!*", "foo_**"]);
        assert!(list.selects("foo_bar"));
        assert!(list.selects("foo_"));
        assert!(!list.selects("bar_foo"));
        assert_eq!(list.to_strings(), vec!["!*", "foo_**"]);
    }

    #[test]
    fn invalid_glob_matches_literally() {
        let glob = Glob::new("weird[");
        assert!(glob.matches("weird["));
        assert!(!glob.matches("weird"));
    }
}
