//! Version-script rendering.

use log::debug;

use crate::pattern::{MatchPattern, PatternList};
use crate::symmap::SymbolVersionMap;
use crate::version::{DottedVersion, SymbolicTag};

/// Runtime symbols that stay hidden whatever the pattern list says.
pub const ALWAYS_LOCAL: [&str; 3] = ["_end", "__bss_start", "_edata"];

/// Renders linker version scripts for one library.
#[derive(Debug, Clone)]
pub struct VersionScriptGenerator {
    library: SymbolicTag,
    current: SymbolicTag,
    private: bool,
}

impl VersionScriptGenerator {
    /// Creates a generator for `library` whose terminal block is `current`.
    ///
    /// `library` is transformed into its symbolic form (`libfoo` → `LIBFOO`).
    #[must_use]
    pub fn new(library: &str, current: SymbolicTag) -> Self {
        Self { library: SymbolicTag::transform(library), current, private: false }
    }

    /// Collapses every export into the terminal block.
    ///
    /// Used for private library copies that must hide their internals but do
    /// not publish a version history.
    #[must_use]
    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    /// Renders the script.
    ///
    /// One block is emitted per release in ascending order, each listing the
    /// symbols first exported there and chaining to its predecessor. Emission
    /// stops at the first release whose block name equals the current tag.
    /// The terminal block exports the inclusion patterns (or `*`) and hides
    /// the exclusion patterns, the runtime markers, and with an explicit export
    /// list everything else.
    #[must_use]
    pub fn generate(
        &self,
        releases: &[DottedVersion],
        symbols: &SymbolVersionMap,
        patterns: &PatternList,
    ) -> String {
        let mut lines = Vec::new();

        let patterns = if self.private {
            let mut folded = patterns.clone();
            for symbol in symbols.symbols() {
                folded.push_unique(MatchPattern::parse(symbol));
            }
            debug!("{}: private mode, {} exported symbols folded", self.current, symbols.len());
            folded
        } else {
            self.write_history(&mut lines, releases, symbols);
            patterns.clone()
        };

        self.write_current(&mut lines, &patterns);
        let mut script = lines.join("\n");
        script.push('\n');
        script
    }

    fn write_history(
        &self,
        lines: &mut Vec<String>,
        releases: &[DottedVersion],
        symbols: &SymbolVersionMap,
    ) {
        let mut releases = releases.to_vec();
        releases.sort();
        releases.dedup();

        let mut parent: Option<SymbolicTag> = None;
        for release in &releases {
            let tag = self.library.release(release);
            if tag == self.current {
                break;
            }
            lines.push(format!("{tag} {{"));
            let introduced = symbols.introduced_in(release);
            if !introduced.is_empty() {
                lines.push("\tglobal:".to_string());
                lines.extend(introduced.iter().map(|symbol| format!("\t\t{symbol};")));
            }
            match &parent {
                Some(prev) => lines.push(format!("}} {prev};")),
                None => lines.push("};".to_string()),
            }
            lines.push(String::new());
            parent = Some(tag);
        }
    }

    fn write_current(&self, lines: &mut Vec<String>, patterns: &PatternList) {
        let global: Vec<&str> = patterns.includes().collect();
        let mut local: Vec<&str> = patterns.excludes().collect();
        local.extend(ALWAYS_LOCAL);

        lines.push(format!("{} {{", self.current));
        lines.push("\tglobal:".to_string());
        if global.is_empty() {
            lines.push("\t\t*;".to_string());
        } else {
            lines.extend(global.iter().map(|symbol| format!("\t\t{symbol};")));
        }
        lines.push("\tlocal:".to_string());
        lines.extend(local.iter().map(|symbol| format!("\t\t{symbol};")));
        if !global.is_empty() && global != ["*"] {
            lines.push("\t\t*;".to_string());
        }
        lines.push("};".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SignatureSet;

    fn v(raw: &str) -> DottedVersion {
        DottedVersion::parse(raw).unwrap()
    }

    fn map(history: &[(&str, &[&str])]) -> SymbolVersionMap {
        let mut map = SymbolVersionMap::default();
        for (release, names) in history {
            let set: SignatureSet = names.iter().map(|s| (*s, "int (void)")).collect();
            map.record(&v(release), &set);
        }
        map
    }

    #[test]
    fn history_block_then_closed_current_block() {
        let symbols = map(&[("1.0", &["a"])]);
        let generator = VersionScriptGenerator::new("libfoo", SymbolicTag::verbatim("LIBFOO_2.0"));
        let script = generator.generate(&[v("1.0")], &symbols, &PatternList::parse(["b"]));
        assert_eq!(
            script,
            "LIBFOO_1.0 {\n\tglobal:\n\t\ta;\n};\n\n\
             LIBFOO_2.0 {\n\tglobal:\n\t\tb;\n\tlocal:\n\
             \t\t_end;\n\t\t__bss_start;\n\t\t_edata;\n\t\t*;\n};\n"
        );
    }

    #[test]
    fn private_mode_folds_symbols_into_current_block() {
        let symbols = map(&[("1.0", &["a"])]);
        let generator = VersionScriptGenerator::new("libfoo", SymbolicTag::verbatim("LIBFOO_2.0"))
            .private(true);
        let script = generator.generate(&[v("1.0")], &symbols, &PatternList::parse(["b"]));
        assert!(!script.contains("LIBFOO_1.0"));
        assert!(script.starts_with("LIBFOO_2.0 {\n\tglobal:\n\t\tb;\n\t\ta;\n\tlocal:"));
    }

    #[test]
    fn blocks_follow_numeric_order_and_chain() {
        let symbols = map(&[("1.0.2", &["x"]), ("1.0.3", &["y"]), ("1.0.10", &["z"])]);
        let generator = VersionScriptGenerator::new("ldb", SymbolicTag::verbatim("LDB_2.0.0"));
        let script = generator.generate(
            &[v("1.0.10"), v("1.0.2"), v("1.0.3")],
            &symbols,
            &PatternList::new(),
        );
        let p2 = script.find("LDB_1.0.2 {").unwrap();
        let p3 = script.find("LDB_1.0.3 {").unwrap();
        let p10 = script.find("LDB_1.0.10 {").unwrap();
        assert!(p2 < p3 && p3 < p10);
        assert!(script.contains("\t\tx;\n};\n"));
        assert!(script.contains("\t\ty;\n} LDB_1.0.2;\n"));
        assert!(script.contains("\t\tz;\n} LDB_1.0.3;\n"));
    }

    #[test]
    fn history_stops_at_current_release() {
        let symbols = map(&[("1.0", &["a"]), ("1.1", &["b"]), ("1.2", &["c"])]);
        let generator = VersionScriptGenerator::new("libfoo", SymbolicTag::verbatim("LIBFOO_1.1"));
        let releases = [v("1.0"), v("1.1"), v("1.2")];
        let script = generator.generate(&releases, &symbols, &PatternList::new());
        assert!(script.contains("LIBFOO_1.0 {"));
        assert!(!script.contains("LIBFOO_1.2"));
        assert_eq!(script.matches("LIBFOO_1.1 {").count(), 1);
    }

    #[test]
    fn release_without_new_symbols_has_no_global_section() {
        let symbols = map(&[("1.0", &["a"])]);
        let generator = VersionScriptGenerator::new("libfoo", SymbolicTag::verbatim("LIBFOO_3.0"));
        let script = generator.generate(&[v("1.0"), v("2.0")], &symbols, &PatternList::new());
        assert!(script.contains("LIBFOO_2.0 {\n} LIBFOO_1.0;\n"));
    }

    #[test]
    fn empty_patterns_export_everything() {
        let generator = VersionScriptGenerator::new("libfoo", SymbolicTag::verbatim("LIBFOO_1.0"));
        let script = generator.generate(&[], &SymbolVersionMap::default(), &PatternList::new());
        assert_eq!(
            script,
            "LIBFOO_1.0 {\n\tglobal:\n\t\t*;\n\tlocal:\n\t\t_end;\n\t\t__bss_start;\n\t\t_edata;\n};\n"
        );
    }

    #[test]
    fn explicit_wildcard_is_not_closed() {
        let generator = VersionScriptGenerator::new("libfoo", SymbolicTag::verbatim("LIBFOO_1.0"));
        let patterns = PatternList::parse(["*", "!internal_*"]);
        let script = generator.generate(&[], &SymbolVersionMap::default(), &patterns);
        assert!(script.contains("\tlocal:\n\t\tinternal_*;\n\t\t_end;"));
        assert!(script.ends_with("\t\t_edata;\n};\n"));
    }
}
