//! Reading hand-written version scripts as pattern seeds.
//!
//! Only the visibility lists are used: `global:` entries become inclusion
//! patterns and `local:` entries become exclusions. Version history in the
//! seed is ignored.

use crate::error::AbiError;
use crate::pattern::{MatchPattern, PatternList};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Global,
    Local,
}

/// Adds the visibility entries of `script` to `patterns`.
///
/// Entries already present are not repeated. A `*` under `local:` is dropped
/// since the generator decides the catch-all itself.
///
/// # Errors
///
/// Returns [`AbiError::MalformedVersionScript`] when a block opens inside
/// another block, closes without being open, is left unclosed, or holds an
/// empty entry.
pub fn seed_patterns(script: &str, patterns: &mut PatternList) -> Result<(), AbiError> {
    let mut open_at: Option<usize> = None;
    let mut section = Section::Global;

    for (index, raw) in script.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.ends_with('{') {
            if let Some(opened) = open_at {
                let reason = format!("nested block (outer opened at line {opened})");
                return Err(malformed(line_no, reason));
            }
            open_at = Some(line_no);
            section = Section::Global;
            continue;
        }
        if is_block_end(line) {
            if open_at.take().is_none() {
                return Err(malformed(line_no, "block closed without being opened"));
            }
            continue;
        }
        if open_at.is_none() {
            continue;
        }
        match line {
            "global:" => section = Section::Global,
            "local:" => section = Section::Local,
            _ => {
                let symbol = line.split(';').next().unwrap_or_default().trim();
                if symbol.is_empty() {
                    return Err(malformed(line_no, "empty symbol entry"));
                }
                match section {
                    Section::Local if symbol == "*" => {}
                    Section::Local => {
                        patterns.push_unique(MatchPattern::parse(&format!("!{symbol}")));
                    }
                    Section::Global => patterns.push_unique(MatchPattern::parse(symbol)),
                }
            }
        }
    }

    match open_at {
        Some(opened) => Err(malformed(opened, "block is never closed")),
        None => Ok(()),
    }
}

/// `};` or `} PARENT;`.
fn is_block_end(line: &str) -> bool {
    line.strip_prefix('}')
        .and_then(|rest| rest.strip_suffix(';'))
        .is_some_and(|parent| !parent.contains(['{', '}', ';']))
}

fn malformed(line: usize, reason: impl Into<String>) -> AbiError {
    AbiError::MalformedVersionScript { line, reason: reason.into() }
}
