//! Baseline store: the on-disk layout of recorded signature files.
//!
//! Each library keeps one baseline per released ABI version:
//!
//! ```text
//! <abi_directory>/
//!   ├── libfoo-1.0.sigs
//!   ├── libfoo-1.1.sigs
//!   └── libbar-0.0.1.sigs
//! ```

use std::path::{Path, PathBuf};

use log::debug;

use crate::context::ServiceContext;
use crate::error::AbiError;
use crate::pattern::PatternList;
use crate::signature::{self, SignatureSet};
use crate::version::DottedVersion;

const SIGS_SUFFIX: &str = ".sigs";

/// Access to the baselines under one ABI directory.
///
/// All I/O goes through `ctx.fs`.
pub struct BaselineStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> BaselineStore<'a> {
    /// Creates a store rooted at the given ABI directory.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { ctx, root: root.to_path_buf() }
    }

    /// Path of the baseline for `library` at ABI version `vnum`.
    #[must_use]
    pub fn baseline_path(&self, library: &str, vnum: &str) -> PathBuf {
        self.root.join(format!("{library}-{vnum}{SIGS_SUFFIX}"))
    }

    /// Every recorded baseline of `library`, oldest release first.
    ///
    /// Files whose version part is not a dotted number are ignored. A missing
    /// ABI directory yields no history.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a baseline cannot be read.
    pub fn history(&self, library: &str) -> Result<Vec<(DottedVersion, SignatureSet)>, AbiError> {
        if !self.ctx.fs.exists(&self.root) {
            return Ok(Vec::new());
        }
        let entries = self
            .ctx
            .fs
            .list_dir(&self.root)
            .map_err(|source| AbiError::Read { path: self.root.clone(), source })?;

        let prefix = format!("{library}-");
        let mut releases: Vec<(DottedVersion, PathBuf)> = entries
            .iter()
            .filter_map(|name| {
                let raw = name.strip_prefix(&prefix)?.strip_suffix(SIGS_SUFFIX)?;
                let version = DottedVersion::parse(raw);
                if version.is_none() {
                    debug!("ignoring {name}: {raw} is not a dotted version");
                }
                Some((version?, self.root.join(name)))
            })
            .collect();
        releases.sort_by(|a, b| a.0.cmp(&b.0));

        releases
            .into_iter()
            .map(|(version, path)| {
                let text = read(self.ctx, &path)?;
                Ok((version, signature::parse(&text, &PatternList::new())))
            })
            .collect()
    }
}

/// Reads `path` through the filesystem port.
///
/// # Errors
///
/// Returns [`AbiError::Read`] if the file cannot be read.
pub fn read(ctx: &ServiceContext, path: &Path) -> Result<String, AbiError> {
    ctx.fs
        .read_to_string(path)
        .map_err(|source| AbiError::Read { path: path.to_path_buf(), source })
}

/// Replaces `path` with `contents` in a single write.
///
/// # Errors
///
/// Returns [`AbiError::Persistence`] if the write fails.
pub fn write(ctx: &ServiceContext, path: &Path, contents: &str) -> Result<(), AbiError> {
    ctx.fs
        .write(path, contents)
        .map_err(|source| AbiError::Persistence { path: path.to_path_buf(), source })
}
