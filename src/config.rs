//! Project configuration: per-library ABI settings and control flags.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::check::CheckOptions;
use crate::context::ServiceContext;
use crate::error::AbiError;
use crate::pattern::PatternList;
use crate::store;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "abiguard.yaml";

/// Environment variable forcing baseline regeneration.
pub const ENV_ABI_UPDATE: &str = "ABIGUARD_ABI_UPDATE";
/// Environment variable disabling the check.
pub const ENV_ABI_CHECK_DISABLE: &str = "ABIGUARD_ABI_CHECK_DISABLE";
/// Environment variable forcing a comparison past the up-to-date stamp.
pub const ENV_ABI_CHECK: &str = "ABIGUARD_ABI_CHECK";

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding `<library>-<vnum>.sigs` baselines.
    pub abi_directory: Option<PathBuf>,
    /// Disables every ABI check.
    pub check_disabled: bool,
    /// Per-library settings keyed by library name.
    pub libraries: BTreeMap<String, LibraryConfig>,
}

/// Settings for one library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// ABI version whose baseline is checked, e.g. `1.2.0`.
    pub vnum: Option<String>,
    /// Ordered match patterns.
    pub abi_match: Option<Vec<String>>,
    /// Name of the terminal version-script block before transformation.
    pub version: Option<String>,
    /// Generate a private-library version script.
    pub private: bool,
}

impl Config {
    /// Loads `path`, or the default file when `path` is `None`.
    ///
    /// A missing default file yields an empty configuration; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(ctx: &ServiceContext, path: Option<&Path>) -> Result<Self, AbiError> {
        let path = match path {
            Some(path) => path,
            None if ctx.fs.exists(Path::new(DEFAULT_CONFIG_FILE)) => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        let text = store::read(ctx, path)?;
        Self::parse(&text).map_err(|e| AbiError::Config(format!("{}: {e}", path.display())))
    }

    /// Parses configuration YAML.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if parsing fails.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Settings for `library`, or defaults when it is not listed.
    #[must_use]
    pub fn library(&self, library: &str) -> LibraryConfig {
        self.libraries.get(library).cloned().unwrap_or_default()
    }

    /// Baseline path for `library` derived from `abi_directory` and `vnum`.
    #[must_use]
    pub fn baseline_path(&self, library: &str) -> Option<PathBuf> {
        let dir = self.abi_directory.as_ref()?;
        let vnum = self.libraries.get(library)?.vnum.as_ref()?;
        Some(dir.join(format!("{library}-{vnum}.sigs")))
    }
}

impl LibraryConfig {
    /// Configured patterns, or `default` when none are set.
    #[must_use]
    pub fn patterns_or(&self, default: &[&str]) -> PatternList {
        match &self.abi_match {
            Some(items) => PatternList::parse(items),
            None => PatternList::parse(default),
        }
    }
}

/// Control flags taken from the environment.
///
/// Each flag is on when its variable holds `1`, `true`, `yes` or `on`.
#[must_use]
pub fn options_from_env() -> CheckOptions {
    CheckOptions {
        update: env_flag(ENV_ABI_UPDATE),
        disabled: env_flag(ENV_ABI_CHECK_DISABLE),
        force: env_flag(ENV_ABI_CHECK),
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|value| is_truthy(&value))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
