//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `abiguard`.
#[derive(Debug, Parser)]
#[command(
    name = "abiguard",
    version,
    about = "Check shared-library ABIs and generate version scripts"
)]
pub struct Cli {
    /// Configuration file (defaults to `abiguard.yaml` when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare a library's signature dump against its recorded baseline.
    Check(CheckArgs),
    /// Generate a linker version script from the recorded baselines.
    Vscript(VscriptArgs),
    /// Print the normalized signature file for a raw dump.
    Normalize {
        /// Raw dump to read; `-` or absent reads standard input.
        input: Option<PathBuf>,
    },
}

/// Arguments of `abiguard check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Library name.
    pub library: String,
    /// Raw `symbol: signature` dump; `-` reads standard input.
    #[arg(long, value_name = "FILE")]
    pub dump: PathBuf,
    /// Baseline signature file (defaults to the configured ABI directory).
    #[arg(long, value_name = "FILE")]
    pub sigs: Option<PathBuf>,
    /// Match pattern, repeatable; prefix with `!` to exclude.
    #[arg(long = "match", value_name = "PATTERN", allow_hyphen_values = true)]
    pub patterns: Vec<String>,
    /// Regenerate the baseline instead of comparing.
    #[arg(long)]
    pub update: bool,
    /// Skip the check.
    #[arg(long)]
    pub disable: bool,
    /// Compare even if nothing changed since the last passing check.
    #[arg(long)]
    pub force: bool,
    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `abiguard vscript`.
#[derive(Debug, Args)]
pub struct VscriptArgs {
    /// Library name.
    pub library: String,
    /// Output version-script file.
    #[arg(long, short, value_name = "FILE")]
    pub output: PathBuf,
    /// Current version, e.g. `libfoo-1.2.0`; transformed into the block name.
    #[arg(long, value_name = "TAG")]
    pub version: Option<String>,
    /// Directory holding the library's historical `.sigs` baselines.
    #[arg(long, value_name = "DIR")]
    pub abi_dir: Option<PathBuf>,
    /// Existing version script whose global/local lists seed the patterns.
    #[arg(long, value_name = "FILE")]
    pub seed: Option<PathBuf>,
    /// Match pattern, repeatable; prefix with `!` to hide.
    #[arg(long = "match", value_name = "PATTERN", allow_hyphen_values = true)]
    pub patterns: Vec<String>,
    /// Put every export under the current tag without version history.
    #[arg(long)]
    pub private: bool,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::parse_from([
            "abiguard", "check", "libfoo", "--dump", "sigs.txt", "--match", "foo_*", "--match",
            "!foo_priv", "--update",
        ]);
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.library, "libfoo");
        assert_eq!(args.patterns, vec!["foo_*", "!foo_priv"]);
        assert!(args.update);
        assert!(!args.force);
    }

    #[test]
    fn parses_vscript_subcommand() {
        let cli = Cli::parse_from([
            "abiguard", "--config", "x.yaml", "vscript", "ldb", "-o", "ldb.vscript", "--private",
        ]);
        assert!(cli.config.is_some());
        assert!(matches!(cli.command, Command::Vscript(ref args) if args.private));
    }

    #[test]
    fn parses_normalize_without_input() {
        let cli = Cli::parse_from(["abiguard", "normalize"]);
        assert!(matches!(cli.command, Command::Normalize { input: None }));
    }

    #[test]
    fn check_requires_dump() {
        assert!(Cli::try_parse_from(["abiguard", "check", "libfoo"]).is_err());
    }
}
