//! Core library entry for the `abiguard` CLI.
//!
//! `abiguard` records the exported ABI of a shared library as a baseline of
//! normalized signatures, fails the build when a later dump drifts from it,
//! and generates linker version scripts that tag every export with the
//! release it first appeared in.

pub mod adapters;
pub mod check;
pub mod cli;
pub mod commands;
pub mod compare;
pub mod config;
pub mod context;
pub mod error;
pub mod pattern;
pub mod ports;
pub mod signature;
pub mod store;
pub mod symmap;
pub mod version;
pub mod vscript;

use clap::Parser;

pub use error::AbiError;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["abiguard", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_dump() {
        let result = run([
            "abiguard",
            "check",
            "libfoo",
            "--dump",
            "/nonexistent/dump.txt",
            "--sigs",
            "/nonexistent/x.sigs",
        ]);
        assert!(result.is_err());
    }
}
