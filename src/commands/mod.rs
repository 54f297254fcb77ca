//! Command dispatch and handlers.

pub mod check;
pub mod normalize;
pub mod vscript;

use std::io::Read;
use std::path::Path;

use crate::cli::{Cli, Command};
use crate::config::{self, Config};
use crate::context::ServiceContext;
use crate::store;

/// Dispatch a parsed command to its handler using live adapters.
///
/// # Errors
///
/// Returns an error string if the configuration cannot be loaded or the
/// selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let ctx = ServiceContext::live();
    dispatch_with_context(cli, &ctx)
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext) -> Result<(), String> {
    let config = Config::load(ctx, cli.config.as_deref()).map_err(|e| e.to_string())?;
    match &cli.command {
        Command::Check(args) => check::run(ctx, &config, args, config::options_from_env()),
        Command::Vscript(args) => vscript::run(ctx, &config, args),
        Command::Normalize { input } => normalize::run(ctx, input.as_deref()),
    }
}

/// Reads `path`, or standard input for `-` and `None`.
fn read_input(ctx: &ServiceContext, path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) if path != Path::new("-") => {
            store::read(ctx, path).map_err(|e| e.to_string())
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("failed to read standard input: {e}"))?;
            Ok(text)
        }
    }
}
