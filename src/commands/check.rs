//! `abiguard check` command.

use crate::check::{run_check, CheckOptions, CheckOutcome, CheckReport, CheckRequest};
use crate::cli::CheckArgs;
use crate::compare::format_findings;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::AbiError;
use crate::pattern::PatternList;

/// Execute the `check` command.
///
/// The baseline comes from `--sigs` or the configured ABI directory, and the
/// patterns from `--match` or the library's configured `abi_match`. Control
/// flags are the union of CLI flags, the environment-derived `env` flags and
/// configuration.
///
/// # Errors
///
/// Returns an error string listing every finding when the ABI changed, or
/// describing the I/O or configuration failure.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    args: &CheckArgs,
    env: CheckOptions,
) -> Result<(), String> {
    let baseline = args
        .sigs
        .clone()
        .or_else(|| config.baseline_path(&args.library))
        .ok_or_else(|| {
            format!(
                "no baseline for {}: pass --sigs or set abi_directory and vnum in the configuration",
                args.library
            )
        })?;

    let patterns = if args.patterns.is_empty() {
        config.library(&args.library).patterns_or(&[])
    } else {
        PatternList::parse(&args.patterns)
    };

    let options = CheckOptions {
        update: args.update || env.update,
        disabled: args.disable || env.disabled || config.check_disabled,
        force: args.force || env.force,
    };

    // A disabled check never looks at the dump.
    let dump =
        if options.disabled { String::new() } else { super::read_input(ctx, Some(&args.dump))? };
    let request = CheckRequest {
        library: &args.library,
        dump: &dump,
        baseline: &baseline,
        patterns: &patterns,
    };
    let result = run_check(ctx, &request, options);

    if args.json {
        let report = CheckReport::from_result(&args.library, ctx.clock.now(), &result);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to serialize report: {e}"))?;
        println!("{json}");
    } else if let Ok(outcome) = &result {
        println!("{}", describe(&args.library, outcome));
    }

    match result {
        Ok(_) => Ok(()),
        Err(err) => match &err {
            AbiError::AbiChanged { library, findings } => {
                Err(format!("{}\n{err}", format_findings(library, findings)))
            }
            _ => Err(err.to_string()),
        },
    }
}

fn describe(library: &str, outcome: &CheckOutcome) -> String {
    match outcome {
        CheckOutcome::Skipped => format!("{library}: ABI check disabled"),
        CheckOutcome::UpToDate => format!("{library}: ABI unchanged since last check"),
        CheckOutcome::BaselineGenerated { path, symbols } => {
            format!("Generated ABI signatures {} ({symbols} symbols)", path.display())
        }
        CheckOutcome::Passed { symbols } => {
            format!("{library}: ABI matches the baseline ({symbols} symbols)")
        }
    }
}
