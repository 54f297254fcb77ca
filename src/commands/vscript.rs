//! `abiguard vscript` command.

use log::info;

use crate::cli::VscriptArgs;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::pattern::PatternList;
use crate::store::{self, BaselineStore};
use crate::symmap::SymbolVersionMap;
use crate::version::{DottedVersion, SymbolicTag};
use crate::vscript::{seed_patterns, VersionScriptGenerator};

/// Execute the `vscript` command.
///
/// Builds the symbol map from every historical baseline of the library and
/// writes the rendered version script to `--output` in one write. Without
/// explicit or configured patterns every symbol is exported, unless a seed
/// script provides the lists.
///
/// # Errors
///
/// Returns an error string if the current version is unknown, a baseline or
/// the seed cannot be read, the seed is malformed, or the output cannot be
/// written.
pub fn run(ctx: &ServiceContext, config: &Config, args: &VscriptArgs) -> Result<(), String> {
    let library = config.library(&args.library);

    let version = args
        .version
        .clone()
        .or_else(|| library.version.clone())
        .or_else(|| library.vnum.as_ref().map(|vnum| format!("{}-{vnum}", args.library)))
        .ok_or_else(|| {
            format!("no version for {}: pass --version or set version or vnum", args.library)
        })?;
    let current = SymbolicTag::transform(&version);

    let default_patterns: &[&str] = if args.seed.is_some() { &[] } else { &["*"] };
    let mut patterns = if args.patterns.is_empty() {
        library.patterns_or(default_patterns)
    } else {
        PatternList::parse(&args.patterns)
    };
    if let Some(seed) = &args.seed {
        let text = store::read(ctx, seed).map_err(|e| e.to_string())?;
        seed_patterns(&text, &mut patterns).map_err(|e| format!("{}: {e}", seed.display()))?;
    }

    let history = match args.abi_dir.as_ref().or(config.abi_directory.as_ref()) {
        Some(dir) => {
            BaselineStore::new(ctx, dir).history(&args.library).map_err(|e| e.to_string())?
        }
        None => Vec::new(),
    };
    let releases: Vec<DottedVersion> = history.iter().map(|(release, _)| release.clone()).collect();
    let symbols = SymbolVersionMap::build(history.iter().map(|(release, set)| (release, set)));

    let script = VersionScriptGenerator::new(&args.library, current)
        .private(args.private || library.private)
        .generate(&releases, &symbols, &patterns);
    store::write(ctx, &args.output, &script).map_err(|e| e.to_string())?;

    info!("{}: {} releases, {} symbols", args.library, releases.len(), symbols.len());
    println!("Version script written to {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::context::testing::{context, MemFs};

    fn args(library: &str) -> VscriptArgs {
        VscriptArgs {
            library: library.to_string(),
            output: PathBuf::from("/out/lib.vscript"),
            version: None,
            abi_dir: Some(PathBuf::from("/abi")),
            seed: None,
            patterns: vec![],
            private: false,
        }
    }

    fn output(ctx: &ServiceContext) -> String {
        ctx.fs.read_to_string(Path::new("/out/lib.vscript")).unwrap()
    }

    #[test]
    fn builds_history_from_baselines() {
        let ctx = context(MemFs::with_files(&[
            ("/abi/libfoo-1.0.sigs", "a: int (void)\n"),
            ("/abi/libfoo-1.1.sigs", "a: int (void)\nb: int (void)\n"),
        ]));
        let mut args = args("libfoo");
        args.version = Some("libfoo-2.0".to_string());
        args.patterns = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        run(&ctx, &Config::default(), &args).unwrap();

        let script = output(&ctx);
        assert!(script.starts_with("LIBFOO_1.0 {\n\tglobal:\n\t\ta;\n};\n\n"));
        assert!(script.contains("LIBFOO_1.1 {\n\tglobal:\n\t\tb;\n} LIBFOO_1.0;\n"));
        assert!(script.contains("LIBFOO_2.0 {\n\tglobal:\n\t\ta;\n\t\tb;\n\t\tc;\n\tlocal:"));
    }

    #[test]
    fn version_defaults_from_configured_vnum() {
        let ctx = context(MemFs::default());
        let config = Config::parse("libraries:\n  ldb:\n    vnum: 2.9.0\n").unwrap();
        run(&ctx, &config, &args("ldb")).unwrap();
        let script = output(&ctx);
        assert!(script.starts_with("LDB_2.9.0 {\n\tglobal:\n\t\t*;\n\tlocal:"));
    }

    #[test]
    fn missing_version_is_an_error() {
        let ctx = context(MemFs::default());
        assert!(run(&ctx, &Config::default(), &args("ldb")).is_err());
    }

    #[test]
    fn private_mode_with_seed() {
        let ctx = context(MemFs::with_files(&[
            ("/abi/libpriv-0.1.sigs", "x: int (void)\n"),
            ("/seed.map", "PRIV {\n\tglobal:\n\t\tpriv_open;\n\tlocal:\n\t\tpriv_hidden;\n\t\t*;\n};\n"),
        ]));
        let mut args = args("libpriv");
        args.version = Some("samba4-private".to_string());
        args.seed = Some(PathBuf::from("/seed.map"));
        args.private = true;

        run(&ctx, &Config::default(), &args).unwrap();

        assert_eq!(
            output(&ctx),
            "SAMBA4_PRIVATE {\n\tglobal:\n\t\tpriv_open;\n\t\tx;\n\tlocal:\n\t\tpriv_hidden;\n\
             \t\t_end;\n\t\t__bss_start;\n\t\t_edata;\n\t\t*;\n};\n"
        );
    }

    #[test]
    fn malformed_seed_is_reported() {
        let ctx = context(MemFs::with_files(&[("/seed.map", "A {\n a;\n")]));
        let mut args = args("libfoo");
        args.version = Some("libfoo-1".to_string());
        args.seed = Some(PathBuf::from("/seed.map"));
        let err = run(&ctx, &Config::default(), &args).unwrap_err();
        assert!(err.contains("malformed version script"));
    }
}
