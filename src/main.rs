//! Binary entrypoint for the `abiguard` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Control flags such as ABIGUARD_ABI_UPDATE may come from a .env file.
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match abiguard::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
