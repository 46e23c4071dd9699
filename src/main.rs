//! Binary entrypoint for the `retask` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Pipeline runners hand configuration down via the environment; a
    // local .env file stands in for that during development.
    dotenvy::dotenv().ok();

    // Logs go to stderr: stdout carries the step output when no output
    // file is configured.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "retask=info".into()))
        .with_writer(std::io::stderr)
        .init();

    match retask::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
