//! Core library entry for the `retask` CLI.

pub mod adapters;
pub mod arn;
pub mod cli;
pub mod commands;
pub mod context;
pub mod deploy;
pub mod error;
pub mod output;
pub mod ports;
pub mod taskdef;

use clap::error::ErrorKind;
use clap::Parser;

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
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // Requested help or version text is a successful run, not an error.
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["retask", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_required_args() {
        let result = run(["retask", "deploy"]);
        assert!(result.is_err());
    }
}
