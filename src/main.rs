//! `adapterctl` binary.
//!
//! Parses arguments, then either writes a config template (`init`) or
//! provisions one adapter and releases it before exiting.

use std::path::Path;
use std::process::ExitCode;

use adapterctl::config::{Cli, Command, ValidatedConfig, write_default_config};

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Excluded from coverage: only dispatches to tested code.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Some(Command::Init { output }) = &cli.command {
        return write_template(output);
    }

    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    provision(config)
}

/// `adapterctl init [-o FILE]`
fn write_template(output: &Path) -> ExitCode {
    if let Err(e) = write_default_config(output) {
        eprintln!("Error: {e}");
        return exit_code::CONFIG_ERROR;
    }
    println!("Wrote configuration template to {}", output.display());
    exit_code::SUCCESS
}

/// Runs [`run::execute`] on a fresh Tokio runtime and maps the outcome to
/// an exit status.
#[cfg(not(tarpaulin_include))]
fn provision(config: ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            exit_code::runtime_error()
        }
    }
}
