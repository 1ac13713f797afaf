//! Process-level helpers for the `adapterctl` binary: exit statuses,
//! log output and hints printed after a bad configuration.

use adapterctl::config::{SettingsError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Process exit statuses.
pub mod exit_code {
    use std::process::ExitCode;

    /// The adapter was provisioned and released, or `init` wrote its file.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Arguments or config file rejected before any driver call (status 1).
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Driver, OS or signal failure after startup (status 2).
    ///
    /// `ExitCode::from` is not `const`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

const INIT_HINT: &str = "\nRun 'adapterctl init' to write a commented adapterctl.toml.";

/// Follows a configuration error with a line on how to fix it, if one applies.
pub fn print_config_hint(error: &SettingsError) {
    let hint = match error {
        SettingsError::MissingRequired { field: f, .. } if *f == field::NAME => INIT_HINT,
        SettingsError::FileRead { .. } => INIT_HINT,
        SettingsError::InvalidGuid { .. } => {
            "\nGUIDs use the form {XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}."
        }
        _ => return,
    };
    eprintln!("{hint}");
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects DEBUG and the default is INFO.
/// Stdout is left for the report.
pub fn setup_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
