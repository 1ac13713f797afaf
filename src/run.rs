//! Application execution logic.
//!
//! This module provisions the configured adapter, reports the result,
//! optionally holds the adapter up until Ctrl+C and tears it down.

use std::future::Future;
use std::io;

use thiserror::Error;

use adapterctl::adapter::DriverBackend;
use adapterctl::config::ValidatedConfig;
use adapterctl::interface::InterfaceTable;
use adapterctl::provision::{ProvisionError, ProvisionReport, Provisioner};

#[cfg(windows)]
use adapterctl::adapter::AdapterManager;
#[cfg(windows)]
use adapterctl::adapter::platform::{DriverLoadError, PlatformDriver};
#[cfg(windows)]
use adapterctl::interface::InterfaceConfigurator;
#[cfg(windows)]
use adapterctl::interface::platform::PlatformTable;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to load the driver library.
    #[cfg(windows)]
    #[error("Failed to load driver: {0}")]
    DriverLoad(#[source] DriverLoadError),

    /// A provisioning stage failed.
    #[error("Provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    /// Failed to wait for the shutdown signal.
    #[error("Failed to wait for Ctrl+C: {0}")]
    Signal(#[source] io::Error),

    /// Failed to render the JSON report.
    #[error("Failed to serialize report: {0}")]
    Report(#[source] serde_json::Error),

    /// No driver backend exists for this platform.
    #[cfg(not(windows))]
    #[error("Virtual adapters are not supported on this platform")]
    UnsupportedPlatform,
}

/// Executes the application.
///
/// Loads the driver once, then hands over to [`provision_and_report`].
///
/// # Errors
///
/// Returns an error if:
/// - The driver library cannot be loaded
/// - Any provisioning stage fails
/// - Waiting for Ctrl+C fails while holding
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - The Wintun driver and administrator rights
/// - Real async runtime with signal handling
#[cfg(not(tarpaulin_include))]
#[cfg(windows)]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let driver = PlatformDriver::load(&config.library).map_err(RunError::DriverLoad)?;
    if let Some((major, minor)) = driver.running_version() {
        tracing::info!("Wintun driver {major}.{minor}");
    }

    let provisioner = Provisioner::new(
        AdapterManager::new(driver),
        InterfaceConfigurator::new(PlatformTable::new(), config.family),
    );

    provision_and_report(&provisioner, &config, shutdown_signal()).await
}

/// Non-Windows stub: there is no driver backend to load.
#[cfg(not(tarpaulin_include))]
#[cfg(not(windows))]
#[allow(clippy::unused_async)] // same signature on every platform
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    tracing::debug!(library = %config.library.display(), "No driver backend on this platform");
    Err(RunError::UnsupportedPlatform)
}

/// Provisions the adapter, prints the report and releases the adapter.
///
/// When `config.hold` is set, the adapter stays up until `shutdown`
/// completes. The adapter is released on every path.
#[cfg_attr(not(windows), allow(dead_code))]
async fn provision_and_report<D, T, S>(
    provisioner: &Provisioner<D, T>,
    config: &ValidatedConfig,
    shutdown: S,
) -> Result<(), RunError>
where
    D: DriverBackend,
    T: InterfaceTable,
    S: Future<Output = io::Result<()>>,
{
    let provisioned = provisioner.provision(&config.request, &config.settings)?;

    println!("{}", render_report(&provisioned.report(), config.json)?);

    if config.hold {
        tracing::info!("Adapter is up, press Ctrl+C to release it");
        // On error `provisioned` is dropped, which releases the adapter.
        shutdown.await.map_err(RunError::Signal)?;
        tracing::info!("Shutdown signal received, releasing adapter...");
    }

    provisioner.teardown(provisioned)?;
    Ok(())
}

/// Renders the report as text or pretty JSON.
#[cfg_attr(not(windows), allow(dead_code))]
fn render_report(report: &ProvisionReport, json: bool) -> Result<String, RunError> {
    if json {
        serde_json::to_string_pretty(report).map_err(RunError::Report)
    } else {
        Ok(report.to_string())
    }
}

/// Returns a future that completes when Ctrl+C is pressed.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
#[cfg(windows)]
async fn shutdown_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
