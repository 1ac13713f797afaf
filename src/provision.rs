//! Stage-by-stage adapter provisioning.
//!
//! Composes the [`AdapterManager`] and the [`InterfaceConfigurator`] into
//! the create → identify → configure workflow, reporting which stage
//! failed. Unlike the two core components, the provisioner tears the
//! adapter down itself when a later stage fails.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::adapter::{
    AdapterHandle, AdapterIdentity, AdapterManager, CreationError, CreationRequest,
    DriverBackend, QueryError, ReleaseError, TypeTag,
};
use crate::interface::{
    ConfigError, InterfaceConfigurator, InterfaceProperties, InterfaceSettings, InterfaceTable,
};
use crate::native::NativeCode;

#[cfg(test)]
#[path = "provision_tests.rs"]
mod tests;

/// A step of the provisioning workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Creating the adapter.
    Create,
    /// Querying the adapter's interface identity.
    Identify,
    /// Reading and writing the interface record.
    Configure,
    /// Closing the adapter.
    Release,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Identify => write!(f, "identify"),
            Self::Configure => write!(f, "configure"),
            Self::Release => write!(f, "release"),
        }
    }
}

/// The underlying failure of a stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Creation(#[from] CreationError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Release(#[from] ReleaseError),
}

impl StageError {
    /// Returns the native code behind the failure.
    #[must_use]
    pub const fn native_code(&self) -> NativeCode {
        match self {
            Self::Creation(e) => e.native_code(),
            Self::Query(e) => e.native_code(),
            Self::Config(e) => e.native_code(),
            Self::Release(e) => e.native_code(),
        }
    }
}

/// Provisioning failed.
///
/// When a stage after [`Stage::Create`] fails, the adapter has already
/// been released. If that release failed too, `teardown` carries its error.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}{}", teardown_note(.teardown.as_ref()))]
pub struct ProvisionError {
    /// The stage that failed
    pub stage: Stage,
    /// Why it failed
    #[source]
    pub source: StageError,
    /// Release failure during teardown, if any
    pub teardown: Option<ReleaseError>,
}

impl ProvisionError {
    fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
            teardown: None,
        }
    }

    /// Returns the native code of the failed stage.
    #[must_use]
    pub const fn native_code(&self) -> NativeCode {
        self.source.native_code()
    }
}

fn teardown_note(teardown: Option<&ReleaseError>) -> String {
    teardown.map_or_else(String::new, |e| format!(" (teardown also failed: {e})"))
}

/// A created and configured adapter.
///
/// Owns the handle; dropping it releases the adapter.
pub struct Provisioned<D: DriverBackend> {
    handle: AdapterHandle<D>,
    identity: AdapterIdentity,
    properties: InterfaceProperties,
}

impl<D: DriverBackend> Provisioned<D> {
    /// Returns the adapter handle.
    #[must_use]
    pub const fn handle(&self) -> &AdapterHandle<D> {
        &self.handle
    }

    /// Returns the interface identity.
    #[must_use]
    pub const fn identity(&self) -> AdapterIdentity {
        self.identity
    }

    /// Returns the interface record as last written or read.
    #[must_use]
    pub const fn properties(&self) -> &InterfaceProperties {
        &self.properties
    }

    /// Builds a serializable summary.
    #[must_use]
    pub fn report(&self) -> ProvisionReport {
        ProvisionReport {
            name: self.handle.name().as_str().to_owned(),
            guid: self.handle.allocated(),
            identity: self.identity,
            net_luid_index: self.identity.net_luid_index(),
            if_type: self.identity.if_type(),
            properties: self.properties.clone(),
        }
    }
}

impl<D: DriverBackend> fmt::Debug for Provisioned<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provisioned")
            .field("handle", &self.handle)
            .field("identity", &self.identity)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Summary of a provisioned adapter, printed by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub name: String,
    pub guid: TypeTag,
    pub identity: AdapterIdentity,
    pub net_luid_index: u32,
    pub if_type: u16,
    pub properties: InterfaceProperties,
}

impl fmt::Display for ProvisionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Adapter:   {}", self.name)?;
        writeln!(f, "GUID:      {}", self.guid)?;
        writeln!(
            f,
            "LUID:      {} (index {}, type {})",
            self.identity, self.net_luid_index, self.if_type
        )?;
        writeln!(
            f,
            "Interface: {} index {}",
            self.properties.family, self.properties.interface_index
        )?;
        writeln!(f, "MTU:       {}", self.properties.mtu)?;
        write!(
            f,
            "Metric:    {}{}",
            self.properties.metric,
            if self.properties.use_automatic_metric {
                " (automatic)"
            } else {
                ""
            }
        )
    }
}

/// Runs the provisioning workflow.
///
/// # Example
///
/// ```ignore
/// let provisioner = Provisioner::new(manager, configurator);
/// let provisioned = provisioner.provision(&request, &InterfaceSettings::mtu(1280))?;
/// println!("{}", provisioned.report());
/// provisioner.teardown(provisioned)?;
/// ```
pub struct Provisioner<D: DriverBackend, T> {
    manager: AdapterManager<D>,
    configurator: InterfaceConfigurator<T>,
}

impl<D: DriverBackend, T: InterfaceTable> Provisioner<D, T> {
    /// Creates a provisioner from its two components.
    #[must_use]
    pub const fn new(manager: AdapterManager<D>, configurator: InterfaceConfigurator<T>) -> Self {
        Self {
            manager,
            configurator,
        }
    }

    /// Returns the adapter manager.
    #[must_use]
    pub const fn manager(&self) -> &AdapterManager<D> {
        &self.manager
    }

    /// Returns the interface configurator.
    #[must_use]
    pub const fn configurator(&self) -> &InterfaceConfigurator<T> {
        &self.configurator
    }

    /// Creates an adapter, resolves its identity and applies `settings`.
    ///
    /// With empty settings the interface record is only read, never written.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] naming the failed stage. For failures
    /// after creation the adapter is released before returning.
    pub fn provision(
        &self,
        request: &CreationRequest,
        settings: &InterfaceSettings,
    ) -> Result<Provisioned<D>, ProvisionError> {
        let mut handle = self
            .manager
            .create(request)
            .map_err(|e| ProvisionError::new(Stage::Create, e))?;

        let identity = match self.manager.identity(&handle) {
            Ok(identity) => identity,
            Err(e) => return Err(self.abort(&mut handle, Stage::Identify, e)),
        };
        tracing::debug!(adapter = %handle.name(), %identity, "Resolved interface identity");

        let configured = if settings.is_empty() {
            self.configurator.fetch(identity).map_err(StageError::from)
        } else {
            self.configurator
                .apply_settings(identity, settings)
                .map_err(StageError::from)
        };

        let properties = match configured {
            Ok(properties) => properties,
            Err(e) => return Err(self.abort(&mut handle, Stage::Configure, e)),
        };

        tracing::info!(
            adapter = %handle.name(),
            family = %properties.family,
            mtu = properties.mtu,
            "Adapter provisioned"
        );

        Ok(Provisioned {
            handle,
            identity,
            properties,
        })
    }

    /// Releases a provisioned adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] with [`Stage::Release`] if the close fails.
    /// The adapter is considered released either way.
    pub fn teardown(&self, provisioned: Provisioned<D>) -> Result<(), ProvisionError> {
        let mut handle = provisioned.handle;
        self.manager
            .release(&mut handle)
            .map_err(|e| ProvisionError::new(Stage::Release, e))
    }

    /// Releases `handle` after `stage` failed, folding any release
    /// failure into the returned error.
    fn abort(
        &self,
        handle: &mut AdapterHandle<D>,
        stage: Stage,
        source: impl Into<StageError>,
    ) -> ProvisionError {
        let mut error = ProvisionError::new(stage, source);
        tracing::debug!(adapter = %handle.name(), "Tearing down after {stage} failure");

        if let Err(e) = self.manager.release(handle) {
            tracing::warn!(adapter = %handle.name(), "Teardown failed: {e}");
            error.teardown = Some(e);
        }
        error
    }
}

impl<D: DriverBackend, T: InterfaceTable> fmt::Debug for Provisioner<D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provisioner")
            .field("manager", &self.manager)
            .field("family", &self.configurator.family())
            .finish_non_exhaustive()
    }
}
