//! Adapter handle manager: creation, identity query and guaranteed release.

use std::fmt;
use std::sync::Arc;

use super::driver::{CreatedAdapter, DriverBackend};
use super::{
    AdapterIdentity, AdapterName, CreationError, CreationRequest, QueryError, ReleaseError,
    TypeTag,
};
use crate::native::Operation;

/// Lifecycle state of an [`AdapterHandle`].
///
/// A handle only comes into existence through a successful
/// [`AdapterManager::create`], so the uninitialized state has no value of
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// The native adapter exists and the handle owns it.
    Created,
    /// The native adapter has been closed. Terminal.
    Released,
}

/// Creates and releases adapters through an injected [`DriverBackend`].
///
/// # Example
///
/// ```ignore
/// let manager = AdapterManager::new(driver);
/// let mut handle = manager.create(&CreationRequest::new("tun0", tunnel_type))?;
/// let identity = manager.identity(&handle)?;
/// // ... configure via InterfaceConfigurator ...
/// manager.release(&mut handle)?;
/// ```
pub struct AdapterManager<D: DriverBackend> {
    driver: Arc<D>,
}

impl<D: DriverBackend> AdapterManager<D> {
    /// Creates a manager owning the given driver.
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self::from_shared(Arc::new(driver))
    }

    /// Creates a manager sharing an already loaded driver.
    #[must_use]
    pub const fn from_shared(driver: Arc<D>) -> Self {
        Self { driver }
    }

    /// Returns the underlying driver.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Creates an adapter.
    ///
    /// The name is validated before the driver is called. On success the
    /// returned handle exclusively owns the adapter and will release it on
    /// drop if [`release`](Self::release) is never called.
    ///
    /// # Errors
    ///
    /// - [`CreationError::InvalidName`] if the name is rejected locally
    /// - [`CreationError::Driver`] if the driver refuses the request
    pub fn create(&self, request: &CreationRequest) -> Result<AdapterHandle<D>, CreationError> {
        let name =
            AdapterName::new(request.name.as_str()).map_err(|reason| CreationError::InvalidName {
                name: request.name.clone(),
                reason,
            })?;

        tracing::debug!(
            adapter = %name,
            tunnel_type = %request.tunnel_type,
            requested = ?request.requested.map(|t| t.to_string()),
            "Creating adapter"
        );

        let CreatedAdapter { handle, allocated } = self
            .driver
            .create_adapter(&name, request.tunnel_type, request.requested)
            .map_err(|code| CreationError::Driver {
                name: request.name.clone(),
                code,
            })?;

        if let Some(requested) = request.requested {
            if requested != allocated {
                tracing::debug!(
                    adapter = %name,
                    %requested,
                    %allocated,
                    "Driver allocated a different identity than requested"
                );
            }
        }

        tracing::info!(adapter = %name, guid = %allocated, "Adapter created");

        Ok(AdapterHandle {
            driver: Arc::clone(&self.driver),
            raw: Some(handle),
            name,
            allocated,
        })
    }

    /// Returns the stable identity of a live adapter.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Released`] if the handle has been released
    /// - [`QueryError::Native`] if the driver query fails
    pub fn identity(&self, handle: &AdapterHandle<D>) -> Result<AdapterIdentity, QueryError> {
        handle.identity()
    }

    /// Releases an adapter.
    ///
    /// Idempotent: releasing an already released handle succeeds without
    /// touching the driver.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError`] if the driver reports a failure while
    /// closing. The handle is marked released either way.
    pub fn release(&self, handle: &mut AdapterHandle<D>) -> Result<(), ReleaseError> {
        handle.release()
    }
}

impl<D: DriverBackend> Clone for AdapterManager<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
        }
    }
}

impl<D: DriverBackend> fmt::Debug for AdapterManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterManager").finish_non_exhaustive()
    }
}

/// Exclusively owned handle to a created adapter.
///
/// Dropping a handle that is still [`HandleState::Created`] releases the
/// adapter; a failure at that point can only be logged.
///
/// # Thread Safety
///
/// The handle is `Send` when the driver's handle is, so it can move between
/// threads, but it has a single owner at a time. Sharing one adapter
/// between threads needs external synchronization, e.g. a `Mutex`.
pub struct AdapterHandle<D: DriverBackend> {
    driver: Arc<D>,
    raw: Option<D::Handle>,
    name: AdapterName,
    allocated: TypeTag,
}

impl<D: DriverBackend> AdapterHandle<D> {
    /// Returns the adapter's name.
    #[must_use]
    pub const fn name(&self) -> &AdapterName {
        &self.name
    }

    /// Returns the identity tag the driver allocated.
    #[must_use]
    pub const fn allocated(&self) -> TypeTag {
        self.allocated
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> HandleState {
        if self.raw.is_some() {
            HandleState::Created
        } else {
            HandleState::Released
        }
    }

    /// Returns true once the adapter has been released.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.raw.is_none()
    }

    /// Returns the stable identity of the adapter.
    ///
    /// # Errors
    ///
    /// See [`AdapterManager::identity`].
    pub fn identity(&self) -> Result<AdapterIdentity, QueryError> {
        let raw = self.raw.as_ref().ok_or(QueryError::Released)?;

        self.driver
            .adapter_luid(raw)
            .map_err(|code| QueryError::Native {
                operation: Operation::GetAdapterLuid,
                code,
            })
    }

    /// Releases the adapter.
    ///
    /// # Errors
    ///
    /// See [`AdapterManager::release`].
    pub fn release(&mut self) -> Result<(), ReleaseError> {
        let Some(raw) = self.raw.take() else {
            tracing::trace!(adapter = %self.name, "Adapter already released");
            return Ok(());
        };

        match self.driver.close_adapter(raw) {
            Ok(()) => {
                tracing::info!(adapter = %self.name, "Adapter released");
                Ok(())
            }
            Err(code) => Err(ReleaseError::Native { code }),
        }
    }
}

impl<D: DriverBackend> Drop for AdapterHandle<D> {
    fn drop(&mut self) {
        if self.raw.is_none() {
            return;
        }

        tracing::debug!(adapter = %self.name, "Releasing adapter on drop");
        if let Err(e) = self.release() {
            tracing::warn!(adapter = %self.name, "Failed to release adapter on drop: {e}");
        }
    }
}

impl<D: DriverBackend> fmt::Debug for AdapterHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterHandle")
            .field("name", &self.name)
            .field("allocated", &self.allocated)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
