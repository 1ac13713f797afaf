//! Driver backend abstraction.

use super::{AdapterIdentity, AdapterName, TypeTag};
use crate::native::NativeCode;

/// Result of a successful native adapter creation.
#[derive(Debug)]
pub struct CreatedAdapter<H> {
    /// Native handle, owned by the caller from now on.
    pub handle: H,
    /// Identity tag the driver actually allocated.
    pub allocated: TypeTag,
}

/// Native virtual-adapter driver.
///
/// # Design
///
/// - The driver is loaded once at startup and injected into
///   [`AdapterManager`](super::AdapterManager), never located implicitly
/// - Enables substituting a fake driver in tests
/// - Implementations report failures as raw [`NativeCode`]s; the manager
///   turns them into typed errors
///
/// # Thread Safety
///
/// Different handles may be used from different threads. A single handle is
/// never used concurrently; the manager's ownership model guarantees it.
pub trait DriverBackend: Send + Sync {
    /// Native adapter handle type.
    type Handle: Send;

    /// Creates an adapter.
    ///
    /// # Errors
    ///
    /// Returns the driver's native error code if creation fails. No handle
    /// may be leaked on failure.
    fn create_adapter(
        &self,
        name: &AdapterName,
        tunnel_type: TypeTag,
        requested: Option<TypeTag>,
    ) -> Result<CreatedAdapter<Self::Handle>, NativeCode>;

    /// Closes an adapter, consuming its handle.
    ///
    /// # Errors
    ///
    /// Returns the native error code if the driver reports a failure. The
    /// handle is gone either way.
    fn close_adapter(&self, handle: Self::Handle) -> Result<(), NativeCode>;

    /// Queries the interface LUID of a live adapter.
    ///
    /// # Errors
    ///
    /// Returns the native error code if the query fails.
    fn adapter_luid(&self, handle: &Self::Handle) -> Result<AdapterIdentity, NativeCode>;
}
