//! Wintun driver backend loaded from `wintun.dll` at runtime.

use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use libloading::Library;
use thiserror::Error;
use windows::core::GUID;

use crate::adapter::{AdapterIdentity, AdapterName, CreatedAdapter, DriverBackend, TypeTag};
use crate::native::NativeCode;

type CreateAdapterFn = unsafe extern "system" fn(
    name: *const u16,
    tunnel_type: *const u16,
    requested_guid: *const GUID,
) -> *mut c_void;
type CloseAdapterFn = unsafe extern "system" fn(adapter: *mut c_void);
type GetAdapterLuidFn = unsafe extern "system" fn(adapter: *mut c_void, luid: *mut u64);
type GetRunningDriverVersionFn = unsafe extern "system" fn() -> u32;

/// Error loading the driver library.
#[derive(Debug, Error)]
pub enum DriverLoadError {
    /// The DLL could not be loaded.
    #[error("Failed to load driver library '{}': {source}", path.display())]
    Library {
        /// Path that was tried
        path: PathBuf,
        /// Loader error
        #[source]
        source: libloading::Error,
    },

    /// The DLL does not export a required function.
    #[error("Driver library is missing symbol {name}: {source}")]
    Symbol {
        /// Missing export
        name: &'static str,
        /// Loader error
        #[source]
        source: libloading::Error,
    },
}

/// Native Wintun adapter handle.
#[derive(Debug)]
pub struct WintunHandle(NonNull<c_void>);

// SAFETY: the handle is an opaque token passed back to wintun.dll; it is never
// dereferenced on the Rust side, and the manager gives it a single owner.
unsafe impl Send for WintunHandle {}

/// [`DriverBackend`] backed by the Wintun driver.
///
/// # Example
///
/// ```no_run
/// use adapterctl::adapter::{AdapterManager, CreationRequest, TypeTag};
/// use adapterctl::adapter::platform::WintunDriver;
///
/// let driver = WintunDriver::load("wintun.dll").expect("wintun.dll not found");
/// let manager = AdapterManager::new(driver);
/// let tunnel_type: TypeTag = "{5A1F6A3C-8E2B-4F1D-9C07-3B6D2E4A5F10}".parse().unwrap();
/// let mut handle = manager
///     .create(&CreationRequest::new("MyVirtualAdapter", tunnel_type))
///     .expect("create failed");
/// manager.release(&mut handle).expect("release failed");
/// ```
pub struct WintunDriver {
    create: CreateAdapterFn,
    close: CloseAdapterFn,
    get_luid: GetAdapterLuidFn,
    running_version: GetRunningDriverVersionFn,
    // Declared last so the function pointers above never outlive it.
    _library: Library,
}

impl WintunDriver {
    /// Loads `wintun.dll` from `path` and resolves the functions used here.
    ///
    /// # Errors
    ///
    /// Returns [`DriverLoadError`] if the library cannot be loaded or lacks
    /// a required export.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DriverLoadError> {
        let path = path.as_ref();

        // SAFETY: wintun.dll's initialization routine only sets up internal state.
        let library = unsafe { Library::new(path) }.map_err(|source| DriverLoadError::Library {
            path: path.to_path_buf(),
            source,
        })?;

        // SAFETY: the signatures match wintun.h for driver API version 0.14.
        let driver = unsafe {
            Self {
                create: symbol(&library, "WintunCreateAdapter")?,
                close: symbol(&library, "WintunCloseAdapter")?,
                get_luid: symbol(&library, "WintunGetAdapterLUID")?,
                running_version: symbol(&library, "WintunGetRunningDriverVersion")?,
                _library: library,
            }
        };

        let path = path.display();
        match driver.running_version() {
            Some((major, minor)) => {
                tracing::debug!(%path, "Wintun driver {major}.{minor} running");
            }
            None => tracing::debug!(%path, "Wintun driver loaded, not yet running"),
        }

        Ok(driver)
    }

    /// Returns the `(major, minor)` version of the running driver, if any.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn running_version(&self) -> Option<(u16, u16)> {
        // SAFETY: takes no arguments; returns 0 when no driver is loaded.
        let version = unsafe { (self.running_version)() };
        if version == 0 {
            return None;
        }
        Some((((version >> 16) & 0xFF) as u16, (version & 0xFF) as u16))
    }
}

impl DriverBackend for WintunDriver {
    type Handle = WintunHandle;

    fn create_adapter(
        &self,
        name: &AdapterName,
        tunnel_type: TypeTag,
        requested: Option<TypeTag>,
    ) -> Result<CreatedAdapter<WintunHandle>, NativeCode> {
        // Always pass an explicit GUID so the allocated identity is known.
        let allocated = match requested {
            Some(tag) => tag,
            None => generate_tag()?,
        };
        let guid = GUID::from_u128(allocated.as_u128());
        let name_w = to_wide(name.as_str());
        let tunnel_w = to_wide(&tunnel_type.to_string());

        // SAFETY: both strings are NUL-terminated UTF-16 and outlive the call;
        // the GUID pointer refers to a live stack value.
        let raw = unsafe { (self.create)(name_w.as_ptr(), tunnel_w.as_ptr(), &raw const guid) };
        let handle = NonNull::new(raw).ok_or_else(NativeCode::last_os_error)?;

        Ok(CreatedAdapter {
            handle: WintunHandle(handle),
            allocated,
        })
    }

    fn close_adapter(&self, handle: WintunHandle) -> Result<(), NativeCode> {
        // SAFETY: the handle came from WintunCreateAdapter and is consumed here,
        // so it cannot be closed twice.
        unsafe { (self.close)(handle.0.as_ptr()) };
        Ok(())
    }

    fn adapter_luid(&self, handle: &WintunHandle) -> Result<AdapterIdentity, NativeCode> {
        let mut luid = 0u64;
        // SAFETY: the handle is live and `luid` is a valid NET_LUID-sized out pointer.
        unsafe { (self.get_luid)(handle.0.as_ptr(), &raw mut luid) };

        if luid == 0 {
            return Err(NativeCode::INVALID_HANDLE);
        }
        Ok(AdapterIdentity::from_luid(luid))
    }
}

/// Resolves an export and copies out the function pointer.
///
/// # Safety
///
/// `T` must match the export's real signature.
unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T, DriverLoadError> {
    // SAFETY: forwarded to the caller.
    unsafe { library.get::<T>(name.as_bytes()) }
        .map(|sym| *sym)
        .map_err(|source| DriverLoadError::Symbol { name, source })
}

#[allow(clippy::cast_sign_loss)] // HRESULT bit pattern
fn generate_tag() -> Result<TypeTag, NativeCode> {
    GUID::new()
        .map(|guid| TypeTag::from_u128(guid.to_u128()))
        .map_err(|e| NativeCode(e.code().0 as u32))
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
