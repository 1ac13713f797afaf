//! Native status codes and the operations that produce them.
//!
//! Every call into the driver or the OS configuration API reports failure
//! through a [`NativeCode`]. Errors carry the code together with the
//! [`Operation`] that returned it so a failure can always be traced back
//! to a single native call.

use std::fmt;

use serde::Serialize;

/// A Win32-style status code returned by a driver or OS call.
///
/// Zero means success in the underlying APIs, so a `NativeCode` held in an
/// error is expected to be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NativeCode(pub u32);

impl NativeCode {
    /// `ERROR_INVALID_HANDLE`
    pub const INVALID_HANDLE: Self = Self(6);
    /// `ERROR_INVALID_PARAMETER`
    pub const INVALID_PARAMETER: Self = Self(87);
    /// `ERROR_ALREADY_EXISTS`
    pub const ALREADY_EXISTS: Self = Self(183);
    /// `ERROR_NOT_FOUND`
    pub const NOT_FOUND: Self = Self(1168);

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Captures the calling thread's last OS error.
    ///
    /// Falls back to [`NativeCode::INVALID_HANDLE`] when the OS reports no
    /// error, since the callers only ask after a native call signalled failure.
    #[must_use]
    #[allow(clippy::cast_sign_loss)] // Win32 error codes are DWORDs
    pub fn last_os_error() -> Self {
        match std::io::Error::last_os_error().raw_os_error() {
            Some(code) if code != 0 => Self(code as u32),
            _ => Self::INVALID_HANDLE,
        }
    }
}

impl fmt::Display for NativeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native error {} (0x{:08X})", self.0, self.0)
    }
}

impl From<u32> for NativeCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// The native call an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    /// Driver: create a new adapter.
    CreateAdapter,
    /// Driver: close (and delete) an adapter.
    CloseAdapter,
    /// Driver: query the adapter's interface LUID.
    GetAdapterLuid,
    /// OS: read an IP interface record.
    GetInterfaceEntry,
    /// OS: write an IP interface record.
    SetInterfaceEntry,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateAdapter => "WintunCreateAdapter",
            Self::CloseAdapter => "WintunCloseAdapter",
            Self::GetAdapterLuid => "WintunGetAdapterLUID",
            Self::GetInterfaceEntry => "GetIpInterfaceEntry",
            Self::SetInterfaceEntry => "SetIpInterfaceEntry",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_decimal_and_hex() {
        let code = NativeCode(1168);
        assert_eq!(code.to_string(), "native error 1168 (0x00000490)");
    }

    #[test]
    fn from_u32_wraps_value() {
        let code: NativeCode = 87.into();
        assert_eq!(code, NativeCode::INVALID_PARAMETER);
        assert_eq!(code.get(), 87);
    }

    #[test]
    fn operation_display_names_native_call() {
        assert_eq!(Operation::CreateAdapter.to_string(), "WintunCreateAdapter");
        assert_eq!(
            Operation::SetInterfaceEntry.to_string(),
            "SetIpInterfaceEntry"
        );
    }
}
