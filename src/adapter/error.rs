//! Error types for the adapter handle manager.

use thiserror::Error;

use super::NameError;
use crate::native::{NativeCode, Operation};

/// Adapter creation was rejected.
///
/// No handle exists when this error is returned.
#[derive(Debug, Error)]
pub enum CreationError {
    /// The name failed validation; the driver was not called.
    #[error("Invalid adapter name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        #[source]
        reason: NameError,
    },

    /// The driver refused to create the adapter.
    #[error("{} failed for adapter '{name}': {code}", Operation::CreateAdapter)]
    Driver {
        /// The requested adapter name
        name: String,
        /// Native error reported by the driver
        code: NativeCode,
    },
}

impl CreationError {
    /// Returns the native code associated with the failure.
    ///
    /// Name validation failures map to `ERROR_INVALID_PARAMETER`.
    #[must_use]
    pub const fn native_code(&self) -> NativeCode {
        match self {
            Self::InvalidName { .. } => NativeCode::INVALID_PARAMETER,
            Self::Driver { code, .. } => *code,
        }
    }
}

/// An identity or property lookup failed.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The handle has already been released.
    #[error("Adapter handle has been released")]
    Released,

    /// A native query call failed.
    #[error("{operation} failed: {code}")]
    Native {
        /// The native call that failed
        operation: Operation,
        /// Native error code
        code: NativeCode,
    },
}

impl QueryError {
    /// Returns the native code associated with the failure.
    ///
    /// A released handle maps to `ERROR_INVALID_HANDLE`.
    #[must_use]
    pub const fn native_code(&self) -> NativeCode {
        match self {
            Self::Released => NativeCode::INVALID_HANDLE,
            Self::Native { code, .. } => *code,
        }
    }
}

/// Releasing an adapter failed.
///
/// The handle is considered released regardless; the native handle is
/// never closed twice.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// The driver reported a failure while closing the adapter.
    #[error("{} failed: {code}", Operation::CloseAdapter)]
    Native {
        /// Native error code
        code: NativeCode,
    },
}

impl ReleaseError {
    /// Returns the native code associated with the failure.
    #[must_use]
    pub const fn native_code(&self) -> NativeCode {
        match self {
            Self::Native { code } => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn invalid_name_maps_to_invalid_parameter() {
        let error = CreationError::InvalidName {
            name: String::new(),
            reason: NameError::Empty,
        };

        assert_eq!(error.native_code(), NativeCode::INVALID_PARAMETER);
        assert!(error.to_string().contains("must not be empty"));
        assert!(error.source().is_some());
    }

    #[test]
    fn driver_error_names_operation_and_code() {
        let error = CreationError::Driver {
            name: "tun0".to_string(),
            code: NativeCode::ALREADY_EXISTS,
        };

        let message = error.to_string();
        assert!(message.contains("WintunCreateAdapter"));
        assert!(message.contains("tun0"));
        assert!(message.contains("183"));
        assert_eq!(error.native_code(), NativeCode::ALREADY_EXISTS);
    }

    #[test]
    fn released_query_maps_to_invalid_handle() {
        assert_eq!(
            QueryError::Released.native_code(),
            NativeCode::INVALID_HANDLE
        );
    }

    #[test]
    fn native_query_displays_operation() {
        let error = QueryError::Native {
            operation: Operation::GetAdapterLuid,
            code: NativeCode::INVALID_HANDLE,
        };
        assert!(error.to_string().starts_with("WintunGetAdapterLUID failed"));
    }

    #[test]
    fn release_error_displays_code() {
        let error = ReleaseError::Native {
            code: NativeCode(5),
        };
        assert!(error.to_string().contains("WintunCloseAdapter failed"));
        assert_eq!(error.native_code(), NativeCode(5));
    }
}
