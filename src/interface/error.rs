//! Error types for the interface configurator.

use std::fmt;

use thiserror::Error;

use crate::native::{NativeCode, Operation};

/// Step of [`InterfaceConfigurator::apply`](super::InterfaceConfigurator::apply)
/// that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Reading the current record.
    Fetch,
    /// Writing the mutated record back.
    Write,
}

impl ConfigOrigin {
    /// The native call behind this step.
    #[must_use]
    pub const fn operation(self) -> Operation {
        match self {
            Self::Fetch => Operation::GetInterfaceEntry,
            Self::Write => Operation::SetInterfaceEntry,
        }
    }
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Applying interface configuration failed.
///
/// Whatever the variant, the OS record is unchanged: validation runs before
/// the write, and the write is atomic.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The OS rejected the fetch or the write-back.
    #[error("Interface {origin} failed ({}): {code}", origin.operation())]
    Native {
        /// Which step failed
        origin: ConfigOrigin,
        /// OS status code
        code: NativeCode,
    },

    /// The requested MTU is outside what the interface accepts.
    #[error("MTU {mtu} out of range, must be within {min}..={max}")]
    InvalidMtu {
        /// Rejected value
        mtu: u32,
        /// Smallest accepted value
        min: u32,
        /// Largest accepted value
        max: u32,
    },

    /// The mutation changed the record's key, which would retarget the write.
    #[error("Mutation changed the interface key field '{field}'")]
    KeyChanged {
        /// Name of the changed key field
        field: &'static str,
    },
}

impl ConfigError {
    /// Returns the failing step for native failures.
    #[must_use]
    pub const fn origin(&self) -> Option<ConfigOrigin> {
        match self {
            Self::Native { origin, .. } => Some(*origin),
            Self::InvalidMtu { .. } | Self::KeyChanged { .. } => None,
        }
    }

    /// Returns the native code associated with the failure.
    ///
    /// Validation failures map to `ERROR_INVALID_PARAMETER`.
    #[must_use]
    pub const fn native_code(&self) -> NativeCode {
        match self {
            Self::Native { code, .. } => *code,
            Self::InvalidMtu { .. } | Self::KeyChanged { .. } => NativeCode::INVALID_PARAMETER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_error_names_step_and_call() {
        let error = ConfigError::Native {
            origin: ConfigOrigin::Write,
            code: NativeCode::INVALID_PARAMETER,
        };

        let message = error.to_string();
        assert!(message.contains("write"));
        assert!(message.contains("SetIpInterfaceEntry"));
        assert!(message.contains("87"));
        assert_eq!(error.origin(), Some(ConfigOrigin::Write));
    }

    #[test]
    fn fetch_and_write_are_distinguishable() {
        let fetch = ConfigError::Native {
            origin: ConfigOrigin::Fetch,
            code: NativeCode::NOT_FOUND,
        };
        let write = ConfigError::Native {
            origin: ConfigOrigin::Write,
            code: NativeCode::NOT_FOUND,
        };

        assert_ne!(fetch.origin(), write.origin());
        assert_ne!(fetch.to_string(), write.to_string());
    }

    #[test]
    fn invalid_mtu_displays_bounds() {
        let error = ConfigError::InvalidMtu {
            mtu: 0,
            min: 68,
            max: 65_535,
        };
        assert_eq!(
            error.to_string(),
            "MTU 0 out of range, must be within 68..=65535"
        );
        assert_eq!(error.origin(), None);
        assert_eq!(error.native_code(), NativeCode::INVALID_PARAMETER);
    }
}
