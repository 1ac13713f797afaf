//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::adapter::{NameError, ParseTagError};

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Invalid adapter name.
    #[error("Invalid adapter name '{name}': {source}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        #[source]
        source: NameError,
    },

    /// Invalid GUID value.
    #[error("Invalid GUID for {field}: {source}")]
    InvalidGuid {
        /// Name of the field
        field: &'static str,
        /// Parse error
        #[source]
        source: ParseTagError,
    },

    /// Invalid address family value.
    #[error("Invalid address family '{value}': expected ipv4 or ipv6")]
    InvalidFamily {
        /// The invalid value provided
        value: String,
    },

    /// MTU outside what the address family allows.
    #[error("Invalid MTU {mtu}: must be within {min}..={max}")]
    InvalidMtu {
        /// Rejected value
        mtu: u32,
        /// Smallest accepted value
        min: u32,
        /// Largest accepted value
        max: u32,
    },
}

/// Well-known field names for `MissingRequired` and `InvalidGuid` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The adapter name field.
    pub const NAME: &str = "name";
    /// The tunnel type field.
    pub const TUNNEL_TYPE: &str = "tunnel_type";
    /// The requested GUID field.
    pub const GUID: &str = "guid";
}

impl SettingsError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
