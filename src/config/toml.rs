//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::SettingsError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Adapter creation section
    #[serde(default)]
    pub adapter: AdapterSection,

    /// Interface configuration section
    #[serde(default)]
    pub interface: InterfaceSection,

    /// Driver library section
    #[serde(default)]
    pub driver: DriverSection,

    /// Output section
    #[serde(default)]
    pub output: OutputSection,
}

/// Adapter creation section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterSection {
    /// Adapter name
    pub name: Option<String>,

    /// Tunnel type GUID
    pub tunnel_type: Option<String>,

    /// Requested adapter GUID
    pub guid: Option<String>,

    /// Keep the adapter up until Ctrl+C
    #[serde(default)]
    pub hold: bool,
}

/// Interface configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceSection {
    /// Address family: "ipv4" or "ipv6"
    pub family: Option<String>,

    /// MTU in bytes
    pub mtu: Option<u32>,

    /// Route metric
    pub metric: Option<u32>,
}

/// Driver library section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverSection {
    /// Path to wintun.dll
    pub library: Option<PathBuf>,
}

/// Output section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Print the result as JSON
    #[serde(default)]
    pub json: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        toml::from_str(content).map_err(SettingsError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# adapterctl configuration file

[adapter]
# Adapter name (required), at most 127 characters
# name = "MyVirtualAdapter"

# Tunnel type GUID (default: the adapterctl tunnel type)
# tunnel_type = "{5A1F6A3C-8E2B-4F1D-9C07-3B6D2E4A5F10}"

# Requested adapter GUID (generated when omitted)
# guid = "{00000000-0000-0000-0000-000000000000}"

# Keep the adapter up until Ctrl+C
# hold = false

[interface]
# Interface record to configure: "ipv4" or "ipv6" (default: ipv4)
# family = "ipv4"

# MTU in bytes (default: 1500)
# IPv4 accepts 68..=65535, IPv6 accepts 1280..=65535
mtu = 1500

# Route metric; setting it disables automatic metric selection
# metric = 25

[driver]
# Path to wintun.dll (default: "wintun.dll" via the DLL search path)
# library = "wintun/bin/amd64/wintun.dll"

[output]
# Print the result as JSON
# json = false
"#
    .to_string()
}
