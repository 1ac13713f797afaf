//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::adapter::{AdapterName, CreationRequest, TypeTag};
use crate::interface::{AddressFamily, InterfaceSettings, MAX_IP_MTU};

use super::cli::Cli;
use super::defaults;
use super::error::{SettingsError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Adapter to create (name, tunnel type, requested GUID)
    pub request: CreationRequest,

    /// Interface record to configure
    pub family: AddressFamily,

    /// Interface settings to apply
    pub settings: InterfaceSettings,

    /// Path to the driver library
    pub library: PathBuf,

    /// Keep the adapter up until Ctrl+C
    pub hold: bool,

    /// Print the result as JSON
    pub json: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guid = self
            .request
            .requested
            .map_or_else(|| "generated".to_string(), |g| g.to_string());
        let mtu = self
            .settings
            .mtu
            .map_or_else(|| "unchanged".to_string(), |m| m.to_string());
        let metric = self
            .settings
            .metric
            .map_or_else(|| "automatic".to_string(), |m| m.to_string());

        write!(
            f,
            "Config {{ name: {}, tunnel_type: {}, guid: {}, family: {}, mtu: {}, metric: {}, \
             library: {}, hold: {} }}",
            self.request.name,
            self.request.tunnel_type,
            guid,
            self.family,
            mtu,
            metric,
            self.library.display(),
            self.hold,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The adapter name is missing or invalid
    /// - A GUID does not parse
    /// - The address family is unknown
    /// - The MTU is outside the family's range
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, SettingsError> {
        let name = Self::resolve_name(cli, toml)?;
        let tunnel_type = Self::resolve_tunnel_type(cli, toml)?;
        let requested = Self::resolve_guid(cli, toml)?;

        let mut request = CreationRequest::new(name, tunnel_type);
        if let Some(guid) = requested {
            request = request.with_requested(guid);
        }

        let family = Self::resolve_family(cli, toml)?;
        let settings = Self::resolve_settings(cli, toml, family)?;

        // Priority: CLI explicit > TOML > default
        let library = cli
            .library
            .clone()
            .or_else(|| toml.and_then(|t| t.driver.library.clone()))
            .unwrap_or_else(defaults::library);

        // Flags are OR-ed: either source can enable them
        let hold = cli.hold || toml.is_some_and(|t| t.adapter.hold);
        let json = cli.json || toml.is_some_and(|t| t.output.json);

        Ok(Self {
            request,
            family,
            settings,
            library,
            hold,
            json,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, SettingsError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_name(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, SettingsError> {
        // CLI takes precedence
        let name = cli
            .name
            .as_deref()
            .or_else(|| toml.and_then(|t| t.adapter.name.as_deref()))
            .ok_or_else(|| {
                SettingsError::missing(field::NAME, "Use --name or set adapter.name in config file")
            })?;

        AdapterName::new(name).map_err(|source| SettingsError::InvalidName {
            name: name.to_string(),
            source,
        })?;

        Ok(name.to_string())
    }

    fn resolve_tunnel_type(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<TypeTag, SettingsError> {
        cli.tunnel_type
            .as_deref()
            .or_else(|| toml.and_then(|t| t.adapter.tunnel_type.as_deref()))
            .map_or(Ok(defaults::TUNNEL_TYPE), |s| {
                parse_guid(field::TUNNEL_TYPE, s)
            })
    }

    fn resolve_guid(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<TypeTag>, SettingsError> {
        cli.guid
            .as_deref()
            .or_else(|| toml.and_then(|t| t.adapter.guid.as_deref()))
            .map(|s| parse_guid(field::GUID, s))
            .transpose()
    }

    fn resolve_family(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<AddressFamily, SettingsError> {
        // CLI takes precedence
        if let Some(family) = cli.family {
            return Ok(family.into());
        }

        // Fall back to TOML, then the default
        match toml.and_then(|t| t.interface.family.as_deref()) {
            Some(value) => parse_family(value),
            None => Ok(AddressFamily::default()),
        }
    }

    fn resolve_settings(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        family: AddressFamily,
    ) -> Result<InterfaceSettings, SettingsError> {
        let section = toml.map(|t| &t.interface);

        // Priority: CLI explicit > TOML > default
        let mtu = cli
            .mtu
            .or_else(|| section.and_then(|s| s.mtu))
            .unwrap_or(defaults::MTU);

        let min = family.min_mtu();
        if !(min..=MAX_IP_MTU).contains(&mtu) {
            return Err(SettingsError::InvalidMtu {
                mtu,
                min,
                max: MAX_IP_MTU,
            });
        }

        let metric = cli.metric.or_else(|| section.and_then(|s| s.metric));

        Ok(InterfaceSettings {
            mtu: Some(mtu),
            metric,
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), SettingsError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| SettingsError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_guid(field: &'static str, s: &str) -> Result<TypeTag, SettingsError> {
    s.parse::<TypeTag>()
        .map_err(|source| SettingsError::InvalidGuid { field, source })
}

fn parse_family(s: &str) -> Result<AddressFamily, SettingsError> {
    match s.to_lowercase().as_str() {
        "ipv4" | "v4" | "4" => Ok(AddressFamily::Ipv4),
        "ipv6" | "v6" | "6" => Ok(AddressFamily::Ipv6),
        _ => Err(SettingsError::InvalidFamily {
            value: s.to_string(),
        }),
    }
}
