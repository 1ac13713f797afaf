//! Configuration layer for adapterctl.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The adapter name has no default and must come from the CLI or the file.
//!
//! # Boolean Flag Semantics
//!
//! Boolean flags (`--hold`, `--json`) use OR semantics:
//! - If set `true` in either CLI or TOML, the result is `true`.
//! - Once set `true` in TOML, CLI cannot override to `false` (flags only enable, not disable).
//!
//! # MTU
//!
//! The MTU always has a value (default 1500) and is checked against the
//! address family's range here. The interface configurator checks it again
//! against the limit the OS reports for the actual interface.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, FamilyArg};
pub use error::{SettingsError, field};
pub use toml::{
    AdapterSection, DriverSection, InterfaceSection, OutputSection, TomlConfig,
    default_config_template,
};
pub use validated::{ValidatedConfig, write_default_config};
