//! Interface configurator.
//!
//! This module provides types and traits for:
//! - Representing an OS interface record ([`InterfaceProperties`])
//! - Reading and rewriting records without losing fields ([`InterfaceConfigurator`])
//! - High-level settings such as MTU and metric ([`InterfaceSettings`])
//! - Plugging in the OS table ([`InterfaceTable`], [`platform`])

mod configurator;
mod error;
pub mod platform;
mod properties;
mod settings;
mod table;


pub use configurator::InterfaceConfigurator;
pub use error::{ConfigError, ConfigOrigin};
pub use properties::{
    AddressFamily, InterfaceProperties, LinkLocalBehavior, MAX_IP_MTU, OffloadFlags,
    RouterDiscovery,
};
pub use settings::InterfaceSettings;
pub use table::InterfaceTable;
