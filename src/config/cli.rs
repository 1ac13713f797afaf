//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::interface::AddressFamily;

/// adapterctl: virtual network adapter provisioning
///
/// Creates a Wintun adapter, configures its IP interface, reports the
/// result and releases the adapter.
#[derive(Debug, Parser)]
#[command(name = "adapterctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Adapter name (required for run mode)
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Tunnel type GUID, e.g. {5A1F6A3C-8E2B-4F1D-9C07-3B6D2E4A5F10}
    #[arg(long = "tunnel-type", value_name = "GUID")]
    pub tunnel_type: Option<String>,

    /// Requested adapter GUID (generated when omitted)
    #[arg(long, value_name = "GUID")]
    pub guid: Option<String>,

    /// Interface MTU in bytes
    #[arg(long)]
    pub mtu: Option<u32>,

    /// Interface route metric (disables automatic metric)
    #[arg(long)]
    pub metric: Option<u32>,

    /// Address family of the interface record to configure
    #[arg(long, value_enum)]
    pub family: Option<FamilyArg>,

    /// Path to wintun.dll
    #[arg(long, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Keep the adapter up until Ctrl+C
    #[arg(long)]
    pub hold: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for adapterctl
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "adapterctl.toml")]
        output: PathBuf,
    },
}

/// Address family argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    /// Configure the IPv4 interface record
    #[value(name = "ipv4")]
    V4,
    /// Configure the IPv6 interface record
    #[value(name = "ipv6")]
    V6,
}

impl From<FamilyArg> for AddressFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::V4 => Self::Ipv4,
            FamilyArg::V6 => Self::Ipv6,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
