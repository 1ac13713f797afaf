//! Semantic view of an OS IP interface record.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::adapter::AdapterIdentity;

/// Largest MTU any IP interface can carry.
pub const MAX_IP_MTU: u32 = 65_535;

/// Address family an interface record belongs to.
///
/// Every IP interface has one record per family; the configurator works on
/// exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    /// IPv4 (`AF_INET`).
    #[default]
    Ipv4,
    /// IPv6 (`AF_INET6`).
    Ipv6,
}

impl AddressFamily {
    /// Returns the raw `ADDRESS_FAMILY` value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        match self {
            Self::Ipv4 => 2,
            Self::Ipv6 => 23,
        }
    }

    /// Maps a raw `ADDRESS_FAMILY` value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            2 => Some(Self::Ipv4),
            23 => Some(Self::Ipv6),
            _ => None,
        }
    }

    /// Smallest MTU the family permits (RFC 791 / RFC 8200).
    #[must_use]
    pub const fn min_mtu(self) -> u32 {
        match self {
            Self::Ipv4 => 68,
            Self::Ipv6 => 1280,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4 => write!(f, "IPv4"),
            Self::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// Router discovery behaviour (`NL_ROUTER_DISCOVERY_BEHAVIOR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RouterDiscovery {
    /// Router discovery is off.
    Disabled,
    /// Router discovery is on.
    Enabled,
    /// Router discovery is configured by DHCP.
    Dhcp,
    /// Leave the current setting untouched.
    #[default]
    Unchanged,
    /// A value this crate does not know, preserved as-is.
    Other(i32),
}

impl RouterDiscovery {
    /// Maps the raw enumeration value.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Disabled,
            1 => Self::Enabled,
            2 => Self::Dhcp,
            -1 => Self::Unchanged,
            other => Self::Other(other),
        }
    }

    /// Returns the raw enumeration value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Disabled => 0,
            Self::Enabled => 1,
            Self::Dhcp => 2,
            Self::Unchanged => -1,
            Self::Other(other) => other,
        }
    }
}

/// Link-local address behaviour (`NL_LINK_LOCAL_ADDRESS_BEHAVIOR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LinkLocalBehavior {
    /// Never assign a link-local address.
    AlwaysOff,
    /// Assign one only if no other address is available.
    Delayed,
    /// Always assign one.
    AlwaysOn,
    /// Leave the current setting untouched.
    #[default]
    Unchanged,
    /// A value this crate does not know, preserved as-is.
    Other(i32),
}

impl LinkLocalBehavior {
    /// Maps the raw enumeration value.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::AlwaysOff,
            1 => Self::Delayed,
            2 => Self::AlwaysOn,
            -1 => Self::Unchanged,
            other => Self::Other(other),
        }
    }

    /// Returns the raw enumeration value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::AlwaysOff => 0,
            Self::Delayed => 1,
            Self::AlwaysOn => 2,
            Self::Unchanged => -1,
            Self::Other(other) => other,
        }
    }
}

/// Offload capability bits (`NL_INTERFACE_OFFLOAD_ROD`).
///
/// The raw byte is kept whole so undefined bits survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct OffloadFlags(u8);

impl OffloadFlags {
    const NL_CHECKSUM: u8 = 1 << 0;
    const NL_OPTIONS: u8 = 1 << 1;
    const TL_DATAGRAM_CHECKSUM: u8 = 1 << 2;
    const TL_STREAM_CHECKSUM: u8 = 1 << 3;
    const TL_STREAM_OPTIONS: u8 = 1 << 4;
    const FAST_PATH_COMPATIBLE: u8 = 1 << 5;
    const TL_LARGE_SEND: u8 = 1 << 6;
    const TL_GIANT_SEND: u8 = 1 << 7;

    /// Wraps the raw bitfield byte.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bitfield byte.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    const fn has(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    /// Network-layer checksum offload.
    #[must_use]
    pub const fn nl_checksum(self) -> bool {
        self.has(Self::NL_CHECKSUM)
    }

    /// Network-layer options offload.
    #[must_use]
    pub const fn nl_options(self) -> bool {
        self.has(Self::NL_OPTIONS)
    }

    /// Transport-layer datagram checksum offload.
    #[must_use]
    pub const fn tl_datagram_checksum(self) -> bool {
        self.has(Self::TL_DATAGRAM_CHECKSUM)
    }

    /// Transport-layer stream checksum offload.
    #[must_use]
    pub const fn tl_stream_checksum(self) -> bool {
        self.has(Self::TL_STREAM_CHECKSUM)
    }

    /// Transport-layer stream options offload.
    #[must_use]
    pub const fn tl_stream_options(self) -> bool {
        self.has(Self::TL_STREAM_OPTIONS)
    }

    /// Fast-path compatible.
    #[must_use]
    pub const fn fast_path_compatible(self) -> bool {
        self.has(Self::FAST_PATH_COMPATIBLE)
    }

    /// Large send offload.
    #[must_use]
    pub const fn tl_large_send(self) -> bool {
        self.has(Self::TL_LARGE_SEND)
    }

    /// Giant send offload.
    #[must_use]
    pub const fn tl_giant_send(self) -> bool {
        self.has(Self::TL_GIANT_SEND)
    }
}

/// Snapshot of one IP interface record.
///
/// Carries every field of the OS record so that writing back a fetched
/// snapshot changes nothing. `family` and `interface_luid` are the record's
/// key; the rest is data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[allow(clippy::struct_excessive_bools)] // mirrors the OS record
pub struct InterfaceProperties {
    pub family: AddressFamily,
    pub interface_luid: AdapterIdentity,
    pub interface_index: u32,
    pub max_reassembly_size: u32,
    pub interface_identifier: u64,
    pub min_router_advertisement_interval: u32,
    pub max_router_advertisement_interval: u32,
    pub advertising_enabled: bool,
    pub forwarding_enabled: bool,
    pub weak_host_send: bool,
    pub weak_host_receive: bool,
    pub use_automatic_metric: bool,
    pub use_neighbor_unreachability_detection: bool,
    pub managed_address_configuration_supported: bool,
    pub other_stateful_configuration_supported: bool,
    pub advertise_default_route: bool,
    pub router_discovery_behavior: RouterDiscovery,
    pub dad_transmits: u32,
    pub base_reachable_time: u32,
    pub retransmit_time: u32,
    pub path_mtu_discovery_timeout: u32,
    pub link_local_address_behavior: LinkLocalBehavior,
    pub link_local_address_timeout: u32,
    pub zone_indices: [u32; 16],
    pub site_prefix_length: u32,
    pub metric: u32,
    /// Network-layer MTU in bytes.
    pub mtu: u32,
    pub connected: bool,
    pub supports_wake_up_patterns: bool,
    pub supports_neighbor_discovery: bool,
    pub supports_router_discovery: bool,
    pub reachable_time: u32,
    pub transmit_offload: OffloadFlags,
    pub receive_offload: OffloadFlags,
    pub disable_default_routes: bool,
}

impl InterfaceProperties {
    /// Creates a default record keyed by `identity` and `family`.
    #[must_use]
    pub fn keyed(identity: AdapterIdentity, family: AddressFamily) -> Self {
        Self {
            family,
            interface_luid: identity,
            ..Self::default()
        }
    }

    /// Largest MTU this interface accepts.
    ///
    /// Bounded by the reassembly size the OS reports, and by
    /// [`MAX_IP_MTU`] when it reports none.
    #[must_use]
    pub fn max_mtu(&self) -> u32 {
        match self.max_reassembly_size {
            0 => MAX_IP_MTU,
            size => size.min(MAX_IP_MTU),
        }
    }

    /// Range of MTU values this interface accepts.
    #[must_use]
    pub fn mtu_bounds(&self) -> RangeInclusive<u32> {
        self.family.min_mtu()..=self.max_mtu()
    }

    /// Returns true if `other` addresses the same OS record.
    #[must_use]
    pub fn same_key(&self, other: &Self) -> bool {
        self.family == other.family && self.interface_luid == other.interface_luid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_family_raw_round_trip() {
        assert_eq!(AddressFamily::Ipv4.raw(), 2);
        assert_eq!(AddressFamily::Ipv6.raw(), 23);
        assert_eq!(AddressFamily::from_raw(2), Some(AddressFamily::Ipv4));
        assert_eq!(AddressFamily::from_raw(23), Some(AddressFamily::Ipv6));
        assert_eq!(AddressFamily::from_raw(0), None);
    }

    #[test]
    fn address_family_defaults_to_ipv4() {
        assert_eq!(AddressFamily::default(), AddressFamily::Ipv4);
    }

    #[test]
    fn address_family_min_mtu() {
        assert_eq!(AddressFamily::Ipv4.min_mtu(), 68);
        assert_eq!(AddressFamily::Ipv6.min_mtu(), 1280);
    }

    #[test]
    fn router_discovery_preserves_unknown_values() {
        assert_eq!(RouterDiscovery::from_raw(2), RouterDiscovery::Dhcp);
        assert_eq!(RouterDiscovery::from_raw(-1), RouterDiscovery::Unchanged);
        assert_eq!(RouterDiscovery::from_raw(9), RouterDiscovery::Other(9));
        assert_eq!(RouterDiscovery::Other(9).raw(), 9);
    }

    #[test]
    fn link_local_preserves_unknown_values() {
        assert_eq!(LinkLocalBehavior::from_raw(0), LinkLocalBehavior::AlwaysOff);
        assert_eq!(LinkLocalBehavior::from_raw(-7).raw(), -7);
    }

    #[test]
    fn offload_flags_decode_bits() {
        let flags = OffloadFlags::from_bits(0b1000_0101);
        assert!(flags.nl_checksum());
        assert!(!flags.nl_options());
        assert!(flags.tl_datagram_checksum());
        assert!(!flags.tl_stream_checksum());
        assert!(!flags.tl_large_send());
        assert!(flags.tl_giant_send());
        assert_eq!(flags.bits(), 0b1000_0101);
    }

    #[test]
    fn max_mtu_uses_reassembly_size() {
        let mut props = InterfaceProperties {
            max_reassembly_size: 9000,
            ..InterfaceProperties::default()
        };
        assert_eq!(props.max_mtu(), 9000);

        props.max_reassembly_size = 0;
        assert_eq!(props.max_mtu(), MAX_IP_MTU);

        props.max_reassembly_size = 200_000;
        assert_eq!(props.max_mtu(), MAX_IP_MTU);
    }

    #[test]
    fn mtu_bounds_depend_on_family() {
        let v6 = InterfaceProperties::keyed(AdapterIdentity::from_luid(1), AddressFamily::Ipv6);
        assert_eq!(v6.mtu_bounds(), 1280..=MAX_IP_MTU);

        let v4 = InterfaceProperties::keyed(AdapterIdentity::from_luid(1), AddressFamily::Ipv4);
        assert_eq!(v4.mtu_bounds(), 68..=MAX_IP_MTU);
    }

    #[test]
    fn same_key_compares_family_and_luid() {
        let a = InterfaceProperties::keyed(AdapterIdentity::from_luid(1), AddressFamily::Ipv4);
        let mut b = a.clone();
        b.mtu = 1280;
        assert!(a.same_key(&b));

        b.family = AddressFamily::Ipv6;
        assert!(!a.same_key(&b));
    }

    #[test]
    fn serializes_to_json_with_named_fields() {
        let props = InterfaceProperties::keyed(AdapterIdentity::from_luid(7), AddressFamily::Ipv6);
        let json = serde_json::to_value(&props).unwrap();

        assert_eq!(json["family"], "ipv6");
        assert_eq!(json["interface_luid"], 7);
        assert_eq!(json["zone_indices"].as_array().unwrap().len(), 16);
    }
}
