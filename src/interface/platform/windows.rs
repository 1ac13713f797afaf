//! Windows interface table using the IP Helper API.

use windows::Win32::Foundation::NO_ERROR;
use windows::Win32::NetworkManagement::IpHelper::{
    GetIpInterfaceEntry, InitializeIpInterfaceEntry, MIB_IPINTERFACE_ROW, SetIpInterfaceEntry,
};
use windows::Win32::NetworkManagement::Ndis::NET_LUID_LH;
use windows::Win32::Networking::WinSock::{
    ADDRESS_FAMILY, AF_INET, NL_INTERFACE_OFFLOAD_ROD, NL_LINK_LOCAL_ADDRESS_BEHAVIOR,
    NL_ROUTER_DISCOVERY_BEHAVIOR,
};

use crate::adapter::AdapterIdentity;
use crate::interface::{
    AddressFamily, InterfaceProperties, InterfaceTable, LinkLocalBehavior, OffloadFlags,
    RouterDiscovery,
};
use crate::native::NativeCode;

/// [`InterfaceTable`] over `GetIpInterfaceEntry` / `SetIpInterfaceEntry`.
///
/// # Example
///
/// ```no_run
/// use adapterctl::adapter::AdapterIdentity;
/// use adapterctl::interface::{AddressFamily, InterfaceConfigurator};
/// use adapterctl::interface::platform::IpHelperTable;
///
/// let configurator = InterfaceConfigurator::new(IpHelperTable::new(), AddressFamily::Ipv4);
/// let props = configurator
///     .fetch(AdapterIdentity::from_luid(0x0035_0000_0100_0000))
///     .expect("fetch failed");
/// println!("MTU {}", props.mtu);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IpHelperTable {
    _private: (),
}

impl IpHelperTable {
    /// Creates a table handle. The table itself is OS-wide.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl InterfaceTable for IpHelperTable {
    fn initialize(&self, row: &mut InterfaceProperties) {
        let mut raw = MIB_IPINTERFACE_ROW::default();
        // SAFETY: `raw` is a valid, writable MIB_IPINTERFACE_ROW.
        unsafe { InitializeIpInterfaceEntry(&raw mut raw) };
        *row = from_raw(&raw);
    }

    fn get(&self, row: &mut InterfaceProperties) -> Result<(), NativeCode> {
        let mut raw = MIB_IPINTERFACE_ROW::default();
        // SAFETY: see `initialize`.
        unsafe { InitializeIpInterfaceEntry(&raw mut raw) };
        raw.Family = ADDRESS_FAMILY(row.family.raw());
        raw.InterfaceLuid = NET_LUID_LH {
            Value: row.interface_luid.luid(),
        };

        // SAFETY: the key fields are set; the OS fills in the rest.
        let status = unsafe { GetIpInterfaceEntry(&raw mut raw) };
        if status != NO_ERROR {
            return Err(NativeCode(status.0));
        }

        *row = from_raw(&raw);
        Ok(())
    }

    fn set(&self, row: &InterfaceProperties) -> Result<(), NativeCode> {
        let mut raw = to_raw(row);

        // SAFETY: every field of `raw` comes from a fetched record.
        let status = unsafe { SetIpInterfaceEntry(&raw mut raw) };
        if status != NO_ERROR {
            return Err(NativeCode(status.0));
        }
        Ok(())
    }
}

fn from_raw(raw: &MIB_IPINTERFACE_ROW) -> InterfaceProperties {
    // SAFETY: every NET_LUID_LH variant is a view of the same u64.
    let luid = unsafe { raw.InterfaceLuid.Value };

    InterfaceProperties {
        // Unknown families only appear in uninitialized rows.
        family: AddressFamily::from_raw(raw.Family.0).unwrap_or_default(),
        interface_luid: AdapterIdentity::from_luid(luid),
        interface_index: raw.InterfaceIndex,
        max_reassembly_size: raw.MaxReassemblySize,
        interface_identifier: raw.InterfaceIdentifier,
        min_router_advertisement_interval: raw.MinRouterAdvertisementInterval,
        max_router_advertisement_interval: raw.MaxRouterAdvertisementInterval,
        advertising_enabled: raw.AdvertisingEnabled,
        forwarding_enabled: raw.ForwardingEnabled,
        weak_host_send: raw.WeakHostSend,
        weak_host_receive: raw.WeakHostReceive,
        use_automatic_metric: raw.UseAutomaticMetric,
        use_neighbor_unreachability_detection: raw.UseNeighborUnreachabilityDetection,
        managed_address_configuration_supported: raw.ManagedAddressConfigurationSupported,
        other_stateful_configuration_supported: raw.OtherStatefulConfigurationSupported,
        advertise_default_route: raw.AdvertiseDefaultRoute,
        router_discovery_behavior: RouterDiscovery::from_raw(raw.RouterDiscoveryBehavior.0),
        dad_transmits: raw.DadTransmits,
        base_reachable_time: raw.BaseReachableTime,
        retransmit_time: raw.RetransmitTime,
        path_mtu_discovery_timeout: raw.PathMtuDiscoveryTimeout,
        link_local_address_behavior: LinkLocalBehavior::from_raw(raw.LinkLocalAddressBehavior.0),
        link_local_address_timeout: raw.LinkLocalAddressTimeout,
        zone_indices: raw.ZoneIndices,
        site_prefix_length: raw.SitePrefixLength,
        metric: raw.Metric,
        mtu: raw.NlMtu,
        connected: raw.Connected,
        supports_wake_up_patterns: raw.SupportsWakeUpPatterns,
        supports_neighbor_discovery: raw.SupportsNeighborDiscovery,
        supports_router_discovery: raw.SupportsRouterDiscovery,
        reachable_time: raw.ReachableTime,
        transmit_offload: OffloadFlags::from_bits(raw.TransmitOffload._bitfield),
        receive_offload: OffloadFlags::from_bits(raw.ReceiveOffload._bitfield),
        disable_default_routes: raw.DisableDefaultRoutes,
    }
}

fn to_raw(props: &InterfaceProperties) -> MIB_IPINTERFACE_ROW {
    let family = ADDRESS_FAMILY(props.family.raw());

    MIB_IPINTERFACE_ROW {
        Family: family,
        InterfaceLuid: NET_LUID_LH {
            Value: props.interface_luid.luid(),
        },
        InterfaceIndex: props.interface_index,
        MaxReassemblySize: props.max_reassembly_size,
        InterfaceIdentifier: props.interface_identifier,
        MinRouterAdvertisementInterval: props.min_router_advertisement_interval,
        MaxRouterAdvertisementInterval: props.max_router_advertisement_interval,
        AdvertisingEnabled: props.advertising_enabled,
        ForwardingEnabled: props.forwarding_enabled,
        WeakHostSend: props.weak_host_send,
        WeakHostReceive: props.weak_host_receive,
        UseAutomaticMetric: props.use_automatic_metric,
        UseNeighborUnreachabilityDetection: props.use_neighbor_unreachability_detection,
        ManagedAddressConfigurationSupported: props.managed_address_configuration_supported,
        OtherStatefulConfigurationSupported: props.other_stateful_configuration_supported,
        AdvertiseDefaultRoute: props.advertise_default_route,
        RouterDiscoveryBehavior: NL_ROUTER_DISCOVERY_BEHAVIOR(
            props.router_discovery_behavior.raw(),
        ),
        DadTransmits: props.dad_transmits,
        BaseReachableTime: props.base_reachable_time,
        RetransmitTime: props.retransmit_time,
        PathMtuDiscoveryTimeout: props.path_mtu_discovery_timeout,
        LinkLocalAddressBehavior: NL_LINK_LOCAL_ADDRESS_BEHAVIOR(
            props.link_local_address_behavior.raw(),
        ),
        LinkLocalAddressTimeout: props.link_local_address_timeout,
        ZoneIndices: props.zone_indices,
        // SetIpInterfaceEntry rejects a non-zero prefix on IPv4 rows.
        SitePrefixLength: if family == AF_INET {
            0
        } else {
            props.site_prefix_length
        },
        Metric: props.metric,
        NlMtu: props.mtu,
        Connected: props.connected,
        SupportsWakeUpPatterns: props.supports_wake_up_patterns,
        SupportsNeighborDiscovery: props.supports_neighbor_discovery,
        SupportsRouterDiscovery: props.supports_router_discovery,
        ReachableTime: props.reachable_time,
        TransmitOffload: NL_INTERFACE_OFFLOAD_ROD {
            _bitfield: props.transmit_offload.bits(),
        },
        ReceiveOffload: NL_INTERFACE_OFFLOAD_ROD {
            _bitfield: props.receive_offload.bits(),
        },
        DisableDefaultRoutes: props.disable_default_routes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_row;

    fn identity() -> AdapterIdentity {
        AdapterIdentity::from_luid(0x0035_0000_0200_0000)
    }

    #[test]
    fn ipv6_row_survives_marshaling() {
        let props = sample_row(identity(), AddressFamily::Ipv6);

        assert_eq!(from_raw(&to_raw(&props)), props);
    }

    #[test]
    fn ipv4_row_survives_marshaling_except_site_prefix() {
        let props = sample_row(identity(), AddressFamily::Ipv4);

        let raw = to_raw(&props);

        assert_eq!(raw.SitePrefixLength, 0);
        assert_eq!(raw.NlMtu, props.mtu);
        assert_eq!(
            from_raw(&raw),
            InterfaceProperties {
                site_prefix_length: 0,
                ..props
            }
        );
    }

    #[test]
    fn key_fields_are_marshaled() {
        let raw = to_raw(&InterfaceProperties::keyed(identity(), AddressFamily::Ipv4));

        assert_eq!(raw.Family, AF_INET);
        // SAFETY: written through the Value variant above.
        assert_eq!(unsafe { raw.InterfaceLuid.Value }, identity().luid());
    }

    // Integration test: asks the live OS table for a LUID no interface has.
    #[test]
    fn unknown_luid_fails() {
        let mut row = InterfaceProperties::keyed(
            AdapterIdentity::from_luid(0x00FF_FFFF_FF00_0000),
            AddressFamily::Ipv4,
        );

        let result = IpHelperTable::new().get(&mut row);

        assert!(result.is_err());
    }
}
