//! Fake driver and interface table shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::adapter::{AdapterIdentity, AdapterName, CreatedAdapter, DriverBackend, TypeTag};
use crate::interface::{
    AddressFamily, InterfaceProperties, InterfaceTable, LinkLocalBehavior, OffloadFlags,
    RouterDiscovery,
};
use crate::native::NativeCode;

/// `IF_TYPE_PROP_VIRTUAL`
const PROP_VIRTUAL: u64 = 53;

/// Handle issued by [`FakeDriver`]. Deliberately not `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub struct FakeHandle(pub u64);

#[derive(Default)]
struct DriverState {
    next_id: u64,
    live: HashSet<u64>,
    created: usize,
    close_calls: usize,
    double_closes: usize,
    fail_create: Option<NativeCode>,
    fail_close: Option<NativeCode>,
    fail_luid: Option<NativeCode>,
}

/// In-memory driver that tracks every adapter it hands out.
#[derive(Default)]
pub struct FakeDriver {
    state: Mutex<DriverState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_create(code: NativeCode) -> Self {
        let driver = Self::new();
        driver.state.lock().unwrap().fail_create = Some(code);
        driver
    }

    pub fn fail_close(&self, code: NativeCode) {
        self.state.lock().unwrap().fail_close = Some(code);
    }

    pub fn fail_luid(&self, code: NativeCode) {
        self.state.lock().unwrap().fail_luid = Some(code);
    }

    pub fn created(&self) -> usize {
        self.state.lock().unwrap().created
    }

    pub fn live(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    pub fn close_calls(&self) -> usize {
        self.state.lock().unwrap().close_calls
    }

    pub fn double_closes(&self) -> usize {
        self.state.lock().unwrap().double_closes
    }

    /// Identity the driver reports for the `n`-th created adapter (1-based).
    pub fn identity_of(n: u64) -> AdapterIdentity {
        AdapterIdentity::from_luid((PROP_VIRTUAL << 48) | (n << 24))
    }
}

impl DriverBackend for FakeDriver {
    type Handle = FakeHandle;

    fn create_adapter(
        &self,
        _name: &AdapterName,
        _tunnel_type: TypeTag,
        requested: Option<TypeTag>,
    ) -> Result<CreatedAdapter<FakeHandle>, NativeCode> {
        let mut state = self.state.lock().unwrap();
        if let Some(code) = state.fail_create {
            return Err(code);
        }

        state.next_id += 1;
        let id = state.next_id;
        state.live.insert(id);
        state.created += 1;

        let allocated =
            requested.unwrap_or_else(|| TypeTag::from_u128(0xA110_CA7E_0000 + u128::from(id)));
        Ok(CreatedAdapter {
            handle: FakeHandle(id),
            allocated,
        })
    }

    fn close_adapter(&self, handle: FakeHandle) -> Result<(), NativeCode> {
        let mut state = self.state.lock().unwrap();
        state.close_calls += 1;
        if !state.live.remove(&handle.0) {
            state.double_closes += 1;
        }
        state.fail_close.map_or(Ok(()), Err)
    }

    fn adapter_luid(&self, handle: &FakeHandle) -> Result<AdapterIdentity, NativeCode> {
        let state = self.state.lock().unwrap();
        if let Some(code) = state.fail_luid {
            return Err(code);
        }
        if !state.live.contains(&handle.0) {
            return Err(NativeCode::INVALID_HANDLE);
        }
        Ok(Self::identity_of(handle.0))
    }
}

#[derive(Default)]
struct TableState {
    rows: HashMap<(u64, AddressFamily), InterfaceProperties>,
    get_calls: usize,
    set_calls: usize,
    fail_get: Option<NativeCode>,
    fail_set: Option<NativeCode>,
}

/// In-memory IP interface table keyed by LUID and address family.
#[derive(Default)]
pub struct FakeTable {
    state: Mutex<TableState>,
}

impl FakeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding one row for `identity`.
    pub fn with_row(identity: AdapterIdentity, family: AddressFamily) -> Self {
        let table = Self::new();
        table.insert(sample_row(identity, family));
        table
    }

    pub fn insert(&self, row: InterfaceProperties) {
        self.state
            .lock()
            .unwrap()
            .rows
            .insert((row.interface_luid.luid(), row.family), row);
    }

    pub fn row(
        &self,
        identity: AdapterIdentity,
        family: AddressFamily,
    ) -> Option<InterfaceProperties> {
        self.state
            .lock()
            .unwrap()
            .rows
            .get(&(identity.luid(), family))
            .cloned()
    }

    pub fn fail_get(&self, code: NativeCode) {
        self.state.lock().unwrap().fail_get = Some(code);
    }

    pub fn fail_set(&self, code: NativeCode) {
        self.state.lock().unwrap().fail_set = Some(code);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_get = None;
        state.fail_set = None;
    }

    pub fn get_calls(&self) -> usize {
        self.state.lock().unwrap().get_calls
    }

    pub fn set_calls(&self) -> usize {
        self.state.lock().unwrap().set_calls
    }
}

impl InterfaceTable for FakeTable {
    fn get(&self, row: &mut InterfaceProperties) -> Result<(), NativeCode> {
        let mut state = self.state.lock().unwrap();
        state.get_calls += 1;
        if let Some(code) = state.fail_get {
            return Err(code);
        }

        let key = (row.interface_luid.luid(), row.family);
        let stored = state.rows.get(&key).ok_or(NativeCode::NOT_FOUND)?;
        *row = stored.clone();
        Ok(())
    }

    fn set(&self, row: &InterfaceProperties) -> Result<(), NativeCode> {
        let mut state = self.state.lock().unwrap();
        state.set_calls += 1;
        if let Some(code) = state.fail_set {
            return Err(code);
        }

        let key = (row.interface_luid.luid(), row.family);
        let stored = state.rows.get_mut(&key).ok_or(NativeCode::NOT_FOUND)?;
        *stored = row.clone();
        Ok(())
    }
}

/// A realistic row for a freshly created tunnel adapter, with every field
/// set to a distinctive non-default value.
pub fn sample_row(identity: AdapterIdentity, family: AddressFamily) -> InterfaceProperties {
    let mut zone_indices = [0u32; 16];
    for (i, zone) in zone_indices.iter_mut().enumerate() {
        *zone = u32::try_from(i).unwrap() + 100;
    }

    InterfaceProperties {
        family,
        interface_luid: identity,
        interface_index: 42,
        max_reassembly_size: 65_535,
        interface_identifier: 0x0200_5EFF_FE00_5301,
        min_router_advertisement_interval: 200,
        max_router_advertisement_interval: 600,
        advertising_enabled: false,
        forwarding_enabled: true,
        weak_host_send: true,
        weak_host_receive: false,
        use_automatic_metric: true,
        use_neighbor_unreachability_detection: true,
        managed_address_configuration_supported: false,
        other_stateful_configuration_supported: true,
        advertise_default_route: false,
        router_discovery_behavior: RouterDiscovery::Dhcp,
        dad_transmits: 3,
        base_reachable_time: 30_000,
        retransmit_time: 1_000,
        path_mtu_discovery_timeout: 600_000,
        link_local_address_behavior: LinkLocalBehavior::Delayed,
        link_local_address_timeout: 2_000,
        zone_indices,
        site_prefix_length: 64,
        metric: 5,
        mtu: 1_420,
        connected: true,
        supports_wake_up_patterns: false,
        supports_neighbor_discovery: true,
        supports_router_discovery: true,
        reachable_time: 27_500,
        transmit_offload: OffloadFlags::from_bits(0b0000_1111),
        receive_offload: OffloadFlags::from_bits(0b0011_0001),
        disable_default_routes: true,
    }
}
