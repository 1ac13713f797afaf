//! Stable interface identity derived from a live adapter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Interface LUID identifying an adapter to the OS network stack.
///
/// This is a weak reference: it identifies the adapter but does not keep
/// it alive. It is only meaningful while the owning
/// [`AdapterHandle`](super::AdapterHandle) has not been released.
///
/// Layout of the 64-bit value: bits 0..24 reserved, bits 24..48 the
/// per-type interface index, bits 48..64 the IANA interface type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterIdentity(u64);

impl AdapterIdentity {
    /// Wraps a raw LUID value.
    #[must_use]
    pub const fn from_luid(luid: u64) -> Self {
        Self(luid)
    }

    /// Returns the raw LUID value.
    #[must_use]
    pub const fn luid(self) -> u64 {
        self.0
    }

    /// Returns the LUID's per-type interface index.
    #[must_use]
    pub const fn net_luid_index(self) -> u32 {
        ((self.0 >> 24) & 0x00FF_FFFF) as u32
    }

    /// Returns the IANA interface type encoded in the LUID.
    #[must_use]
    pub const fn if_type(self) -> u16 {
        (self.0 >> 48) as u16
    }
}

impl fmt::Display for AdapterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "luid:0x{:016X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `IF_TYPE_PROP_VIRTUAL`, the type Wintun adapters register with.
    const PROP_VIRTUAL: u64 = 53;

    #[test]
    fn decodes_luid_fields() {
        let identity = AdapterIdentity::from_luid((PROP_VIRTUAL << 48) | (7 << 24));

        assert_eq!(identity.if_type(), 53);
        assert_eq!(identity.net_luid_index(), 7);
    }

    #[test]
    fn reserved_bits_do_not_leak_into_index() {
        let identity = AdapterIdentity::from_luid(0x00FF_FFFF);
        assert_eq!(identity.net_luid_index(), 0);
        assert_eq!(identity.if_type(), 0);
    }

    #[test]
    fn display_shows_hex_luid() {
        let identity = AdapterIdentity::from_luid(0x0035_0000_0700_0000);
        assert_eq!(identity.to_string(), "luid:0x0035000007000000");
    }
}
