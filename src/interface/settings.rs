//! High-level interface settings applied as a single mutation.

use serde::{Deserialize, Serialize};

use super::InterfaceProperties;

/// Settings to apply to an interface record.
///
/// Unset fields leave the record untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterfaceSettings {
    /// Network-layer MTU in bytes.
    pub mtu: Option<u32>,
    /// Route metric. Setting it turns off automatic metric selection.
    pub metric: Option<u32>,
}

impl InterfaceSettings {
    /// Settings that only change the MTU.
    #[must_use]
    pub const fn mtu(mtu: u32) -> Self {
        Self {
            mtu: Some(mtu),
            metric: None,
        }
    }

    /// Returns true if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mtu.is_none() && self.metric.is_none()
    }

    /// Applies the settings to a record.
    #[must_use]
    pub fn apply_to(&self, mut props: InterfaceProperties) -> InterfaceProperties {
        if let Some(mtu) = self.mtu {
            props.mtu = mtu;
        }
        if let Some(metric) = self.metric {
            props.metric = metric;
            props.use_automatic_metric = false;
        }
        props
    }
}
