//! Interface configurator: fetch, mutate and write back interface records.

use super::{
    AddressFamily, ConfigError, ConfigOrigin, InterfaceProperties, InterfaceSettings,
    InterfaceTable,
};
use crate::adapter::{AdapterIdentity, QueryError};
use crate::native::Operation;

/// Reads and rewrites one address family's interface records.
///
/// Every write is a full read-modify-write of the record, so fields the
/// caller does not touch are written back exactly as the OS reported them.
///
/// # Example
///
/// ```ignore
/// let configurator = InterfaceConfigurator::new(table, AddressFamily::Ipv4);
/// configurator.set_mtu(identity, 1280)?;
/// assert_eq!(configurator.fetch(identity)?.mtu, 1280);
/// ```
#[derive(Debug)]
pub struct InterfaceConfigurator<T> {
    table: T,
    family: AddressFamily,
}

impl<T: InterfaceTable> InterfaceConfigurator<T> {
    /// Creates a configurator for `family` records in `table`.
    #[must_use]
    pub const fn new(table: T, family: AddressFamily) -> Self {
        Self { table, family }
    }

    /// Returns the address family this configurator works on.
    #[must_use]
    pub const fn family(&self) -> AddressFamily {
        self.family
    }

    /// Returns the underlying table.
    #[must_use]
    pub const fn table(&self) -> &T {
        &self.table
    }

    /// Reads the current record for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Native`] with the OS status if the read fails.
    pub fn fetch(&self, identity: AdapterIdentity) -> Result<InterfaceProperties, QueryError> {
        let mut row = InterfaceProperties::default();
        self.table.initialize(&mut row);
        row.interface_luid = identity;
        row.family = self.family;

        self.table
            .get(&mut row)
            .map_err(|code| QueryError::Native {
                operation: Operation::GetInterfaceEntry,
                code,
            })?;

        tracing::trace!(
            %identity,
            family = %self.family,
            mtu = row.mtu,
            "Fetched interface record"
        );
        Ok(row)
    }

    /// Applies `mutate` to the current record and writes the whole record back.
    ///
    /// Returns the record as written.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Native`] with [`ConfigOrigin::Fetch`] if the read fails
    /// - [`ConfigError::KeyChanged`] if `mutate` changed the family or LUID
    /// - [`ConfigError::InvalidMtu`] if `mutate` changed the MTU to a value
    ///   outside [`InterfaceProperties::mtu_bounds`]
    /// - [`ConfigError::Native`] with [`ConfigOrigin::Write`] if the write fails
    ///
    /// The OS record is unchanged in every error case.
    pub fn apply<F>(
        &self,
        identity: AdapterIdentity,
        mutate: F,
    ) -> Result<InterfaceProperties, ConfigError>
    where
        F: FnOnce(InterfaceProperties) -> InterfaceProperties,
    {
        let current = self.fetch(identity).map_err(|e| ConfigError::Native {
            origin: ConfigOrigin::Fetch,
            code: e.native_code(),
        })?;

        let updated = mutate(current.clone());
        validate(&current, &updated)?;

        if updated == current {
            tracing::debug!(%identity, "Interface record unchanged, writing back as-is");
        }

        self.table
            .set(&updated)
            .map_err(|code| ConfigError::Native {
                origin: ConfigOrigin::Write,
                code,
            })?;

        tracing::debug!(
            %identity,
            family = %self.family,
            mtu = updated.mtu,
            metric = updated.metric,
            "Interface record written"
        );
        Ok(updated)
    }

    /// Sets the interface MTU.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn set_mtu(
        &self,
        identity: AdapterIdentity,
        mtu: u32,
    ) -> Result<InterfaceProperties, ConfigError> {
        self.apply_settings(identity, &InterfaceSettings::mtu(mtu))
    }

    /// Applies a set of [`InterfaceSettings`] in one write.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn apply_settings(
        &self,
        identity: AdapterIdentity,
        settings: &InterfaceSettings,
    ) -> Result<InterfaceProperties, ConfigError> {
        self.apply(identity, |props| settings.apply_to(props))
    }
}

fn validate(
    current: &InterfaceProperties,
    updated: &InterfaceProperties,
) -> Result<(), ConfigError> {
    if !updated.same_key(current) {
        let field = if updated.family == current.family {
            "interface_luid"
        } else {
            "family"
        };
        return Err(ConfigError::KeyChanged { field });
    }

    if updated.mtu != current.mtu {
        let bounds = current.mtu_bounds();
        if !bounds.contains(&updated.mtu) {
            return Err(ConfigError::InvalidMtu {
                mtu: updated.mtu,
                min: *bounds.start(),
                max: *bounds.end(),
            });
        }
    }

    Ok(())
}
