//! OS interface table abstraction.

use super::InterfaceProperties;
use crate::native::NativeCode;

/// The OS-wide IP interface table.
///
/// Records are keyed by `family` and `interface_luid`. Implementations
/// translate between [`InterfaceProperties`] and whatever layout the OS
/// uses; that layout never leaves the implementation.
pub trait InterfaceTable: Send + Sync {
    /// Resets a record to the table's initial state.
    ///
    /// The default resets every field to [`InterfaceProperties::default`].
    fn initialize(&self, row: &mut InterfaceProperties) {
        *row = InterfaceProperties::default();
    }

    /// Populates `row` from the table.
    ///
    /// `row.family` and `row.interface_luid` select the record; every other
    /// field is overwritten.
    ///
    /// # Errors
    ///
    /// Returns the OS status code if the record cannot be read.
    fn get(&self, row: &mut InterfaceProperties) -> Result<(), NativeCode>;

    /// Writes every field of `row` back to the table.
    ///
    /// The write is all-or-nothing from the caller's point of view.
    ///
    /// # Errors
    ///
    /// Returns the OS status code if the record cannot be written.
    fn set(&self, row: &InterfaceProperties) -> Result<(), NativeCode>;
}
