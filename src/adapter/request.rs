//! Adapter creation requests and name validation.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::TypeTag;

/// Maximum adapter name length in UTF-16 code units, including the terminator.
pub const MAX_ADAPTER_NAME: usize = 128;

/// Reason an adapter name was rejected before reaching the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameError {
    /// The name is empty or whitespace only.
    #[error("name must not be empty")]
    Empty,

    /// The name does not fit the driver's buffer.
    #[error("name is {len} UTF-16 units long, maximum is {max}")]
    TooLong {
        /// Encoded length without terminator.
        len: usize,
        /// Largest accepted length.
        max: usize,
    },

    /// The name contains a NUL character.
    #[error("name must not contain NUL characters")]
    InteriorNul,
}

/// A validated adapter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AdapterName(String);

impl AdapterName {
    /// Validates a name against the driver's constraints.
    ///
    /// # Errors
    ///
    /// Returns [`NameError`] if the name is empty, too long, or contains NUL.
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(NameError::Empty);
        }
        if name.contains('\0') {
            return Err(NameError::InteriorNul);
        }

        let len = name.encode_utf16().count();
        let max = MAX_ADAPTER_NAME - 1;
        if len > max {
            return Err(NameError::TooLong { len, max });
        }

        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdapterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to create an adapter.
///
/// The name is kept unvalidated here; validation happens in
/// [`AdapterManager::create`](super::AdapterManager::create) so that a bad
/// name surfaces as a [`CreationError`](super::CreationError).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreationRequest {
    /// Friendly adapter name.
    pub name: String,
    /// Tunnel type tag grouping adapters of the same kind.
    pub tunnel_type: TypeTag,
    /// Identity to request; the driver assigns one if `None`.
    pub requested: Option<TypeTag>,
}

impl CreationRequest {
    /// Creates a request without a requested identity.
    #[must_use]
    pub fn new(name: impl Into<String>, tunnel_type: TypeTag) -> Self {
        Self {
            name: name.into(),
            tunnel_type,
            requested: None,
        }
    }

    /// Sets the identity to request from the driver.
    #[must_use]
    pub const fn with_requested(mut self, tag: TypeTag) -> Self {
        self.requested = Some(tag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_name() {
        let name = AdapterName::new("MyVirtualAdapter").unwrap();
        assert_eq!(name.as_str(), "MyVirtualAdapter");
        assert_eq!(name.to_string(), "MyVirtualAdapter");
    }

    #[test]
    fn rejects_empty_and_blank_names() {
        assert_eq!(AdapterName::new(""), Err(NameError::Empty));
        assert_eq!(AdapterName::new("   "), Err(NameError::Empty));
    }

    #[test]
    fn rejects_interior_nul() {
        assert_eq!(AdapterName::new("ab\0cd"), Err(NameError::InteriorNul));
    }

    #[test]
    fn length_limit_counts_utf16_units() {
        let longest = "a".repeat(MAX_ADAPTER_NAME - 1);
        assert!(AdapterName::new(longest).is_ok());

        let too_long = "a".repeat(MAX_ADAPTER_NAME);
        assert_eq!(
            AdapterName::new(too_long),
            Err(NameError::TooLong { len: 128, max: 127 })
        );

        // Each U+1F600 encodes as a surrogate pair.
        let emoji = "\u{1F600}".repeat(64);
        assert!(matches!(
            AdapterName::new(emoji),
            Err(NameError::TooLong { len: 128, .. })
        ));
    }

    #[test]
    fn request_builder_sets_requested_tag() {
        let tag = TypeTag::from_u128(42);
        let request = CreationRequest::new("tun0", TypeTag::from_u128(1)).with_requested(tag);
        assert_eq!(request.requested, Some(tag));
    }
}
