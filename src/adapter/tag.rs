//! 16-byte type tags (GUIDs) used for tunnel types and adapter identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A GUID-equivalent 16-byte tag.
///
/// The value is held as the GUID's canonical 128-bit number, i.e. the hex
/// digits of `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}` read left to right,
/// the same number `windows::core::GUID::from_u128` takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TypeTag(u128);

/// Error returned when a string is not a valid GUID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid GUID '{input}': expected {{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}}")]
pub struct ParseTagError {
    /// The rejected input.
    pub input: String,
}

impl TypeTag {
    /// Creates a tag from its canonical 128-bit value.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    /// Returns the canonical 128-bit value.
    #[must_use]
    pub const fn as_u128(self) -> u128 {
        self.0
    }

    /// Returns true for the all-zero tag.
    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:04X}-{:012X}}}",
            v >> 96,
            (v >> 80) & 0xFFFF,
            (v >> 64) & 0xFFFF,
            (v >> 48) & 0xFFFF,
            v & 0xFFFF_FFFF_FFFF,
        )
    }
}

impl FromStr for TypeTag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTagError {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let body = match (trimmed.strip_prefix('{'), trimmed.strip_suffix('}')) {
            (Some(_), Some(_)) => &trimmed[1..trimmed.len() - 1],
            (None, None) => trimmed,
            _ => return Err(err()),
        };

        let groups: Vec<&str> = body.split('-').collect();
        let lengths = [8, 4, 4, 4, 12];
        if groups.len() != lengths.len()
            || groups.iter().zip(lengths).any(|(g, len)| g.len() != len)
        {
            return Err(err());
        }

        let hex: String = groups.concat();
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        u128::from_str_radix(&hex, 16).map(Self).map_err(|_| err())
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
