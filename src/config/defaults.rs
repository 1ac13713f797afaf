//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;

use crate::adapter::TypeTag;

/// Default tunnel type, shared by every adapter this tool creates.
pub const TUNNEL_TYPE: TypeTag = TypeTag::from_u128(0x5A1F_6A3C_8E2B_4F1D_9C07_3B6D_2E4A_5F10);

/// Default interface MTU in bytes.
pub const MTU: u32 = 1500;

/// Default driver library path.
pub const LIBRARY: &str = "wintun.dll";

/// Default driver library path as `PathBuf`.
#[must_use]
pub fn library() -> PathBuf {
    PathBuf::from(LIBRARY)
}
