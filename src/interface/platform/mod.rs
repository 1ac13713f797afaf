//! Platform-specific interface table implementations.
//!
//! # Platform Support
//!
//! - **Windows**: `MIB_IPINTERFACE_ROW` via the IP Helper API.

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::IpHelperTable;

// Re-export platform-specific table as PlatformTable for convenience
#[cfg(windows)]
pub use windows::IpHelperTable as PlatformTable;
