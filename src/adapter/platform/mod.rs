//! Platform-specific driver backends.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`DriverBackend`](super::DriverBackend) trait.
//!
//! # Platform Support
//!
//! - **Windows**: Loads `wintun.dll` at runtime via `libloading`.
//! - **Linux / macOS**: Not supported; TUN devices there need no driver DLL.

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::{DriverLoadError, WintunDriver, WintunHandle};

// Re-export platform-specific driver as PlatformDriver for convenience
#[cfg(windows)]
pub use windows::WintunDriver as PlatformDriver;
