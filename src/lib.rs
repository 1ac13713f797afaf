//! adapterctl: virtual network adapter lifecycle management
//!
//! A library for creating TUN-style virtual adapters through a pluggable
//! driver backend, configuring their IP interface (MTU, metric) and
//! releasing them exactly once.

pub mod adapter;
pub mod config;
pub mod interface;
pub mod native;
pub mod provision;

#[cfg(test)]
mod test_fixtures;
