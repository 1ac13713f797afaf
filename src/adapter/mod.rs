//! Adapter handle manager.
//!
//! This module provides types and traits for:
//! - Describing an adapter to create ([`CreationRequest`], [`TypeTag`])
//! - Owning the native adapter resource ([`AdapterManager`], [`AdapterHandle`])
//! - Deriving the adapter's stable identity ([`AdapterIdentity`])
//! - Plugging in a native driver ([`DriverBackend`], [`platform`])

mod driver;
mod error;
mod identity;
mod manager;
pub mod platform;
mod request;
mod tag;


pub use driver::{CreatedAdapter, DriverBackend};
pub use error::{CreationError, QueryError, ReleaseError};
pub use identity::AdapterIdentity;
pub use manager::{AdapterHandle, AdapterManager, HandleState};
pub use request::{AdapterName, CreationRequest, MAX_ADAPTER_NAME, NameError};
pub use tag::{ParseTagError, TypeTag};
