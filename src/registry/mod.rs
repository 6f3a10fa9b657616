//! Registry layer: the management substrate and the gateway in front of it.
//!
//! [`ManagementRegistry`] is the interface the bridge needs from a
//! monitoring substrate, [`RegistryGateway`] the facade that makes an
//! absent substrate a no-op, and [`InMemoryRegistry`] an in-process
//! substrate.

pub mod gateway;
pub mod memory;
pub mod substrate;

pub use gateway::RegistryGateway;
pub use memory::InMemoryRegistry;
pub use substrate::ManagementRegistry;
