//! Infrastructure layer: concrete implementations of the domain
//! boundaries plus the wire/HTTP DTOs.

pub mod dto;
mod persistence;
mod registry;
mod resolver;
pub mod store;

pub use persistence::{PersistenceConfig, PersistenceWorker, QueueFull};
pub use registry::ConnectionRegistry;
pub use resolver::StaticTokenResolver;
