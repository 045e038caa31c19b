//! Network-facing infrastructure: the per-station subscriber registry
//! and the connection multiplexer that feeds it.

pub mod multiplexer;
pub mod registry;

pub use multiplexer::ConnectionMultiplexer;
pub use registry::SubscriberRegistry;
