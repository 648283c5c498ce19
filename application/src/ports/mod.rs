//! Ports (interfaces) for the application layer
//!
//! Ports define the boundaries between the application and the outside world.

pub mod chat_gateway;
pub mod progress;
