//! Load-balancing core
//!
//! This module implements backend management, round-robin peer selection,
//! and per-request dispatch.

pub mod backend;
pub mod dispatcher;
pub mod forwarder;
pub mod pool;

pub use backend::Backend;
pub use dispatcher::Dispatcher;
pub use forwarder::Forwarder;
pub use pool::ServerPool;
