//! Rotor - Round-Robin HTTP Load Balancer
//!
//! Core library for HTTP handling, backend pooling, and request dispatch.

pub mod config;
pub mod http;
pub mod proxy;
pub mod server;
