//! Infrastructure adapters. Implement ports.
//!
//! HTTP API, weather provider, contact storage, clock. Map errors to DomainError.

pub mod clock;
pub mod http;
pub mod persistence;
pub mod weather;
