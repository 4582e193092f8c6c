//! agenda: Contact directory HTTP service with weather-based suggestions, Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
