//! Core library for the `clima` weather app.
//!
//! This crate defines:
//! - The weather fetch service (request building, HTTP transport, decoding)
//! - Shared domain models (queries, results, condition icons)
//! - Typed fetch errors
//! - Configuration & credentials handling
//!
//! It is used by `clima-cli`, but any shell that can await a future can drive it.

pub mod condition;
pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod transport;

pub use condition::Condition;
pub use config::{Config, ServiceConfig};
pub use error::{DecodeError, FetchError, FetchErrorKind, TransportError};
pub use model::{WeatherQuery, WeatherResult};
pub use service::WeatherService;
pub use transport::{HttpTransport, Transport};
