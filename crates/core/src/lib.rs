//! Conekta bridge core
//!
//! - [`client`]: the [`ConektaApi`] seam and its `reqwest` implementation
//! - [`service`]: one operation per upstream action, every failure normalized
//!   into a [`ServiceError`]
//! - [`api`]: the REST adapter (axum router) in front of the service

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiRequest, ApiResponse, ConektaApi, ConektaClient, TransportError};
pub use config::{ClientConfig, Locale, UnknownLocale};
pub use error::ServiceError;
pub use service::{Operation, PaymentService};
