//! Records shared by the Conekta bridge crates.
//!
//! Payloads that travel to and from the Conekta API are kept as
//! [`serde_json::Value`]: the bridge forwards them without reshaping, so the
//! only local interpretation lives in the structural predicates of
//! [`validation`] and in the webhook envelope of [`webhook`].

pub mod validation;
pub mod webhook;

pub use validation::{
    FieldError, charge_field_errors, customer_field_errors, is_valid_charge, is_valid_customer,
    is_valid_order, order_field_errors,
};
pub use webhook::{WebhookAck, WebhookCategory, WebhookEvent};

/// Production base URL of the Conekta API.
pub const CONEKTA_API_BASE: &str = "https://api.conekta.io";

/// Media type selecting the Conekta API version the bridge speaks.
pub const CONEKTA_ACCEPT_HEADER: &str = "application/vnd.conekta-v2.1.0+json";

/// Environment variable holding the private Conekta API key.
pub const API_KEY_ENV: &str = "CONEKTA_API_KEY";

/// Environment variable holding the HTTP port of the REST adapter.
pub const PORT_ENV: &str = "PORT";

/// Port used when [`PORT_ENV`] is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Path prefix under which every REST route is mounted.
pub const ROUTE_PREFIX: &str = "/mcp";
