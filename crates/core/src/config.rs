use std::{fmt, str::FromStr, time::Duration};

use url::Url;

/// Upper bound on a single upstream call when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Upper bound on establishing the upstream connection.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Language of the fallback messages the service produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Es,
    En,
}

#[derive(Debug, thiserror::Error)]
#[error("Unsupported locale '{0}', expected 'es' or 'en'")]
pub struct UnknownLocale(String);

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    /// Message of the 400 returned by validating entry points
    pub fn invalid_payload_message(&self) -> &'static str {
        match self {
            Locale::Es => "Datos inválidos en la solicitud",
            Locale::En => "Invalid request payload",
        }
    }

    /// Message of the 400 returned when a request body is not JSON
    pub fn invalid_body_message(&self) -> &'static str {
        match self {
            Locale::Es => "El cuerpo de la solicitud no es JSON válido",
            Locale::En => "Request body is not valid JSON",
        }
    }

    pub fn internal_error_message(&self) -> &'static str {
        match self {
            Locale::Es => "Error interno del servidor",
            Locale::En => "Internal server error",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// Settings of the upstream Conekta client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: Url,
    pub timeout: Duration,
    pub locale: Locale,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, base_url: Url) -> Self {
        Self {
            api_key: api_key.into(),
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            locale: Locale::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}
