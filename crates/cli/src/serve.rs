use std::time::Duration;

use conekta_bridge_core::{ClientConfig, Locale, PaymentService, api::start_server};
use conekta_bridge_types::{API_KEY_ENV, CONEKTA_API_BASE, DEFAULT_PORT, PORT_ENV, ROUTE_PREFIX};
use console::{StyledObject, style};
use url::Url;

use crate::CommandError;

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct ServeCommand {
    /// Port to run the server on
    #[arg(long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Conekta private API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the Conekta API
    #[arg(long, env = "CONEKTA_API_BASE", default_value = CONEKTA_API_BASE)]
    pub api_base: Url,

    /// Timeout for each upstream call, in seconds
    #[arg(long, env = "CONEKTA_TIMEOUT_SECS", default_value_t = conekta_bridge_core::config::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Language of fallback error messages (es or en)
    #[arg(long, env = "CONEKTA_LOCALE", default_value = "es")]
    pub locale: Locale,
}

fn get() -> StyledObject<&'static str> {
    style("  GET").yellow()
}

fn post() -> StyledObject<&'static str> {
    style(" POST").magenta()
}

fn put() -> StyledObject<&'static str> {
    style("  PUT").blue()
}

impl ServeCommand {
    pub fn client_config(&self) -> Result<ClientConfig, CommandError> {
        if self.api_key.trim().is_empty() {
            return Err(CommandError::Config(format!("{} must not be empty", API_KEY_ENV)));
        }
        if self.timeout_secs == 0 {
            return Err(CommandError::Config(
                "timeout must be at least one second".to_string(),
            ));
        }

        Ok(ClientConfig::new(self.api_key.clone(), self.api_base.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_locale(self.locale))
    }

    pub async fn execute(&self) -> Result<(), CommandError> {
        let config = self.client_config()?;
        let service = PaymentService::from_config(&config)
            .map_err(|e| CommandError::ClientBuild(e.to_string()))?;

        println!();
        println!("{}{}", style("Conekta").white(), style(" Bridge").green());
        println!(
            "{} {}",
            style("Upstream:").dim(),
            style(self.api_base.as_str()).cyan()
        );
        println!();

        let base = format!("http://localhost:{}{}", self.port, ROUTE_PREFIX);
        println!("# {}", style("Payments API").dim());
        println!(" {} {}/customers", post(), base);
        println!(" {} {}/customers/:id", get(), base);
        println!(" {} {}/customers/:id", put(), base);
        println!(" {} {}/orders", post(), base);
        println!(" {} {}/orders/:id", get(), base);
        println!(" {} {}/orders/:id", put(), base);
        println!(" {} {}/orders/:id/capture", post(), base);
        println!(" {} {}/orders/:id/charges", post(), base);
        println!(" {} {}/orders/:id/refunds", post(), base);
        println!(" {} {}/webhooks", post(), base);
        println!(" {} http://localhost:{}/health", get(), self.port);
        println!();
        println!("{}", style("Press Ctrl+C to stop").dim());
        println!();

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();

        tracing::info!(locale = %self.locale, timeout_secs = self.timeout_secs, "Conekta client ready");

        start_server(service, self.port).await?;
        Ok(())
    }
}
