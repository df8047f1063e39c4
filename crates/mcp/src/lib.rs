use std::path::PathBuf;

use rmcp::{ServiceExt, transport::stdio};

pub use crate::server::ConektaMcp;

pub mod docs;
mod server;
pub mod widget;

pub const DEFAULT_DOCS_DIR: &str = "./data";

#[derive(PartialEq, Clone, Debug)]
pub struct McpOptions {
    /// Directory holding the Markdown documentation files
    pub docs_dir: PathBuf,
}

impl Default for McpOptions {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
        }
    }
}

pub async fn run_server(opts: &McpOptions) -> Result<(), String> {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(docs_dir = %opts.docs_dir.display(), "Starting MCP server");

    let service = ConektaMcp::new(opts.docs_dir.clone())
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })
        .map_err(|e| e.to_string())?;

    service.waiting().await.map_err(|e| e.to_string())?;
    Ok(())
}
