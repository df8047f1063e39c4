use std::{path::Path, process};

use clap::{Parser, Subcommand};

mod mcp;
mod serve;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to build Conekta client: {0}")]
    ClientBuild(String),
    #[error("Failed to start REST server: {0}")]
    Server(#[from] std::io::Error),
    #[error("MCP server failed: {0}")]
    Mcp(String),
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Conekta bridge - REST proxy and MCP tools for Conekta payments", long_about = None)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// Start the REST bridge in front of the Conekta API
    Serve(serve::ServeCommand),
    /// Serve the payment component tools over stdio
    Mcp(mcp::McpCommand),
}

#[tokio::main]
async fn main() {
    // Loaded before parsing so clap's `env` fallbacks see it
    load_env_file(Path::new("."));

    let opts: Opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            let _ = e.print();
            process::exit(e.exit_code());
        }
    };

    if let Err(e) = handle_command(opts).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Load environment variables from a .env file in `dir`
fn load_env_file(dir: &Path) {
    let env_file_path = dir.join(".env");

    match dotenvy::from_path(&env_file_path) {
        Ok(_) => {
            // stdout is reserved for the MCP protocol
            eprintln!("✓ Loaded environment from {}", env_file_path.display());
        }
        Err(e) if e.not_found() => {}
        Err(e) => {
            eprintln!(
                "Warning: Failed to load .env file at {}: {}",
                env_file_path.display(),
                e
            );
        }
    }
}

async fn handle_command(opts: Opts) -> Result<(), CommandError> {
    match opts.command {
        Command::Serve(cmd) => cmd.execute().await,
        Command::Mcp(cmd) => cmd.execute().await,
    }
}
