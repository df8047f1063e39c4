use std::path::PathBuf;

use conekta_bridge_mcp::{DEFAULT_DOCS_DIR, McpOptions, run_server};

use crate::CommandError;

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct McpCommand {
    /// Directory containing the payment component documentation
    #[arg(long, env = "CONEKTA_DOCS_DIR", default_value = DEFAULT_DOCS_DIR)]
    pub docs_dir: PathBuf,
}

impl McpCommand {
    pub async fn execute(&self) -> Result<(), CommandError> {
        let opts = McpOptions {
            docs_dir: self.docs_dir.clone(),
        };
        run_server(&opts).await.map_err(CommandError::Mcp)
    }
}
