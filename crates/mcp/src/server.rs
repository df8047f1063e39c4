use std::path::PathBuf;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::{Value, json};

use crate::{
    docs::{self, CodeExample, DEFAULT_DOC_FILE},
    widget::{self, ResolvedWidgetConfig, WidgetConfig},
};

pub const SERVER_NAME: &str = "conekta-payment-components";
const DOC_URI_PREFIX: &str = "conekta://docs/";

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ReadDocsRequest {
    /// Documentation filename (default: pagosUnicosComponent.md)
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Clone)]
pub struct ConektaMcp {
    docs_dir: PathBuf,
    tool_router: ToolRouter<ConektaMcp>,
}

#[tool_router]
impl ConektaMcp {
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "readPaymentComponentDocs",
        description = "Read and parse Conekta payment component documentation to understand how to implement embedded checkout components"
    )]
    async fn read_payment_component_docs(
        &self,
        Parameters(request): Parameters<ReadDocsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let filename = request
            .filename
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOC_FILE.to_string());

        let documentation = match docs::read_documentation(&self.docs_dir, &filename) {
            Ok(documentation) => documentation,
            Err(e) => {
                tracing::error!(%filename, error = %e, "Error reading documentation file");
                return Ok(CallToolResult::error(vec![Content::text(format!(
                    "Error: Could not read documentation file {}",
                    filename
                ))]));
            }
        };

        let examples = docs::extract_code_examples(&documentation);
        tracing::debug!(%filename, examples = examples.len(), "Loaded documentation");

        let mut result = CallToolResult::success(vec![Content::text(format_docs_text(
            &filename,
            &documentation,
            &examples,
        ))]);
        result.structured_content = Some(json!({
            "filename": filename,
            "documentation": documentation,
            "codeExamples": examples,
        }));
        Ok(result)
    }

    #[tool(
        name = "generatePaymentComponentHTML",
        description = "Generate HTML code for Conekta payment component based on documentation and custom parameters"
    )]
    async fn generate_payment_component_html(
        &self,
        Parameters(config): Parameters<WidgetConfig>,
    ) -> Result<CallToolResult, McpError> {
        let html = match widget::render_checkout(&config) {
            Ok(html) => html,
            Err(e) => return Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        };
        Ok(html_result(
            "HTML code generated successfully for Conekta payment component:",
            "Copy the HTML code above and replace the publicKey and checkoutRequestId with your actual values. The component will render a complete payment form.",
            html,
            config.resolve(),
        ))
    }

    #[tool(
        name = "generateTokenizerHTML",
        description = "Generate HTML code for the Conekta card tokenizer component, which returns a card token instead of completing a payment"
    )]
    async fn generate_tokenizer_html(
        &self,
        Parameters(config): Parameters<WidgetConfig>,
    ) -> Result<CallToolResult, McpError> {
        Ok(html_result(
            "HTML code generated successfully for Conekta card tokenizer component:",
            "Copy the HTML code above and replace the publicKey with your actual value. Send the token received in onCreateTokenSucceeded to your backend to create the charge.",
            widget::render_tokenizer(&config),
            config.resolve(),
        ))
    }

    #[tool(
        name = "getPaymentComponentConfig",
        description = "Get information about available configuration options for Conekta payment components"
    )]
    async fn get_payment_component_config(&self) -> Result<CallToolResult, McpError> {
        let mut result = CallToolResult::success(vec![Content::text(format_config_text())]);
        result.structured_content = Some(config_info());
        Ok(result)
    }
}

impl ConektaMcp {
    fn doc_resources(&self) -> Vec<Resource> {
        let names = match docs::list_documents(&self.docs_dir) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(docs_dir = %self.docs_dir.display(), error = %e, "Could not list documentation");
                Vec::new()
            }
        };

        names
            .into_iter()
            .map(|name| {
                RawResource {
                    uri: format!("{}{}", DOC_URI_PREFIX, name),
                    title: Some(format!("Conekta documentation: {}", name)),
                    description: Some(
                        "Conekta payment component documentation file".to_string(),
                    ),
                    mime_type: Some("text/markdown".to_string()),
                    name,
                    size: None,
                    icons: None,
                }
                .no_annotation()
            })
            .collect()
    }

    fn read_doc_resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let not_found = || McpError::resource_not_found("resource_not_found", Some(json!({ "uri": uri })));

        let filename = uri.strip_prefix(DOC_URI_PREFIX).ok_or_else(not_found)?;
        let text = docs::read_documentation(&self.docs_dir, filename).map_err(|e| {
            tracing::debug!(%uri, error = %e, "Documentation resource unavailable");
            not_found()
        })?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some("text/markdown".to_string()),
                text,
                meta: None,
            }],
        })
    }
}

fn format_docs_text(filename: &str, documentation: &str, examples: &[CodeExample]) -> String {
    let mut text = format!(
        "Documentación cargada exitosamente desde {}:\n\n{}\n\nEjemplos de código encontrados: {}",
        filename,
        documentation,
        examples.len()
    );
    if !examples.is_empty() {
        text.push_str("\n\nEjemplos extraídos:");
        for (i, example) in examples.iter().enumerate() {
            text.push_str(&format!(
                "\n\n--- Ejemplo {} ({}) ---\n{}",
                i + 1,
                example.kind,
                example.code
            ));
        }
    }
    text
}

fn html_result(
    heading: &str,
    instructions: &str,
    html: String,
    config: ResolvedWidgetConfig,
) -> CallToolResult {
    let text = format!(
        "{heading}\n\n{html}\n\nConfiguration used:\n\
         - Public Key: {}\n\
         - Checkout Request ID: {}\n\
         - Container ID: {}\n\
         - Background Mode: {}\n\
         - Auto Resize: {}\n\
         - Height: {}\n\n\
         Instructions: {instructions}",
        config.public_key,
        config.checkout_request_id,
        config.container_id,
        config.background_mode.as_str(),
        config.auto_resize,
        config.height,
    );

    let mut result = CallToolResult::success(vec![Content::text(text)]);
    result.structured_content = Some(json!({ "html": html, "config": config }));
    result
}

type ConfigSection = (&'static str, &'static str, &'static [(&'static str, &'static str)]);

/// Configuration reference, in presentation order
const CONFIG_SECTIONS: &[ConfigSection] = &[
    (
        "required",
        "REQUIRED PARAMETERS",
        &[
            ("publicKey", "Your Conekta public key"),
            (
                "checkoutRequestId",
                "The checkout request ID from your backend (optional for the tokenizer)",
            ),
        ],
    ),
    (
        "optional",
        "OPTIONAL PARAMETERS",
        &[
            ("containerId", "HTML element ID for the component container"),
            ("colorPrimary", "Primary color for buttons and borders (hex color)"),
            ("colorText", "Text color for titles (hex color)"),
            ("colorLabel", "Label color for inputs (hex color)"),
            ("backgroundMode", "lightMode or darkMode"),
            ("inputType", "minimalMode or flatMode"),
            (
                "autoResize",
                "true/false - whether component should auto-resize to content",
            ),
            ("height", "Fixed height when autoResize is false (e.g., '714px')"),
        ],
    ),
    (
        "callbacks",
        "AVAILABLE CALLBACKS",
        &[
            ("onGetInfoSuccess", "Called when component loads successfully"),
            ("onFinalizePayment", "Called when payment is completed (checkout)"),
            ("onErrorPayment", "Called when payment fails (checkout)"),
            ("onCreateTokenSucceeded", "Called with the card token (tokenizer)"),
            ("onCreateTokenError", "Called when tokenization fails (tokenizer)"),
        ],
    ),
    (
        "examples",
        "USAGE EXAMPLES",
        &[
            (
                "Basic usage",
                "Use generatePaymentComponentHTML with just publicKey and checkoutRequestId",
            ),
            (
                "Custom styling",
                "Add colorPrimary, colorText, backgroundMode for custom styling",
            ),
            ("Responsive", "Set autoResize: true for responsive component"),
            (
                "Tokenizer",
                "Use generateTokenizerHTML with publicKey to collect a card token",
            ),
        ],
    ),
];

fn config_info() -> Value {
    let sections = CONFIG_SECTIONS
        .iter()
        .map(|(key, _, entries)| {
            let entries = entries
                .iter()
                .map(|(name, description)| (name.to_string(), json!(description)))
                .collect::<serde_json::Map<_, _>>();
            (key.to_string(), Value::Object(entries))
        })
        .collect::<serde_json::Map<_, _>>();
    Value::Object(sections)
}

fn format_config_text() -> String {
    let mut text = "Conekta Payment Component Configuration Options:".to_string();
    for (_, title, entries) in CONFIG_SECTIONS {
        text.push_str(&format!("\n\n{}:", title));
        for (name, description) in *entries {
            text.push_str(&format!("\n- {}: {}", name, description));
        }
    }
    text
}

#[tool_handler]
impl ServerHandler for ConektaMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(r#"Conekta Payment Components MCP Server

## Available Tools

### readPaymentComponentDocs
Reads a Markdown documentation file (default: pagosUnicosComponent.md) and extracts its html and javascript examples.

### generatePaymentComponentHTML
Generates a complete HTML page embedding the Conekta checkout component. Requires checkoutRequestId.

### generateTokenizerHTML
Generates a complete HTML page embedding the Conekta card tokenizer. checkoutRequestId is optional.

### getPaymentComponentConfig
Lists the configuration options, callbacks and usage examples.

## Resources
- conekta://docs/<filename>: documentation files (text/markdown)
"#.to_string()),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: self.doc_resources(),
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_doc_resource(&uri)
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            next_cursor: None,
            resource_templates: Vec::new(),
        })
    }
}
