//! Rendering of the self-contained HTML documents that embed Conekta's hosted
//! payment widget.
//!
//! Rendering is pure: the same [`WidgetConfig`] always produces the same
//! bytes, and nothing is read from or written to the outside world.

use std::fmt::Write as _;

use rmcp::schemars;
use serde::{Deserialize, Serialize};

pub const CHECKOUT_SCRIPT_URL: &str = "https://pay.conekta.com/v1.0/js/conekta-checkout.min.js";
pub const WIDGET_LOCALE: &str = "es";

pub const DEFAULT_CONTAINER_ID: &str = "conekta-checkout";
pub const DEFAULT_COLOR_PRIMARY: &str = "#081133";
pub const DEFAULT_COLOR_TEXT: &str = "#585987";
pub const DEFAULT_COLOR_LABEL: &str = "#585987";
pub const DEFAULT_HEIGHT: &str = "714px";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WidgetError {
    #[error(
        "checkoutRequestId is required to render the checkout component. Create a checkout request from your backend and pass its id."
    )]
    MissingCheckoutRequestId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum BackgroundMode {
    #[default]
    LightMode,
    DarkMode,
}

impl BackgroundMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundMode::LightMode => "lightMode",
            BackgroundMode::DarkMode => "darkMode",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
    #[default]
    MinimalMode,
    FlatMode,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::MinimalMode => "minimalMode",
            InputType::FlatMode => "flatMode",
        }
    }
}

/// Caller-supplied widget parameters. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Conekta public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Checkout request ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_request_id: Option<String>,
    /// Container element ID (default: 'conekta-checkout')
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    /// Primary color for buttons and borders (default: '#081133')
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_primary: Option<String>,
    /// Text color for titles (default: '#585987')
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_text: Option<String>,
    /// Label color for inputs (default: '#585987')
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_label: Option<String>,
    /// Background mode (default: 'lightMode')
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_mode: Option<BackgroundMode>,
    /// Input type (default: 'minimalMode')
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    /// Auto-resize component to content (default: false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_resize: Option<bool>,
    /// Fixed height for component (default: '714px')
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

/// A [`WidgetConfig`] with every default applied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedWidgetConfig {
    pub public_key: String,
    pub checkout_request_id: String,
    pub container_id: String,
    pub color_primary: String,
    pub color_text: String,
    pub color_label: String,
    pub background_mode: BackgroundMode,
    pub input_type: InputType,
    pub auto_resize: bool,
    pub height: String,
}

impl WidgetConfig {
    pub fn resolve(&self) -> ResolvedWidgetConfig {
        let or = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };
        ResolvedWidgetConfig {
            public_key: or(&self.public_key, ""),
            checkout_request_id: or(&self.checkout_request_id, ""),
            container_id: or(&self.container_id, DEFAULT_CONTAINER_ID),
            color_primary: or(&self.color_primary, DEFAULT_COLOR_PRIMARY),
            color_text: or(&self.color_text, DEFAULT_COLOR_TEXT),
            color_label: or(&self.color_label, DEFAULT_COLOR_LABEL),
            background_mode: self.background_mode.unwrap_or_default(),
            input_type: self.input_type.unwrap_or_default(),
            auto_resize: self.auto_resize.unwrap_or(false),
            height: or(&self.height, DEFAULT_HEIGHT),
        }
    }
}

impl ResolvedWidgetConfig {
    /// Blank ids count as absent
    pub fn has_checkout_request_id(&self) -> bool {
        !self.checkout_request_id.trim().is_empty()
    }
}

/// Render the full checkout variant.
pub fn render_checkout(config: &WidgetConfig) -> Result<String, WidgetError> {
    let resolved = config.resolve();
    if !resolved.has_checkout_request_id() {
        return Err(WidgetError::MissingCheckoutRequestId);
    }

    let callbacks = r#"      const callbacks = {
        onGetInfoSuccess: function (loadingTime) {
          console.log('Component loaded successfully. Loading time:', loadingTime.initLoadTime, 'ms');
        },
        onFinalizePayment: function (order) {
          console.log('Payment completed successfully:', JSON.stringify(order));
          // Add your success logic here
        },
        onErrorPayment: function (error) {
          console.error('Payment error:', error);
          // Add your error handling logic here
        },
      };
"#;
    let mount = r#"      window.ConektaCheckoutComponents.Integration({
        config,
        callbacks,
        options
      });
"#;

    Ok(render_document(
        "Conekta Checkout",
        &resolved,
        true,
        callbacks,
        mount,
    ))
}

/// Render the card tokenizer variant. `checkoutRequestId` is optional here.
pub fn render_tokenizer(config: &WidgetConfig) -> String {
    let resolved = config.resolve();
    let include_request_id = resolved.has_checkout_request_id();

    let callbacks = r#"      const callbacks = {
        onGetInfoSuccess: function (loadingTime) {
          console.log('Component loaded successfully. Loading time:', loadingTime.initLoadTime, 'ms');
        },
        onCreateTokenSucceeded: function (token) {
          console.log('Token created successfully:', token.id);
          // Send token.id to your backend to create the charge
        },
        onCreateTokenError: function (error) {
          console.error('Token creation error:', error);
          // Add your error handling logic here
        },
      };
"#;
    let mount = r#"      window.ConektaCheckoutComponents.Card({
        config,
        callbacks,
        options,
        allowTokenization: true
      });
"#;

    render_document(
        "Conekta Card Tokenizer",
        &resolved,
        include_request_id,
        callbacks,
        mount,
    )
}

fn render_document(
    title: &str,
    config: &ResolvedWidgetConfig,
    include_request_id: bool,
    callbacks: &str,
    mount: &str,
) -> String {
    let container_id = escape_html_attr(&config.container_id);
    let container_style = if config.auto_resize {
        String::new()
    } else {
        format!(r#" style="height: {}""#, escape_html_attr(&config.height))
    };

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>{title}</title>
    <script
      crossorigin
      src="{CHECKOUT_SCRIPT_URL}"
    ></script>
  </head>
  <body>
    <div id="{container_id}"{container_style}></div>
    <script type="text/javascript">
      const options = {{
        backgroundMode: '{background_mode}',
        colorPrimary: '{color_primary}',
        colorText: '{color_text}',
        colorLabel: '{color_label}',
        inputType: '{input_type}',
"#,
        background_mode = config.background_mode.as_str(),
        color_primary = escape_js_string(&config.color_primary),
        color_text = escape_js_string(&config.color_text),
        color_label = escape_js_string(&config.color_label),
        input_type = config.input_type.as_str(),
    );
    if config.auto_resize {
        out.push_str("        autoResize: true,\n");
    }
    out.push_str("      };\n\n");

    let _ = write!(
        out,
        r#"      const config = {{
        locale: '{WIDGET_LOCALE}',
        publicKey: '{public_key}',
        targetIFrame: '#{target}',
"#,
        public_key = escape_js_string(&config.public_key),
        target = escape_js_string(&config.container_id),
    );
    if include_request_id {
        let _ = writeln!(
            out,
            "        checkoutRequestId: '{}',",
            escape_js_string(&config.checkout_request_id)
        );
    }
    out.push_str("      };\n\n");

    out.push_str(callbacks);
    out.push('\n');
    out.push_str(mount);
    out.push_str("    </script>\n  </body>\n</html>");
    out
}

/// Escape a value for a double-quoted HTML attribute.
pub fn escape_html_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for a single-quoted JavaScript string inside a `<script>`
/// element.
pub fn escape_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            // Keeps `</script>` and `<!--` from terminating the element
            '<' => out.push_str("\\x3C"),
            '>' => out.push_str("\\x3E"),
            '&' => out.push_str("\\x26"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout_config() -> WidgetConfig {
        WidgetConfig {
            public_key: Some("key_public_123".to_string()),
            checkout_request_id: Some("4f2a9c1e-req".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let resolved = WidgetConfig::default().resolve();
        assert_eq!(resolved.public_key, "");
        assert_eq!(resolved.checkout_request_id, "");
        assert_eq!(resolved.container_id, "conekta-checkout");
        assert_eq!(resolved.color_primary, "#081133");
        assert_eq!(resolved.color_text, "#585987");
        assert_eq!(resolved.color_label, "#585987");
        assert_eq!(resolved.background_mode, BackgroundMode::LightMode);
        assert_eq!(resolved.input_type, InputType::MinimalMode);
        assert!(!resolved.auto_resize);
        assert_eq!(resolved.height, "714px");
    }

    #[test]
    fn test_config_deserializes_camel_case() {
        let config: WidgetConfig = serde_json::from_str(
            r#"{"checkoutRequestId":"req_1","backgroundMode":"darkMode","inputType":"flatMode","autoResize":true}"#,
        )
        .unwrap();
        let resolved = config.resolve();
        assert_eq!(resolved.checkout_request_id, "req_1");
        assert_eq!(resolved.background_mode, BackgroundMode::DarkMode);
        assert_eq!(resolved.input_type, InputType::FlatMode);
        assert!(resolved.auto_resize);
    }

    #[test]
    fn test_checkout_requires_request_id() {
        assert_eq!(
            render_checkout(&WidgetConfig::default()),
            Err(WidgetError::MissingCheckoutRequestId)
        );
    }

    #[test]
    fn test_checkout_fixed_height() {
        let html = render_checkout(&checkout_config()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(CHECKOUT_SCRIPT_URL));
        assert!(html.contains(r#"<div id="conekta-checkout" style="height: 714px"></div>"#));
        assert!(!html.contains("autoResize"));
        assert!(html.contains("locale: 'es'"));
        assert!(html.contains("publicKey: 'key_public_123'"));
        assert!(html.contains("targetIFrame: '#conekta-checkout'"));
        assert!(html.contains("checkoutRequestId: '4f2a9c1e-req'"));
        assert!(html.contains("onFinalizePayment"));
        assert!(html.contains("onErrorPayment"));
        assert!(html.contains("window.ConektaCheckoutComponents.Integration("));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_auto_resize_drops_height() {
        let config = WidgetConfig {
            auto_resize: Some(true),
            height: Some("900px".to_string()),
            ..checkout_config()
        };
        let html = render_checkout(&config).unwrap();

        assert!(!html.contains(r#"style="height:"#));
        assert!(html.contains("autoResize: true,"));
        assert!(html.contains(r#"<div id="conekta-checkout"></div>"#));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let config = checkout_config();
        assert_eq!(render_checkout(&config), render_checkout(&config));
        assert_eq!(render_tokenizer(&config), render_tokenizer(&config));
    }

    #[test]
    fn test_tokenizer_omits_empty_request_id() {
        let html = render_tokenizer(&WidgetConfig::default());

        assert!(!html.contains("checkoutRequestId"));
        assert!(html.contains("onCreateTokenSucceeded"));
        assert!(html.contains("onCreateTokenError"));
        assert!(!html.contains("onFinalizePayment"));
        assert!(html.contains("window.ConektaCheckoutComponents.Card("));
        assert!(html.contains(r#"style="height: 714px""#));

        let html = render_tokenizer(&checkout_config());
        assert!(html.contains("checkoutRequestId: '4f2a9c1e-req'"));
    }

    #[test]
    fn test_blank_request_id_is_absent_in_both_variants() {
        let config = WidgetConfig {
            checkout_request_id: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            render_checkout(&config),
            Err(WidgetError::MissingCheckoutRequestId)
        );
        assert!(!render_tokenizer(&config).contains("checkoutRequestId"));
    }

    #[test]
    fn test_values_cannot_break_out_of_markup() {
        let config = WidgetConfig {
            container_id: Some(r#"box" onload="alert(1)"#.to_string()),
            public_key: Some("key'</script><script>alert(1)//".to_string()),
            height: Some(r#"1px"><img src=x>"#.to_string()),
            ..checkout_config()
        };
        let html = render_checkout(&config).unwrap();

        assert!(html.contains(r#"id="box&quot; onload=&quot;alert(1)""#));
        assert!(html.contains(r#"style="height: 1px&quot;&gt;&lt;img src=x&gt;""#));
        assert!(html.contains(r"publicKey: 'key\'\x3C/script\x3E\x3Cscript\x3Ealert(1)//'"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_escape_helpers() {
        assert_eq!(escape_html_attr("a&b"), "a&amp;b");
        assert_eq!(escape_js_string("line\nbreak\\"), "line\\nbreak\\\\");
        assert_eq!(escape_js_string("#081133"), "#081133");
    }
}
