//! Template Renderer
//!
//! Resolves a status key to a message body (stored template first, built-in
//! default second, generic fallback last) and substitutes `{name}` tokens.

use std::collections::HashMap;
use std::sync::Arc;

use shared::models::OrderStatus;

use super::traits::TemplateStore;

/// Variables available to a template, keyed by placeholder name
pub type TemplateVars = HashMap<String, String>;

/// Used when the status key is outside the known vocabulary
pub const GENERIC_TEMPLATE: &str =
    "Hello {customerName},\\nYour order {orderNumber} is now: {status}.";

/// Built-in template for a known status
pub fn default_template(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => {
            "Hello {customerName},\\nWe received your order {orderNumber} ({totalAmount}). We will confirm it shortly."
        }
        OrderStatus::Confirmed => {
            "Hello {customerName},\\nYour order {orderNumber} is confirmed.\\nTotal: {totalAmount}\\nDelivery: {deliveryDate} {deliveryTime}"
        }
        OrderStatus::Preparing => {
            "Hello {customerName},\\nYour order {orderNumber} is being prepared."
        }
        OrderStatus::Ready => {
            "Hello {customerName},\\nYour order {orderNumber} is ready and waiting for a driver."
        }
        OrderStatus::OutForDelivery => {
            "Hello {customerName},\\nYour order {orderNumber} is on its way!\\nExpected: {deliveryDate} {deliveryTime}"
        }
        OrderStatus::Delivered => {
            "Hello {customerName},\\nYour order {orderNumber} has been delivered. Thank you!"
        }
        OrderStatus::Cancelled => {
            "Hello {customerName},\\nYour order {orderNumber} has been cancelled. Contact us for any question."
        }
    }
}

fn fallback_template(status_key: &str) -> &'static str {
    OrderStatus::parse(status_key).map_or(GENERIC_TEMPLATE, default_template)
}

/// Turn literal `\n` sequences into line breaks
pub fn unescape_newlines(template: &str) -> String {
    template.replace("\\r\\n", "\n").replace("\\n", "\n")
}

/// Replace every `{name}` token; unknown names become empty.
///
/// Only identifier-like tokens (`[A-Za-z0-9_]+`) are placeholders, any other
/// brace is kept as written.
pub fn substitute(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close)
                if close > 0
                    && after[..close]
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
            {
                let name = &after[..close];
                if let Some(value) = vars.get(name) {
                    out.push_str(value);
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Renders customer messages from stored or built-in templates
#[derive(Clone)]
pub struct TemplateRenderer {
    store: Arc<dyn TemplateStore>,
}

impl TemplateRenderer {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Render the message for `status_key`.
    ///
    /// Never fails: a template store error is logged and the default is used.
    pub async fn render(&self, status_key: &str, vars: &TemplateVars) -> String {
        let template = match self.store.get_template(status_key).await {
            Ok(Some(body)) if !body.trim().is_empty() => body,
            Ok(_) => fallback_template(status_key).to_string(),
            Err(e) => {
                tracing::warn!(
                    status = %status_key,
                    error = %e,
                    "Template lookup failed, using built-in default"
                );
                fallback_template(status_key).to_string()
            }
        };

        substitute(&unescape_newlines(&template), vars)
    }
}
