use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event envelope posted by Conekta to the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    /// Kept opaque: only `type` decides whether the event is acknowledged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl WebhookEvent {
    /// Identifier of the resource the event refers to, when the payload has one
    pub fn object_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.pointer("/object/id"))
            .and_then(Value::as_str)
    }

    pub fn category(&self) -> WebhookCategory {
        WebhookCategory::from_event_type(&self.event_type)
    }
}

/// Event types the receiver logs with a dedicated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookCategory {
    OrderCreated,
    OrderPaid,
    OrderCanceled,
    ChargeCreated,
    ChargePaid,
    ChargeDeclined,
    CustomerCreated,
    Unhandled,
}

impl WebhookCategory {
    pub fn from_event_type(event_type: &str) -> Self {
        match event_type {
            "order.created" => Self::OrderCreated,
            "order.paid" => Self::OrderPaid,
            "order.canceled" => Self::OrderCanceled,
            "charge.created" => Self::ChargeCreated,
            "charge.paid" => Self::ChargePaid,
            "charge.declined" => Self::ChargeDeclined,
            "customer.created" => Self::CustomerCreated,
            _ => Self::Unhandled,
        }
    }

    /// Human-readable description used in log lines
    pub fn description(&self) -> &'static str {
        match self {
            Self::OrderCreated => "New order created",
            Self::OrderPaid => "Order paid",
            Self::OrderCanceled => "Order canceled",
            Self::ChargeCreated => "New charge created",
            Self::ChargePaid => "Charge paid",
            Self::ChargeDeclined => "Charge declined",
            Self::CustomerCreated => "New customer created",
            Self::Unhandled => "Unhandled event",
        }
    }
}

/// Acknowledgement body returned for every parseable webhook event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
    pub event_type: String,
}

impl WebhookAck {
    pub fn for_event(event: &WebhookEvent) -> Self {
        Self {
            received: true,
            event_type: event.event_type.clone(),
        }
    }
}
