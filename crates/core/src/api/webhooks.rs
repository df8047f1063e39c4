use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use conekta_bridge_types::{WebhookAck, WebhookCategory, WebhookEvent};
use serde_json::json;
use tracing::{debug, error, info};

use crate::service::PaymentService;

/// POST /mcp/webhooks - Receive a Conekta event notification
///
/// Every event that parses is acknowledged, handled or not. Signatures are
/// not verified.
pub async fn receive_webhook(State(service): State<PaymentService>, body: Bytes) -> Response {
    let event = match serde_json::from_slice::<WebhookEvent>(&body) {
        Ok(event) => event,
        Err(e) => {
            error!("Failed to parse webhook payload: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": service.locale().internal_error_message() })),
            )
                .into_response();
        }
    };

    dispatch(&event);

    (StatusCode::OK, Json(WebhookAck::for_event(&event))).into_response()
}

fn dispatch(event: &WebhookEvent) {
    let category = event.category();
    let object_id = event.object_id().unwrap_or("unknown");

    match category {
        WebhookCategory::Unhandled => {
            info!(event_type = %event.event_type, "Unhandled webhook event");
        }
        _ => {
            info!(
                event_type = %event.event_type,
                object_id = %object_id,
                "{}",
                category.description()
            );
        }
    }

    if let Some(data) = &event.data {
        debug!(event_type = %event.event_type, data = %data, "Webhook payload");
    }
}
