use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use crate::{api::JsonBody, error::ServiceError, service::PaymentService};

/// POST /mcp/orders/:id/refunds - Refund an order
///
/// The payload is forwarded as-is; Conekta decides what a valid refund is.
pub async fn create_refund(
    State(service): State<PaymentService>,
    Path(order_id): Path<String>,
    JsonBody(payload): JsonBody,
) -> Result<Json<Value>, ServiceError> {
    service.create_refund(&order_id, payload).await.map(Json)
}
