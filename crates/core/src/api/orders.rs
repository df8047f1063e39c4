use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use crate::{
    api::{CreateParams, JsonBody, QueryParams},
    error::ServiceError,
    service::PaymentService,
};

/// POST /mcp/orders - Create an order
pub async fn create_order(
    State(service): State<PaymentService>,
    QueryParams(params): QueryParams<CreateParams>,
    JsonBody(payload): JsonBody,
) -> Result<Json<Value>, ServiceError> {
    let order = if params.validate {
        service.create_order_validated(payload).await?
    } else {
        service.create_order(payload).await?
    };
    Ok(Json(order))
}

/// GET /mcp/orders/:id - Retrieve an order
pub async fn get_order(
    State(service): State<PaymentService>,
    Path(order_id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    service.get_order(&order_id).await.map(Json)
}

/// PUT /mcp/orders/:id - Update an order with a partial payload
pub async fn update_order(
    State(service): State<PaymentService>,
    Path(order_id): Path<String>,
    JsonBody(payload): JsonBody,
) -> Result<Json<Value>, ServiceError> {
    service.update_order(&order_id, payload).await.map(Json)
}

/// POST /mcp/orders/:id/capture - Capture a pre-authorized order
pub async fn capture_order(
    State(service): State<PaymentService>,
    Path(order_id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    service.capture_order(&order_id).await.map(Json)
}
