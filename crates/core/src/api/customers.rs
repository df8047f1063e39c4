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

/// POST /mcp/customers - Create a customer
pub async fn create_customer(
    State(service): State<PaymentService>,
    QueryParams(params): QueryParams<CreateParams>,
    JsonBody(payload): JsonBody,
) -> Result<Json<Value>, ServiceError> {
    let customer = if params.validate {
        service.create_customer_validated(payload).await?
    } else {
        service.create_customer(payload).await?
    };
    Ok(Json(customer))
}

/// GET /mcp/customers/:id - Retrieve a customer
pub async fn get_customer(
    State(service): State<PaymentService>,
    Path(customer_id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    service.get_customer(&customer_id).await.map(Json)
}

/// PUT /mcp/customers/:id - Update a customer
pub async fn update_customer(
    State(service): State<PaymentService>,
    Path(customer_id): Path<String>,
    JsonBody(payload): JsonBody,
) -> Result<Json<Value>, ServiceError> {
    service.update_customer(&customer_id, payload).await.map(Json)
}
