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

/// POST /mcp/orders/:id/charges - Create a charge for an order
pub async fn create_charge(
    State(service): State<PaymentService>,
    Path(order_id): Path<String>,
    QueryParams(params): QueryParams<CreateParams>,
    JsonBody(payload): JsonBody,
) -> Result<Json<Value>, ServiceError> {
    let charge = if params.validate {
        service.create_charge_validated(&order_id, payload).await?
    } else {
        service.create_charge(&order_id, payload).await?
    };
    Ok(Json(charge))
}
