use std::sync::Arc;

use conekta_bridge_types::{
    FieldError, charge_field_errors, customer_field_errors, order_field_errors,
};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    client::{ApiRequest, ApiResponse, ConektaApi, ConektaClient, TransportError},
    config::{ClientConfig, Locale},
    error::ServiceError,
};

/// Upstream actions the service can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateCustomer,
    GetCustomer,
    UpdateCustomer,
    CreateOrder,
    GetOrder,
    UpdateOrder,
    CaptureOrder,
    CreateCharge,
    CreateRefund,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateCustomer => "create_customer",
            Operation::GetCustomer => "get_customer",
            Operation::UpdateCustomer => "update_customer",
            Operation::CreateOrder => "create_order",
            Operation::GetOrder => "get_order",
            Operation::UpdateOrder => "update_order",
            Operation::CaptureOrder => "capture_order",
            Operation::CreateCharge => "create_charge",
            Operation::CreateRefund => "create_refund",
        }
    }

    /// Message used when the upstream error carries none of its own
    pub fn default_message(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Operation::CreateCustomer, Locale::Es) => "Error al crear el cliente",
            (Operation::CreateCustomer, Locale::En) => "Error creating the customer",
            (Operation::GetCustomer, Locale::Es) => "Error al obtener el cliente",
            (Operation::GetCustomer, Locale::En) => "Error retrieving the customer",
            (Operation::UpdateCustomer, Locale::Es) => "Error al actualizar el cliente",
            (Operation::UpdateCustomer, Locale::En) => "Error updating the customer",
            (Operation::CreateOrder, Locale::Es) => "Error al crear la orden",
            (Operation::CreateOrder, Locale::En) => "Error creating the order",
            (Operation::GetOrder, Locale::Es) => "Error al obtener la orden",
            (Operation::GetOrder, Locale::En) => "Error retrieving the order",
            (Operation::UpdateOrder, Locale::Es) => "Error al actualizar la orden",
            (Operation::UpdateOrder, Locale::En) => "Error updating the order",
            (Operation::CaptureOrder, Locale::Es) => "Error al capturar la orden",
            (Operation::CaptureOrder, Locale::En) => "Error capturing the order",
            (Operation::CreateCharge, Locale::Es) => "Error al procesar el cargo",
            (Operation::CreateCharge, Locale::En) => "Error processing the charge",
            (Operation::CreateRefund, Locale::Es) => "Error al procesar el reembolso",
            (Operation::CreateRefund, Locale::En) => "Error processing the refund",
        }
    }
}

/// Normalize the outcome of one upstream call.
///
/// Success yields the decoded body untouched. Every failure becomes a
/// [`ServiceError`]: the upstream status (or 500), the upstream `message`
/// (or the operation default) and the upstream body (or a description of the
/// transport failure) as details.
pub fn normalize(
    operation: Operation,
    locale: Locale,
    outcome: Result<ApiResponse, TransportError>,
) -> Result<Value, ServiceError> {
    let default_message = operation.default_message(locale);

    let response = match outcome {
        Ok(response) => response,
        Err(error) => {
            return Err(
                ServiceError::new(error.status().unwrap_or(500), default_message).with_details(
                    json!({
                        "error": error.to_string(),
                        "kind": error.kind(),
                    }),
                ),
            );
        }
    };

    if response.is_success() {
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&response.body).map_err(|e| {
            ServiceError::internal(default_message).with_details(json!({
                "error": format!("Malformed response from Conekta: {}", e),
                "kind": "decode",
                "body": response.body,
            }))
        });
    }

    let details = if response.body.trim().is_empty() {
        json!({
            "error": format!("Conekta responded with HTTP {} and an empty body", response.status),
            "kind": "status",
        })
    } else {
        serde_json::from_str::<Value>(&response.body)
            .unwrap_or_else(|_| Value::String(response.body.clone()))
    };

    let message = details
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(default_message)
        .to_string();

    Err(ServiceError::new(response.status, message).with_details(details))
}

/// Normalization layer in front of the Conekta API.
///
/// Each operation performs a single upstream call. The plain operations never
/// inspect their payload; the `*_validated` variants run the structural
/// predicates first and fail with a 400 without calling upstream.
#[derive(Clone)]
pub struct PaymentService {
    api: Arc<dyn ConektaApi>,
    locale: Locale,
}

impl PaymentService {
    pub fn new(api: Arc<dyn ConektaApi>, locale: Locale) -> Self {
        Self { api, locale }
    }

    /// Build a service backed by a [`ConektaClient`]
    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = ConektaClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.locale))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    async fn execute(&self, operation: Operation, request: ApiRequest) -> Result<Value, ServiceError> {
        let outcome = self.api.send(request).await;
        let result = normalize(operation, self.locale, outcome);

        match &result {
            Ok(_) => info!(operation = operation.name(), "Conekta operation succeeded"),
            Err(e) => warn!(
                operation = operation.name(),
                status = e.status,
                message = %e.message,
                "Conekta operation failed"
            ),
        }

        result
    }

    fn ensure_valid(&self, errors: Vec<FieldError>) -> Result<(), ServiceError> {
        if errors.is_empty() {
            return Ok(());
        }
        Err(ServiceError::new(400, self.locale.invalid_payload_message())
            .with_details(json!({ "field_errors": errors })))
    }

    pub async fn create_customer(&self, data: Value) -> Result<Value, ServiceError> {
        self.execute(
            Operation::CreateCustomer,
            ApiRequest::post("/customers", Some(data)),
        )
        .await
    }

    pub async fn create_customer_validated(&self, data: Value) -> Result<Value, ServiceError> {
        self.ensure_valid(customer_field_errors(&data))?;
        self.create_customer(data).await
    }

    pub async fn get_customer(&self, customer_id: &str) -> Result<Value, ServiceError> {
        self.execute(
            Operation::GetCustomer,
            ApiRequest::get(format!("/customers/{}", encode(customer_id))),
        )
        .await
    }

    pub async fn update_customer(
        &self,
        customer_id: &str,
        data: Value,
    ) -> Result<Value, ServiceError> {
        self.execute(
            Operation::UpdateCustomer,
            ApiRequest::put(format!("/customers/{}", encode(customer_id)), data),
        )
        .await
    }

    pub async fn create_order(&self, data: Value) -> Result<Value, ServiceError> {
        self.execute(Operation::CreateOrder, ApiRequest::post("/orders", Some(data)))
            .await
    }

    pub async fn create_order_validated(&self, data: Value) -> Result<Value, ServiceError> {
        self.ensure_valid(order_field_errors(&data))?;
        self.create_order(data).await
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Value, ServiceError> {
        self.execute(
            Operation::GetOrder,
            ApiRequest::get(format!("/orders/{}", encode(order_id))),
        )
        .await
    }

    pub async fn update_order(&self, order_id: &str, data: Value) -> Result<Value, ServiceError> {
        self.execute(
            Operation::UpdateOrder,
            ApiRequest::put(format!("/orders/{}", encode(order_id)), data),
        )
        .await
    }

    pub async fn capture_order(&self, order_id: &str) -> Result<Value, ServiceError> {
        self.execute(
            Operation::CaptureOrder,
            ApiRequest::post(format!("/orders/{}/capture", encode(order_id)), None),
        )
        .await
    }

    pub async fn create_charge(&self, order_id: &str, data: Value) -> Result<Value, ServiceError> {
        self.execute(
            Operation::CreateCharge,
            ApiRequest::post(format!("/orders/{}/charges", encode(order_id)), Some(data)),
        )
        .await
    }

    pub async fn create_charge_validated(
        &self,
        order_id: &str,
        data: Value,
    ) -> Result<Value, ServiceError> {
        self.ensure_valid(charge_field_errors(&data))?;
        self.create_charge(order_id, data).await
    }

    pub async fn create_refund(&self, order_id: &str, data: Value) -> Result<Value, ServiceError> {
        self.execute(
            Operation::CreateRefund,
            ApiRequest::post(format!("/orders/{}/refunds", encode(order_id)), Some(data)),
        )
        .await
    }
}

fn encode(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
