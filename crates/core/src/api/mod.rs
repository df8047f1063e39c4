pub mod charges;
pub mod customers;
pub mod orders;
pub mod refunds;
pub mod webhooks;

use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
    routing::{get, post},
};
use conekta_bridge_types::ROUTE_PREFIX;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use crate::{error::ServiceError, service::PaymentService};

/// Query flags accepted by the creation routes
#[derive(Debug, Default, Deserialize)]
pub struct CreateParams {
    /// Run the structural pre-check before calling Conekta
    #[serde(default)]
    pub validate: bool,
}

/// JSON body extractor whose rejections use the [`ServiceError`] shape
pub struct JsonBody(pub Value);

impl FromRequest<PaymentService> for JsonBody {
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &PaymentService) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ServiceError::new(
                StatusCode::BAD_REQUEST.as_u16(),
                state.locale().invalid_body_message(),
            )
            .with_details(json!({ "error": rejection.body_text() }))),
        }
    }
}

/// Query string extractor whose rejections use the [`ServiceError`] shape
pub struct QueryParams<T>(pub T);

impl<T> FromRequestParts<PaymentService> for QueryParams<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PaymentService,
    ) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryParams(value)),
            Err(rejection) => Err(ServiceError::new(
                StatusCode::BAD_REQUEST.as_u16(),
                state.locale().invalid_payload_message(),
            )
            .with_details(json!({ "error": rejection.body_text() }))),
        }
    }
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Create the REST router.
///
/// Resource routes are nested under [`ROUTE_PREFIX`]; `/health` stays at the
/// root.
pub fn create_router(service: PaymentService) -> Router<()> {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let resource_router = Router::new()
        // Customer endpoints
        .route("/customers", post(customers::create_customer))
        .route(
            "/customers/{id}",
            get(customers::get_customer).put(customers::update_customer),
        )
        // Order endpoints
        .route("/orders", post(orders::create_order))
        .route(
            "/orders/{id}",
            get(orders::get_order).put(orders::update_order),
        )
        .route("/orders/{id}/capture", post(orders::capture_order))
        // Order-scoped charges and refunds
        .route("/orders/{id}/charges", post(charges::create_charge))
        .route("/orders/{id}/refunds", post(refunds::create_refund))
        // Conekta event notifications
        .route("/webhooks", post(webhooks::receive_webhook))
        .with_state(service);

    Router::new()
        .route("/health", get(health_check))
        .nest(ROUTE_PREFIX, resource_router)
        .layer(cors_layer)
}

/// Start the REST server on the specified port
pub async fn start_server(service: PaymentService, port: u16) -> std::io::Result<()> {
    let app = create_router(service);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Starting Conekta bridge API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use reqwest::Method;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        client::{ApiResponse, TransportError},
        config::Locale,
        testing::StubConekta,
    };

    fn create_test_app(stub: &Arc<StubConekta>) -> Router {
        create_router(PaymentService::new(stub.clone(), Locale::Es))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let stub = StubConekta::ok(json!({}));
        let response = create_test_app(&stub)
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_order_returns_upstream_body() {
        let order = json!({
            "id": "ord_2tUigJ8DgBhbp6w5D",
            "object": "order",
            "currency": "MXN",
            "amount": 35000
        });
        let stub = StubConekta::ok(order.clone());

        let response = create_test_app(&stub)
            .oneshot(json_request(
                "POST",
                "/mcp/orders",
                json!({
                    "currency": "MXN",
                    "customer_info": {"name": "A", "email": "a@b.com"},
                    "line_items": [{"name": "Box", "unit_price": 35000, "quantity": 1}]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, order);

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/orders");
        assert_eq!(requests[0].body.as_ref().unwrap()["currency"], "MXN");
    }

    #[tokio::test]
    async fn test_upstream_rejection_is_forwarded() {
        let stub = StubConekta::respond(ApiResponse::new(402, r#"{"message":"insufficient_funds"}"#));

        let response = create_test_app(&stub)
            .oneshot(json_request(
                "POST",
                "/mcp/orders/ord_1/charges",
                json!({"payment_method": {"type": "card", "token_id": "tok_test_visa_4242"}}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(
            read_json(response).await,
            json!({"error": "insufficient_funds", "details": {"message": "insufficient_funds"}})
        );
        assert_eq!(stub.requests()[0].path, "/orders/ord_1/charges");
    }

    #[tokio::test]
    async fn test_transport_failure_is_500_with_default_message() {
        let stub = StubConekta::fail(TransportError::Timeout("operation timed out".to_string()));

        let response = create_test_app(&stub)
            .oneshot(empty_request("GET", "/mcp/orders/ord_1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Error al obtener la orden");
        assert_eq!(body["details"]["kind"], "timeout");
    }

    #[tokio::test]
    async fn test_order_routes() {
        let stub = StubConekta::ok(json!({"id": "ord_1"}));
        let app = create_test_app(&stub);

        for request in [
            empty_request("GET", "/mcp/orders/ord_1"),
            json_request("PUT", "/mcp/orders/ord_1", json!({"metadata": {"ref": "42"}})),
            empty_request("POST", "/mcp/orders/ord_1/capture"),
            json_request("POST", "/mcp/orders/ord_1/refunds", json!({"reason": "requested_by_client"})),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let calls: Vec<_> = stub
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        assert_eq!(
            calls,
            vec![
                (Method::GET, "/orders/ord_1".to_string()),
                (Method::PUT, "/orders/ord_1".to_string()),
                (Method::POST, "/orders/ord_1/capture".to_string()),
                (Method::POST, "/orders/ord_1/refunds".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_customer_routes() {
        let stub = StubConekta::ok(json!({"id": "cus_1"}));
        let app = create_test_app(&stub);

        for request in [
            json_request("POST", "/mcp/customers", json!({"name": "Ana", "email": "ana@example.com"})),
            empty_request("GET", "/mcp/customers/cus_1"),
            json_request("PUT", "/mcp/customers/cus_1", json!({"phone": "+5215555555555"})),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(stub.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_validate_flag_rejects_invalid_customer() {
        let stub = StubConekta::ok(json!({"id": "cus_1"}));
        let app = create_test_app(&stub);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/mcp/customers?validate=true", json!({"name": "Ana"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Datos inválidos en la solicitud");
        assert_eq!(body["details"]["field_errors"][0]["field"], "email");
        assert!(stub.requests().is_empty());

        // Without the flag the same payload is forwarded
        let response = app
            .oneshot(json_request("POST", "/mcp/customers", json!({"name": "Ana"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_validate_flag_on_orders_and_charges() {
        let stub = StubConekta::ok(json!({}));
        let app = create_test_app(&stub);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/mcp/orders?validate=true", json!({"currency": "MXN"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                "POST",
                "/mcp/orders/ord_1/charges?validate=true",
                json!({"payment_method": {"type": "oxxo_cash"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_validate_flag_uses_error_shape() {
        let stub = StubConekta::ok(json!({}));
        let app = create_test_app(&stub);

        for uri in [
            "/mcp/customers?validate=yes",
            "/mcp/orders?validate=1",
            "/mcp/orders/ord_1/charges?validate=maybe",
        ] {
            let response = app
                .clone()
                .oneshot(json_request("POST", uri, json!({})))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
            let body = read_json(response).await;
            assert_eq!(body["error"], "Datos inválidos en la solicitud");
            assert!(body["details"]["error"].as_str().unwrap().contains("validate"));
        }
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_body_uses_error_shape() {
        let stub = StubConekta::ok(json!({}));

        let response = create_test_app(&stub)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp/customers")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "El cuerpo de la solicitud no es JSON válido");
        assert!(body["details"]["error"].is_string());
        assert!(stub.requests().is_empty());
    }
}
