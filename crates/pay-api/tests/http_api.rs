use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use pay_api::{
    create_router, AppState, ClientInitializer, GatewayConfig, PaymentDefaults, PaymentHandler,
    PaymentProcessor, ResponseEnvelope,
};
use pay_core::mock::{InMemorySecretStore, MockBehavior, MockConnector, MockProvider, MockStep};
use serde_json::{json, Value};
use std::sync::Arc;

fn server(behavior: MockBehavior) -> (TestServer, Arc<InMemorySecretStore>) {
    let config = GatewayConfig::from_lookup(|key| match key {
        "STRIPE_SECRET_KEY_ARN" => Some("stripe".to_string()),
        "ENVIRONMENT" => Some("test".to_string()),
        _ => None,
    })
    .unwrap();

    let store = Arc::new(
        InMemorySecretStore::new().with_secret("stripe", r#"{"api_key":"sk_test_mockStripeKey"}"#),
    );
    let connector = Arc::new(MockConnector::new(Arc::new(MockProvider::new(behavior))));
    let initializer = ClientInitializer::new(store.clone(), connector, config.secret_id.clone());
    let processor = PaymentProcessor::new(
        initializer,
        PaymentDefaults {
            currency: config.default_currency.clone(),
            description: config.default_description.clone(),
            environment: config.environment.clone(),
        },
    );

    let state = AppState::new(PaymentHandler::new(processor));
    (TestServer::new(create_router(state)).unwrap(), store)
}

fn payment_body() -> Value {
    json!({
        "cardNumber": "4242424242424242",
        "expMonth": 12,
        "expYear": 2030,
        "cvc": "123",
        "amount": 1000
    })
}

#[tokio::test]
async fn health_reports_service() {
    let (server, _) = server(MockBehavior::Succeed);

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["service"], "payment-gateway");
}

#[tokio::test]
async fn payment_succeeds_with_cors_headers() {
    let (server, store) = server(MockBehavior::Succeed);

    for _ in 0..2 {
        let response = server.post("/payment").json(&payment_body()).await;
        response.assert_status_ok();
        assert_eq!(response.header("access-control-allow-origin"), "*");
        assert_eq!(response.header("content-type"), "application/json");

        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["paymentIntentId"], "pi_mock123456789");
    }

    assert_eq!(store.fetches(), 1);
}

#[tokio::test]
async fn empty_post_is_missing_body() {
    let (server, _) = server(MockBehavior::Succeed);

    let response = server.post("/payment").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "missing request body"})
    );
}

#[tokio::test]
async fn malformed_json_is_500() {
    let (server, _) = server(MockBehavior::Succeed);

    let response = server.post("/payment").text("not json").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"], "internal server error");
}

#[tokio::test]
async fn non_utf8_body_is_500() {
    let (server, store) = server(MockBehavior::Succeed);

    let response = server
        .post("/payment")
        .bytes(Bytes::from_static(&[b'{', 0xff, 0xfe, b'}']))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.header("access-control-allow-origin"), "*");
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "internal server error"})
    );
    assert_eq!(store.fetches(), 0);
}

#[tokio::test]
async fn provider_decline_is_400() {
    let (server, _) = server(MockBehavior::fail_at(
        MockStep::PaymentIntent,
        "Your card was declined.",
        Some("card_declined"),
    ));

    let response = server.post("/payment").json(&payment_body()).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "error": "Your card was declined.", "code": "card_declined"})
    );
}

#[tokio::test]
async fn invoke_returns_envelope() {
    let (server, _) = server(MockBehavior::Succeed);

    let response = server
        .post("/invoke")
        .json(&json!({ "body": payment_body().to_string() }))
        .await;
    response.assert_status_ok();

    let envelope = response.json::<ResponseEnvelope>();
    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.headers["Access-Control-Allow-Headers"], "Content-Type,Authorization");

    let body: Value = serde_json::from_str(&envelope.body).unwrap();
    assert_eq!(body["status"], "succeeded");
}

#[tokio::test]
async fn invoke_without_body_field() {
    let (server, _) = server(MockBehavior::Succeed);

    let envelope = server
        .post("/invoke")
        .json(&json!({}))
        .await
        .json::<ResponseEnvelope>();

    assert_eq!(envelope.status_code, 400);
    assert_eq!(envelope.body, r#"{"error":"missing request body"}"#);
}

#[tokio::test]
async fn invoke_with_object_body_is_internal_error() {
    let (server, store) = server(MockBehavior::Succeed);

    let response = server
        .post("/invoke")
        .json(&json!({ "body": { "cardNumber": "4242" } }))
        .await;
    response.assert_status_ok();

    let envelope = response.json::<ResponseEnvelope>();
    assert_eq!(envelope.status_code, 500);
    assert_eq!(envelope.headers["Access-Control-Allow-Origin"], "*");
    assert_eq!(envelope.body, r#"{"error":"internal server error"}"#);
    assert_eq!(store.fetches(), 0);
}

#[tokio::test]
async fn invoke_ignores_content_type() {
    let (server, _) = server(MockBehavior::Succeed);

    let envelope = server
        .post("/invoke")
        .text("not json")
        .await
        .json::<ResponseEnvelope>();
    assert_eq!(envelope.status_code, 500);

    let envelope = server
        .post("/invoke")
        .bytes(Bytes::from(json!({ "body": payment_body().to_string() }).to_string()))
        .await
        .json::<ResponseEnvelope>();
    assert_eq!(envelope.status_code, 200);
}

#[tokio::test]
async fn state_from_env_config_serves_payment() {
    std::env::set_var("PAY_API_TEST_STRIPE", r#"{"api_key":"sk_test_env"}"#);
    let config = GatewayConfig::from_lookup(|key| match key {
        "STRIPE_SECRET_KEY_ARN" => Some("pay-api-test/stripe".to_string()),
        "SECRET_STORE" => Some("env".to_string()),
        "PAYMENT_PROVIDER" => Some("mock".to_string()),
        _ => None,
    })
    .unwrap();

    let state = AppState::from_config(config).await.unwrap();
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.post("/payment").json(&payment_body()).await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["paymentIntentId"], "pi_mock123456789");
}

#[tokio::test]
async fn preflight_returns_cors() {
    let (server, _) = server(MockBehavior::Succeed);

    let response = server.method(Method::OPTIONS, "/payment").await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(response.header("access-control-allow-methods"), "POST,OPTIONS");
}
