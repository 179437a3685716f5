use actix_web::{
    App,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    test, web,
};
use std::collections::HashMap;

use api_billing::models::plan::PricingCatalog;
use common::testing;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn test_app(client: stripe::Client) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let config = testing::test_config();
    let catalog = PricingCatalog::from_config(&config.pricing);
    App::new()
        .app_data(web::Data::new(config.clone()))
        .app_data(web::Data::new(client))
        .app_data(web::Data::new(catalog))
        .service(web::scope("/api").service(api_billing::mount_checkout()))
}

fn default_client() -> stripe::Client {
    common::stripe::create_client(&testing::test_config().stripe.secret_key)
}

async fn post_session(body: Value) -> (StatusCode, Value) {
    post_session_to(default_client(), body).await
}

async fn post_session_to(client: stripe::Client, body: Value) -> (StatusCode, Value) {
    let app = test::init_service(test_app(client)).await;
    let req = test::TestRequest::post()
        .uri("/api/checkout/session")
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

#[actix_web::test]
async fn unknown_plan_is_rejected_before_stripe() {
    let (status, body) =
        post_session(json!({ "planId": "unknown", "cadence": "monthly", "locale": "en" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Unknown pricing plan"));
}

#[actix_web::test]
async fn plan_without_yearly_price_is_rejected() {
    let (status, body) =
        post_session(json!({ "planId": "pro", "cadence": "yearly", "locale": "en" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Missing yearly price"));
}

#[actix_web::test]
async fn invalid_cadence_reports_issues() {
    let (status, body) =
        post_session(json!({ "planId": "pro", "cadence": "weekly", "locale": "en" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["issues"]["cadence"].is_array());
}

#[actix_web::test]
async fn blank_plan_id_is_reported_under_its_field_name() {
    let (status, body) =
        post_session(json!({ "planId": "  ", "cadence": "monthly", "locale": "en" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["issues"]["plan_id"].is_array());
    assert!(body["issues"].get("planId").is_none());
}

#[actix_web::test]
async fn invalid_email_reports_issues() {
    let (status, body) = post_session(
        json!({ "planId": "starter", "cadence": "monthly", "email": "nope", "locale": "en" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["issues"]["email"].is_array());
}

#[actix_web::test]
async fn non_canonical_locale_is_not_normalized() {
    let (status, body) =
        post_session(json!({ "planId": "starter", "cadence": "monthly", "locale": "EN" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["issues"]["locale"].is_array());
}

#[actix_web::test]
async fn malformed_json_is_a_client_error() {
    let app = test::init_service(test_app(default_client())).await;
    let req = test::TestRequest::post()
        .uri("/api/checkout/session")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"planId\": ")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn plans_list_only_priced_cadences() {
    let app = test::init_service(test_app(default_client())).await;
    let req = test::TestRequest::get().uri("/api/checkout/plans").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let plans = body["plans"].as_array().unwrap();
    let cadences = |id: &str| {
        plans
            .iter()
            .find(|p| p["id"] == id)
            .map(|p| p["cadences"].clone())
            .unwrap()
    };
    assert_eq!(cadences("starter"), json!(["monthly", "yearly"]));
    assert_eq!(cadences("pro"), json!(["monthly"]));
    assert_eq!(cadences("agency"), json!([]));
}

fn stripe_session(url: Option<&str>) -> Value {
    json!({
        "id": "cs_test_1",
        "object": "checkout.session",
        "automatic_tax": { "enabled": false, "status": null },
        "created": 1_700_000_000,
        "custom_fields": [],
        "custom_text": {},
        "expires_at": 1_700_086_400,
        "livemode": false,
        "mode": "subscription",
        "payment_method_types": ["card"],
        "payment_status": "unpaid",
        "shipping_options": [],
        "status": "open",
        "url": url
    })
}

async fn stripe_mock(response: ResponseTemplate) -> (MockServer, stripe::Client) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(header("authorization", "Bearer sk_test_123"))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;
    let client = stripe::Client::from_url(server.uri().as_str(), "sk_test_123");
    (server, client)
}

async fn sent_form(server: &MockServer) -> HashMap<String, String> {
    let requests = server.received_requests().await.unwrap();
    url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect()
}

#[actix_web::test]
async fn session_is_created_with_the_resolved_price() {
    let (server, client) =
        stripe_mock(ResponseTemplate::new(200).set_body_json(stripe_session(Some(
            "https://checkout.stripe.com/c/pay/cs_test_1",
        ))))
        .await;

    let (status, body) = post_session_to(
        client,
        json!({
            "planId": "starter",
            "cadence": "yearly",
            "email": "buyer@example.com",
            "locale": "fr"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": "cs_test_1", "url": "https://checkout.stripe.com/c/pay/cs_test_1" })
    );

    let form = sent_form(&server).await;
    let field = |key: &str| form.get(key).map(String::as_str);
    assert_eq!(field("mode"), Some("subscription"));
    assert_eq!(field("line_items[0][price]"), Some("price_starter_yearly"));
    assert_eq!(field("line_items[0][quantity]"), Some("1"));
    assert_eq!(field("customer_email"), Some("buyer@example.com"));
    assert_eq!(field("locale"), Some("fr"));
    assert_eq!(field("metadata[siteId]"), Some("marketing"));
    assert_eq!(field("metadata[planId]"), Some("starter"));
    assert_eq!(field("subscription_data[metadata][planId]"), Some("starter"));
    assert_eq!(
        field("success_url"),
        Some("https://www.example.com/fr/checkout/success?session_id={CHECKOUT_SESSION_ID}")
    );
    assert_eq!(field("cancel_url"), Some("https://www.example.com/fr/checkout/cancel"));
}

#[actix_web::test]
async fn stripe_outage_is_an_internal_error() {
    let (_server, client) = stripe_mock(ResponseTemplate::new(500).set_body_json(json!({
        "error": { "type": "api_error", "message": "Something went wrong" }
    })))
    .await;

    let (status, body) =
        post_session_to(client, json!({ "planId": "pro", "cadence": "monthly", "locale": "en" }))
            .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn session_without_a_url_is_an_internal_error() {
    let (_server, client) =
        stripe_mock(ResponseTemplate::new(200).set_body_json(stripe_session(None))).await;

    let (status, body) =
        post_session_to(client, json!({ "planId": "pro", "cadence": "monthly", "locale": "en" }))
            .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
