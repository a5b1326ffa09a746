use actix_web::{
    body::MessageBody,
    http::StatusCode,
    middleware::DefaultHeaders,
    test,
    test::TestRequest,
    web,
    App,
};
use paystack_tools::PaystackApi;
use serde_json::json;

use super::helpers::test_paystack_config;
use crate::routes::{initialize_transaction, no_op, verify_transaction};

// Field validation happens before any outbound call, so these tests never touch the network; the API client points
// at a closed port regardless.
async fn proxy_request(req: TestRequest) -> (StatusCode, String) {
    let api = PaystackApi::new(test_paystack_config()).unwrap();
    let app = App::new().app_data(web::Data::new(api)).service(
        web::scope("/paystack")
            .wrap(
                DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Methods", "POST, OPTIONS"))
                    .add(("Access-Control-Allow-Headers", "Content-Type, Authorization")),
            )
            .service(initialize_transaction)
            .service(verify_transaction)
            .default_service(web::to(no_op)),
    );
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

#[actix_web::test]
async fn initialize_requires_an_email() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/paystack/initialize").set_json(json!({ "amount": 100.0 }));
    let (status, body) = proxy_request(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("email"));
}

#[actix_web::test]
async fn initialize_requires_an_amount() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/paystack/initialize").set_json(json!({ "email": "buyer@example.com" }));
    let (status, body) = proxy_request(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("amount"));
}

#[actix_web::test]
async fn initialize_rejects_non_positive_amounts() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/paystack/initialize")
        .set_json(json!({ "amount": 0.0, "email": "buyer@example.com" }));
    let (status, _body) = proxy_request(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn verify_requires_a_reference() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/paystack/verify").set_json(json!({}));
    let (status, body) = proxy_request(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("reference"));
}

#[actix_web::test]
async fn preflight_requests_are_acknowledged_with_cors_headers() {
    let _ = env_logger::try_init().ok();
    let api = PaystackApi::new(test_paystack_config()).unwrap();
    let app = App::new().app_data(web::Data::new(api)).service(
        web::scope("/paystack")
            .wrap(DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")))
            .service(initialize_transaction)
            .default_service(web::to(no_op)),
    );
    let service = test::init_service(app).await;
    let req = TestRequest::default().method(actix_web::http::Method::OPTIONS).uri("/paystack/initialize");
    let res = test::call_service(&service, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers().get("Access-Control-Allow-Origin").unwrap(), "*");
}
