use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use firestore_tools::FirestoreApiError;
use paystack_tools::PaystackConfig;

use super::{
    helpers::{signed_post, test_paystack_config, webhook_request, webhook_request_with_config},
    mocks::MockReconciler,
};
use crate::{
    reconciliation::ReconcileOutcome,
    routes::{PaystackWebhookRoute, PAYSTACK_SIGNATURE_HEADER},
};

const CHARGE_SUCCESS: &str = r#"{"event":"charge.success","data":{"reference":"REF123"}}"#;

#[actix_web::test]
async fn invalid_signature_is_rejected_without_parsing() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile().times(0);
    let req = TestRequest::post()
        .uri("/paystack/webhook")
        .insert_header((PAYSTACK_SIGNATURE_HEADER, "deadbeef"))
        .set_payload(CHARGE_SUCCESS);
    let (status, body) = webhook_request(mock, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"verified":false}"#);
}

#[actix_web::test]
async fn missing_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile().times(0);
    let req = TestRequest::post().uri("/paystack/webhook").set_payload(CHARGE_SUCCESS);
    let (status, body) = webhook_request(mock, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"verified":false}"#);
}

#[actix_web::test]
async fn successful_charge_is_reconciled_and_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile()
        .withf(|reference| reference == "REF123")
        .times(1)
        .returning(|_| Ok(ReconcileOutcome::OrderMarkedPaid { document: "orders/abc".to_string() }));
    let (status, body) = webhook_request(mock, signed_post(CHARGE_SUCCESS)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"verified":true}"#);
}

#[actix_web::test]
async fn unconfigured_secret_refuses_all_deliveries() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile().times(0);
    // An empty secret means any signature could have been forged, so even a "matching" empty-key digest is refused.
    let config = PaystackConfig { secret_key: Default::default(), ..test_paystack_config() };
    let req = TestRequest::post()
        .uri("/paystack/webhook")
        .insert_header((PAYSTACK_SIGNATURE_HEADER, "deadbeef"))
        .set_payload(CHARGE_SUCCESS);
    let (status, body) = webhook_request_with_config(config, mock, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("not configured"));
}

#[actix_web::test]
async fn duplicate_deliveries_are_each_reconciled_and_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile()
        .withf(|reference| reference == "REF123")
        .times(2)
        .returning(|_| Ok(ReconcileOutcome::OrderMarkedPaid { document: "orders/abc".to_string() }));
    let app = App::new()
        .app_data(web::Data::new(test_paystack_config()))
        .app_data(web::Data::new(mock))
        .service(web::scope("/paystack").service(PaystackWebhookRoute::<MockReconciler>::new()));
    let service = test::init_service(app).await;
    // The gateway may deliver the same event more than once; each delivery is acknowledged identically.
    for _ in 0..2 {
        let res = test::call_service(&service, signed_post(CHARGE_SUCCESS).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn missing_order_is_still_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile().times(1).returning(|_| Ok(ReconcileOutcome::OrderNotFound));
    let (status, body) = webhook_request(mock, signed_post(CHARGE_SUCCESS)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"verified":true}"#);
}

#[actix_web::test]
async fn reconciliation_failure_does_not_change_the_response() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile()
        .times(1)
        .returning(|_| Err(FirestoreApiError::QueryError { status: 503, message: "unavailable".to_string() }));
    let (status, body) = webhook_request(mock, signed_post(CHARGE_SUCCESS)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"verified":true}"#);
}

#[actix_web::test]
async fn unconfigured_reconciliation_is_absorbed() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile().times(1).returning(|_| Ok(ReconcileOutcome::SkippedNotConfigured));
    let (status, body) = webhook_request(mock, signed_post(CHARGE_SUCCESS)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"verified":true}"#);
}

#[actix_web::test]
async fn irrelevant_events_are_acknowledged_without_reconciliation() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile().times(0);
    let (status, body) =
        webhook_request(mock, signed_post(r#"{"event":"charge.failed","data":{"reference":"REF123"}}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"verified":true}"#);
}

#[actix_web::test]
async fn successful_charge_without_reference_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile().times(0);
    let (status, body) = webhook_request(mock, signed_post(r#"{"event":"charge.success","data":{}}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"verified":true}"#);
}

#[actix_web::test]
async fn unparseable_verified_body_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile().times(0);
    let (status, _body) = webhook_request(mock, signed_post("not even json")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn non_post_methods_are_a_no_op() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockReconciler::new();
    mock.expect_reconcile().times(0);
    let req = TestRequest::get().uri("/paystack/webhook");
    let (status, body) = webhook_request(mock, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}
