use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use paystack_tools::PaystackConfig;
use ppr_common::Secret;

use crate::{
    endpoint_tests::mocks::MockReconciler,
    helpers::calculate_hmac,
    routes::{no_op, PaystackWebhookRoute, PAYSTACK_SIGNATURE_HEADER},
};

pub const TEST_SECRET: &str = "sk_test_webhook_secret";

// Points at a closed port, so any test that accidentally reaches the network fails fast.
pub fn test_paystack_config() -> PaystackConfig {
    PaystackConfig {
        api_url: "http://127.0.0.1:9".to_string(),
        secret_key: Secret::new(TEST_SECRET.to_string()),
        ..Default::default()
    }
}

/// A POST to the webhook route carrying a valid signature for `body`.
pub fn signed_post(body: &'static str) -> TestRequest {
    let signature = calculate_hmac(TEST_SECRET, body.as_bytes()).unwrap();
    TestRequest::post()
        .uri("/paystack/webhook")
        .insert_header((PAYSTACK_SIGNATURE_HEADER, signature))
        .set_payload(body)
}

/// Run `req` against a webhook app backed by the given mock reconciler.
pub async fn webhook_request(reconciler: MockReconciler, req: TestRequest) -> (StatusCode, String) {
    webhook_request_with_config(test_paystack_config(), reconciler, req).await
}

pub async fn webhook_request_with_config(
    config: PaystackConfig,
    reconciler: MockReconciler,
    req: TestRequest,
) -> (StatusCode, String) {
    let app = App::new()
        .app_data(web::Data::new(config))
        .app_data(web::Data::new(reconciler))
        .service(
            web::scope("/paystack")
                .service(PaystackWebhookRoute::<MockReconciler>::new())
                .default_service(web::to(no_op)),
        );
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
