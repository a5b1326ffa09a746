use std::time::Duration;

use actix_web::{
    dev::Server,
    http::KeepAlive,
    middleware::{DefaultHeaders, Logger},
    web,
    App,
    HttpServer,
};
use firestore_tools::{FirestoreApi, TokenProvider};
use paystack_tools::PaystackApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    reconciliation::{FirestoreReconciler, OrderReconciler},
    routes::{health, initialize_transaction, no_op, verify_transaction, PaystackWebhookRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let firestore =
        FirestoreApi::new(config.firestore.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let tokens = TokenProvider::new(&config.firestore).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let reconciler = FirestoreReconciler::new(firestore, tokens);
    let srv = create_server_instance(config, reconciler)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<R>(config: ServerConfig, reconciler: R) -> Result<Server, ServerError>
where R: OrderReconciler + Send + Sync + 'static {
    let paystack_api =
        PaystackApi::new(config.paystack.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let reconciler = web::Data::new(reconciler);
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ppr::access_log"))
            .app_data(web::Data::new(config.paystack.clone()))
            .app_data(web::Data::new(paystack_api.clone()))
            .app_data(reconciler.clone());
        // The proxy endpoints are called from the storefront's browser code, so the whole scope answers with
        // permissive CORS headers, and preflight/non-POST calls fall through to a 204 no-op.
        let paystack_scope = web::scope("/paystack")
            .wrap(
                DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Methods", "POST, OPTIONS"))
                    .add(("Access-Control-Allow-Headers", "Content-Type, Authorization")),
            )
            .service(PaystackWebhookRoute::<R>::new())
            .service(initialize_transaction)
            .service(verify_transaction)
            .default_service(web::to(no_op));
        app.service(health).service(paystack_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
