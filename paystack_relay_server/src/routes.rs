//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Any long, non-cpu-bound operation (the outbound gateway and document-store calls) is expressed as an async
//! function so that worker threads keep processing other requests while the remote call is in flight.

use actix_web::{get, http::StatusCode, post, web, HttpRequest, HttpResponse, Responder};
use log::*;
use paystack_tools::{PaystackApi, PaystackApiError, PaystackConfig, ProxiedResponse, WebhookEnvelope, CHARGE_SUCCESS_EVENT};
use ppr_common::Kobo;

use crate::{
    data_objects::{InitializeParams, VerificationResult, VerifyParams},
    errors::ServerError,
    helpers::verify_webhook_signature,
    reconciliation::{OrderReconciler, ReconcileOutcome},
};

/// The header Paystack uses to deliver the hex-encoded HMAC signature of the body.
pub const PAYSTACK_SIGNATURE_HEADER: &str = "x-paystack-signature";

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// Terminal no-op for methods the relay does not serve (including CORS preflights). The gateway treats anything in
/// the 2xx range as delivered, so these are acknowledged rather than rejected.
pub async fn no_op() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

// ----------------------------------------------   Webhook  ----------------------------------------------------
route!(paystack_webhook => Post "/webhook" impl OrderReconciler);
/// Route handler for Paystack webhook notifications.
///
/// Processing runs as a short pipeline: authenticate the raw body against the signature header, parse the envelope,
/// and dispatch on the event type. Only authentication and parsing decide the response the gateway sees:
/// * no secret configured → 500, before any signature is even looked at;
/// * signature mismatch (or missing header) → 401 `{"verified": false}` — the body is never parsed;
/// * unparseable verified body → 500;
/// * everything else → 200 `{"verified": true}`, whether the event was acted on, ignored, or reconciliation failed.
///
/// Reconciliation failures are absorbed on purpose. The gateway keys its retry policy off the response status, and
/// replaying an event would just repeat the same downstream failure; failed reconciliations are surfaced through the
/// logs instead.
pub async fn paystack_webhook<R>(
    req: HttpRequest,
    body: web::Bytes,
    config: web::Data<PaystackConfig>,
    reconciler: web::Data<R>,
) -> HttpResponse
where
    R: OrderReconciler,
{
    trace!("💳️ Received webhook request: {}", req.uri());
    let secret = config.secret_key.reveal();
    if secret.is_empty() {
        error!("🔐️ No webhook secret is configured. Refusing to authenticate the delivery.");
        return HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": "webhook verification is not configured" }));
    }
    let signature = req.headers().get(PAYSTACK_SIGNATURE_HEADER).and_then(|v| v.to_str().ok()).unwrap_or_default();
    if !verify_webhook_signature(secret, body.as_ref(), signature) {
        warn!("🔐️ Invalid webhook signature. Rejecting event as unauthentic.");
        return HttpResponse::Unauthorized().json(VerificationResult::rejected());
    }
    trace!("🔐️ Webhook signature check ✅️");
    let event = match serde_json::from_slice::<WebhookEnvelope>(body.as_ref()) {
        Ok(event) => event,
        Err(e) => {
            warn!("💳️ Could not parse verified webhook body. {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }));
        },
    };
    match (event.event.as_str(), event.reference()) {
        (CHARGE_SUCCESS_EVENT, Some(reference)) => match reconciler.reconcile(reference).await {
            Ok(ReconcileOutcome::OrderMarkedPaid { document }) => {
                info!("💳️ Order {document} marked as paid for reference {reference}.");
            },
            Ok(ReconcileOutcome::OrderNotFound) => {
                warn!("💳️ No matching order found for reference {reference}.");
            },
            Ok(ReconcileOutcome::SkippedNotConfigured) => {
                warn!("💳️ No document-store project or credential configured. Skipping reconciliation for {reference}.");
            },
            Err(e) => {
                error!("💳️ Could not reconcile order for reference {reference}. {e}");
            },
        },
        (CHARGE_SUCCESS_EVENT, None) => {
            warn!("💳️ {CHARGE_SUCCESS_EVENT} event arrived without a reference. Nothing to reconcile.");
        },
        (other, _) => {
            info!("💳️ Ignoring webhook event type '{other}'.");
        },
    }
    HttpResponse::Ok().json(VerificationResult::accepted())
}

// ----------------------------------------------   Proxies  ----------------------------------------------------
/// Route handler for the transaction-initialize proxy.
///
/// Validates the storefront's parameters, converts the Naira amount to kobo, and relays Paystack's response
/// (authorization_url, reference, access_code) verbatim, status code included.
#[post("/initialize")]
pub async fn initialize_transaction(
    body: web::Json<InitializeParams>,
    api: web::Data<PaystackApi>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    let email = params
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ServerError::MissingField("email".to_string()))?;
    let amount = params.amount.ok_or_else(|| ServerError::MissingField("amount".to_string()))?;
    let amount = Kobo::from_naira(amount).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    debug!("💳️ POST initialize transaction for {amount}");
    let response = api.initialize_transaction(amount, &email, params.metadata).await.map_err(upstream_error)?;
    relay_response(response)
}

/// Route handler for the transaction-verify proxy. Relays Paystack's verdict on a reference verbatim.
#[post("/verify")]
pub async fn verify_transaction(
    body: web::Json<VerifyParams>,
    api: web::Data<PaystackApi>,
) -> Result<HttpResponse, ServerError> {
    let reference = body
        .into_inner()
        .reference
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ServerError::MissingField("reference".to_string()))?;
    debug!("💳️ POST verify transaction {reference}");
    let response = api.verify_transaction(&reference).await.map_err(upstream_error)?;
    relay_response(response)
}

fn relay_response(response: ProxiedResponse) -> Result<HttpResponse, ServerError> {
    let status = StatusCode::from_u16(response.status).map_err(|e| ServerError::Unspecified(e.to_string()))?;
    Ok(HttpResponse::build(status).json(response.body))
}

fn upstream_error(e: PaystackApiError) -> ServerError {
    warn!("💳️ Could not complete the call to the payment gateway. {e}");
    ServerError::UpstreamError(e.to_string())
}
