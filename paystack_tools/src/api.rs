use std::sync::Arc;

use log::*;
use ppr_common::Kobo;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
    Url,
};
use serde::Serialize;
use serde_json::Value;

use crate::{config::PaystackConfig, data_objects::ProxiedResponse, PaystackApiError};

/// A thin client for the Paystack transaction REST API.
///
/// The relay never interprets Paystack's responses; both the initialize and verify calls hand the gateway's JSON
/// and status code back to the caller untouched.
#[derive(Clone)]
pub struct PaystackApi {
    config: PaystackConfig,
    client: Arc<Client>,
}

impl PaystackApi {
    pub fn new(config: PaystackConfig) -> Result<Self, PaystackApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> Result<Url, PaystackApiError> {
        Url::parse(&format!("{}{path}", self.config.api_url))
            .map_err(|e| PaystackApiError::RestRequestError(e.to_string()))
    }

    /// Send a request to Paystack and capture the response verbatim, whatever its status code.
    async fn relay_request<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<B>,
    ) -> Result<ProxiedResponse, PaystackApiError> {
        trace!("Sending Paystack request: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| PaystackApiError::RestResponseError(e.to_string()))?;
        let status = response.status().as_u16();
        trace!("Paystack responded with status {status}");
        let body = response.json::<Value>().await.map_err(|e| PaystackApiError::JsonError(e.to_string()))?;
        Ok(ProxiedResponse { status, body })
    }

    /// Initialize a transaction for the given amount, returning Paystack's response (authorization_url, reference,
    /// access_code on success) verbatim.
    pub async fn initialize_transaction(
        &self,
        amount: Kobo,
        email: &str,
        metadata: Option<Value>,
    ) -> Result<ProxiedResponse, PaystackApiError> {
        let url = self.url("/transaction/initialize")?;
        let mut body = serde_json::json!({
            "amount": amount.value(),
            "email": email,
        });
        if let Some(metadata) = metadata {
            body["metadata"] = metadata;
        }
        debug!("Initializing transaction for {amount}");
        self.relay_request(Method::POST, url, Some(body)).await
    }

    /// Look up the status of a transaction by its reference, returning Paystack's response verbatim.
    pub async fn verify_transaction(&self, reference: &str) -> Result<ProxiedResponse, PaystackApiError> {
        let mut url = self.url("/transaction/verify")?;
        url.path_segments_mut()
            .map_err(|_| PaystackApiError::RestRequestError("API URL cannot be a base".to_string()))?
            .push(reference);
        debug!("Verifying transaction {reference}");
        self.relay_request::<Value>(Method::GET, url, None).await
    }
}
