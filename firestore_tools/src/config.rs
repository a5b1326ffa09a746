use std::time::Duration;

use log::*;
use ppr_common::{parse_seconds, Secret};
use serde::Deserialize;

pub const DEFAULT_FIRESTORE_API_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 8;

#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub api_url: String,
    /// The Firestore/Firebase project that owns the `orders` collection.
    pub project_id: String,
    /// A pre-issued bearer token with Firestore access. Takes precedence over the service account when both are
    /// configured; its validity window is the operator's responsibility.
    pub access_token: Option<Secret<String>>,
    /// Service-account key material used to mint short-lived access tokens when no static token is configured.
    pub service_account: Option<ServiceAccountKey>,
    /// Upper bound on any single outbound call to the token endpoint or document store.
    pub timeout: Duration,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_FIRESTORE_API_URL.to_string(),
            project_id: String::default(),
            access_token: None,
            service_account: None,
            timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
        }
    }
}

/// The subset of a Google service-account JSON key that the token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: Secret<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl FirestoreConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("PPR_FIRESTORE_API_URL").unwrap_or_else(|_| DEFAULT_FIRESTORE_API_URL.to_string());
        let project_id = std::env::var("PPR_FIRESTORE_PROJECT_ID").unwrap_or_else(|_| {
            warn!(
                "PPR_FIRESTORE_PROJECT_ID is not set. Webhook events will be acknowledged, but orders will not be \
                 reconciled."
            );
            String::default()
        });
        let access_token = std::env::var("PPR_FIRESTORE_ACCESS_TOKEN").ok().map(Secret::new);
        let service_account = std::env::var("PPR_FIRESTORE_SERVICE_ACCOUNT").ok().and_then(|json| {
            serde_json::from_str::<ServiceAccountKey>(&json)
                .map_err(|e| error!("Could not parse PPR_FIRESTORE_SERVICE_ACCOUNT. {e}"))
                .ok()
        });
        let timeout = parse_seconds(
            std::env::var("PPR_REMOTE_TIMEOUT_SECS").ok(),
            Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
        );
        Self { api_url, project_id, access_token, service_account, timeout }
    }
}
