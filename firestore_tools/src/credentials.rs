//! Credential resolution for the document store.
//!
//! Two sources are supported, behind one interface: a pre-issued bearer token with a caller-managed lifetime, and a
//! service-account key from which short-lived access tokens are minted via a signed-assertion exchange with the
//! OAuth2 token endpoint. Callers never branch on which source is active; they just ask for a token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::*;
use ppr_common::Secret;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    config::{FirestoreConfig, ServiceAccountKey},
    FirestoreApiError,
};

const TOKEN_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
// Refresh cached tokens this long before they actually expire.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// A bearer token usable against the document store, with its expiry instant.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: Secret<String>,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: Secret<String>, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// True once the token is within the refresh leeway of its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_LEEWAY_SECS) >= self.expires_at
    }
}

/// Where the bearer credential comes from. The static token wins when both are configured, falling back to the
/// exchange only when no pre-issued token is available.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    StaticToken(Secret<String>),
    ServiceAccount(ServiceAccountKey),
}

impl CredentialSource {
    pub fn from_config(config: &FirestoreConfig) -> Option<Self> {
        if let Some(token) = &config.access_token {
            return Some(Self::StaticToken(token.clone()));
        }
        config.service_account.clone().map(Self::ServiceAccount)
    }
}

/// Resolves bearer tokens on demand, caching exchanged tokens until shortly before expiry.
///
/// The cache lock is held across the exchange, so concurrent callers on the same provider wait for a single
/// in-flight exchange rather than stampeding the token endpoint.
pub struct TokenProvider {
    source: Option<CredentialSource>,
    client: Client,
    cached: Mutex<Option<AccessToken>>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

impl TokenProvider {
    pub fn new(config: &FirestoreConfig) -> Result<Self, FirestoreApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FirestoreApiError::Initialization(e.to_string()))?;
        Ok(Self { source: CredentialSource::from_config(config), client, cached: Mutex::new(None) })
    }

    pub fn has_credentials(&self) -> bool {
        self.source.is_some()
    }

    /// Resolve a bearer token for the document store.
    ///
    /// Returns [`FirestoreApiError::NoCredentials`] when no source is configured; exchange failures are reported as
    /// they are, never retried here.
    pub async fn access_token(&self) -> Result<AccessToken, FirestoreApiError> {
        let source = self.source.as_ref().ok_or(FirestoreApiError::NoCredentials)?;
        match source {
            CredentialSource::StaticToken(token) => {
                // The operator owns this token's lifetime, so it never triggers a refresh.
                Ok(AccessToken::new(token.clone(), DateTime::<Utc>::MAX_UTC))
            },
            CredentialSource::ServiceAccount(key) => {
                let mut cached = self.cached.lock().await;
                if let Some(token) = cached.as_ref() {
                    if !token.is_expired() {
                        trace!("Re-using cached Firestore access token");
                        return Ok(token.clone());
                    }
                }
                let token = self.exchange(key).await?;
                *cached = Some(token.clone());
                Ok(token)
            },
        }
    }

    async fn exchange(&self, key: &ServiceAccountKey) -> Result<AccessToken, FirestoreApiError> {
        let assertion = signed_assertion(key, Utc::now())?;
        debug!("Exchanging service-account assertion for an access token");
        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| FirestoreApiError::RestResponseError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message =
                response.text().await.map_err(|e| FirestoreApiError::RestResponseError(e.to_string()))?;
            return Err(FirestoreApiError::QueryError { status, message });
        }
        let token =
            response.json::<TokenResponse>().await.map_err(|e| FirestoreApiError::JsonError(e.to_string()))?;
        let expires_at = Utc::now() + Duration::seconds(token.expires_in);
        info!("Obtained Firestore access token, valid for {}s", token.expires_in);
        Ok(AccessToken::new(Secret::new(token.access_token), expires_at))
    }
}

fn assertion_claims(key: &ServiceAccountKey, now: DateTime<Utc>) -> AssertionClaims {
    AssertionClaims {
        iss: key.client_email.clone(),
        scope: TOKEN_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
    }
}

fn signed_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, FirestoreApiError> {
    let claims = assertion_claims(key, now);
    let header = Header::new(Algorithm::RS256);
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.reveal().as_bytes())
        .map_err(|e| FirestoreApiError::KeyError(e.to_string()))?;
    jsonwebtoken::encode(&header, &claims, &signing_key).map_err(|e| FirestoreApiError::KeyError(e.to_string()))
}
