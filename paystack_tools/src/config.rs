use std::time::Duration;

use log::*;
use ppr_common::{parse_seconds, Secret};

pub const DEFAULT_PAYSTACK_API_URL: &str = "https://api.paystack.co";
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 8;

#[derive(Debug, Clone)]
pub struct PaystackConfig {
    pub api_url: String,
    /// The Paystack server secret. Used both as the bearer token for API calls and as the HMAC key for webhook
    /// signatures, as per Paystack's API contract.
    pub secret_key: Secret<String>,
    /// Upper bound on any single outbound call to Paystack.
    pub timeout: Duration,
}

impl Default for PaystackConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_PAYSTACK_API_URL.to_string(),
            secret_key: Secret::default(),
            timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
        }
    }
}

impl PaystackConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("PPR_PAYSTACK_API_URL").unwrap_or_else(|_| {
            debug!("PPR_PAYSTACK_API_URL not set, using {DEFAULT_PAYSTACK_API_URL} as default");
            DEFAULT_PAYSTACK_API_URL.to_string()
        });
        let secret_key = Secret::new(std::env::var("PPR_PAYSTACK_SECRET_KEY").unwrap_or_else(|_| {
            error!(
                "PPR_PAYSTACK_SECRET_KEY is not set. Webhook signatures cannot be verified and API calls will be \
                 rejected. Set it to your Paystack secret key."
            );
            String::default()
        }));
        let timeout = remote_timeout_from_env();
        Self { api_url, secret_key, timeout }
    }
}

/// Read the shared outbound-call timeout ceiling from `PPR_REMOTE_TIMEOUT_SECS`.
pub fn remote_timeout_from_env() -> Duration {
    parse_seconds(std::env::var("PPR_REMOTE_TIMEOUT_SECS").ok(), Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS))
}
