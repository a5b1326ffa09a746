use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The body returned to the gateway for webhook deliveries. It reports only the authenticity verdict; reconciliation
/// outcomes are deliberately invisible to the gateway (see [`crate::routes::paystack_webhook`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
}

impl VerificationResult {
    pub fn accepted() -> Self {
        Self { verified: true }
    }

    pub fn rejected() -> Self {
        Self { verified: false }
    }
}

/// Storefront request to start a Paystack transaction. The amount is in (possibly fractional) Naira.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeParams {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Storefront request to look up the status of a transaction by reference.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyParams {
    #[serde(default)]
    pub reference: Option<String>,
}
