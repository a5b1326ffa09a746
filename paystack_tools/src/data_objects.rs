use serde::Deserialize;
use serde_json::Value;

/// The event type Paystack sends when a charge has been completed successfully. The only event type the relay acts
/// on; everything else is acknowledged and ignored.
pub const CHARGE_SUCCESS_EVENT: &str = "charge.success";

/// The envelope of a Paystack webhook notification.
///
/// Only the fields the relay dispatches on are deserialized; the rest of the payload is deliberately ignored.
/// The envelope is always parsed from the raw body bytes *after* the HMAC signature has been verified.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: Option<ChargeEventData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChargeEventData {
    #[serde(default)]
    pub reference: Option<String>,
}

impl WebhookEnvelope {
    /// The transaction reference carried by the event, if any.
    pub fn reference(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.reference.as_deref())
    }
}

/// A Paystack response that is passed back to the storefront verbatim, status code included.
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: u16,
    pub body: Value,
}
