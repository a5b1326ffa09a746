mod api;
mod config;
mod error;

mod data_objects;

pub use api::PaystackApi;
pub use config::PaystackConfig;
pub use data_objects::{ChargeEventData, ProxiedResponse, WebhookEnvelope, CHARGE_SUCCESS_EVENT};
pub use error::PaystackApiError;
