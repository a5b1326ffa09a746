//! A small REST client for the Firestore document store, covering exactly what the payment relay needs:
//! resolving a bearer credential (a pre-issued token, or a service-account key exchanged for a short-lived access
//! token), looking an order document up by its gateway reference, and applying a field-masked "paid" patch to it.

mod api;
mod config;
mod credentials;
mod error;

mod data_objects;

pub use api::FirestoreApi;
pub use config::{FirestoreConfig, ServiceAccountKey};
pub use credentials::{AccessToken, CredentialSource, TokenProvider};
pub use data_objects::{order_reference_query, paid_status_fields, Document, QueryRow, PAID_UPDATE_MASK};
pub use error::FirestoreApiError;
