//! # Paystack Payment Relay server
//! This module hosts the server code for the relay. It is responsible for:
//! Listening for incoming webhook notifications from Paystack and authenticating them.
//! Reconciling successful charges against the order documents held in Firestore.
//! Proxying the storefront's transaction initialize and verify calls to Paystack.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/paystack/webhook`: The webhook route for receiving charge events from Paystack.
//! * `/paystack/initialize`: A proxy for Paystack's transaction initialize endpoint.
//! * `/paystack/verify`: A proxy for Paystack's transaction verify endpoint.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod reconciliation;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
