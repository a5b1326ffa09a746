use std::env;

use firestore_tools::FirestoreConfig;
use log::*;
use paystack_tools::PaystackConfig;

const DEFAULT_PPR_HOST: &str = "127.0.0.1";
const DEFAULT_PPR_PORT: u16 = 8480;

/// The full server configuration, assembled once at startup and handed to each component explicitly. Nothing in the
/// request path reads the environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Paystack gateway configuration, including the shared secret that signs webhook payloads.
    pub paystack: PaystackConfig,
    /// Document-store configuration, including whichever credential source the deployment provides.
    pub firestore: FirestoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PPR_HOST.to_string(),
            port: DEFAULT_PPR_PORT,
            paystack: PaystackConfig::default(),
            firestore: FirestoreConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PPR_HOST").ok().unwrap_or_else(|| DEFAULT_PPR_HOST.into());
        let port = env::var("PPR_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PPR_PORT. {e} Using the default, {DEFAULT_PPR_PORT}, instead."
                    );
                    DEFAULT_PPR_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PPR_PORT);
        let paystack = PaystackConfig::new_from_env_or_default();
        let firestore = FirestoreConfig::new_from_env_or_default();
        Self { host, port, paystack, firestore }
    }
}
