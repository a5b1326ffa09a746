use std::sync::Arc;

use log::*;
use reqwest::Client;

use crate::{
    config::FirestoreConfig,
    credentials::AccessToken,
    data_objects::{order_reference_query, paid_status_fields, Document, QueryRow, PAID_UPDATE_MASK},
    FirestoreApiError,
};

/// REST client for the two document-store operations the relay performs: the order lookup by gateway reference, and
/// the field-masked paid patch.
///
/// Credentials are passed in per call; resolving them is [`crate::TokenProvider`]'s job.
#[derive(Clone)]
pub struct FirestoreApi {
    config: FirestoreConfig,
    client: Arc<Client>,
}

impl FirestoreApi {
    pub fn new(config: FirestoreConfig) -> Result<Self, FirestoreApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FirestoreApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// True when a target project is configured. An empty project id would produce nonsense resource paths, so
    /// callers must treat it as "no document store to talk to".
    pub fn is_configured(&self) -> bool {
        !self.config.project_id.is_empty()
    }

    pub fn run_query_url(&self) -> String {
        format!("{}/projects/{}/databases/(default)/documents:runQuery", self.config.api_url, self.config.project_id)
    }

    pub fn document_url(&self, document_name: &str) -> String {
        format!("{}/{document_name}", self.config.api_url)
    }

    /// Find the order document whose `payment.gatewayReference` equals `reference`.
    ///
    /// `Ok(None)` means no order matched, which is a normal condition (the event may have arrived before the order
    /// document propagated), distinct from transport and authorization errors.
    pub async fn find_order_by_reference(
        &self,
        token: &AccessToken,
        reference: &str,
    ) -> Result<Option<Document>, FirestoreApiError> {
        let url = self.run_query_url();
        trace!("Querying Firestore for order with reference {reference}");
        let response = self
            .client
            .post(url)
            .bearer_auth(token.value.reveal())
            .json(&order_reference_query(reference))
            .send()
            .await
            .map_err(|e| FirestoreApiError::RestResponseError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message =
                response.text().await.map_err(|e| FirestoreApiError::RestResponseError(e.to_string()))?;
            return Err(FirestoreApiError::QueryError { status, message });
        }
        let rows = response.json::<Vec<QueryRow>>().await.map_err(|e| FirestoreApiError::JsonError(e.to_string()))?;
        Ok(rows.into_iter().find_map(|row| row.document))
    }

    /// Apply the paid-status patch to the given document, constrained to the status fields by an explicit update
    /// mask. Safe to apply more than once.
    pub async fn mark_order_paid(
        &self,
        token: &AccessToken,
        document_name: &str,
    ) -> Result<(), FirestoreApiError> {
        let url = self.document_url(document_name);
        let mask = PAID_UPDATE_MASK.map(|field| ("updateMask.fieldPaths", field));
        debug!("Patching order document {document_name} as paid");
        let response = self
            .client
            .patch(url)
            .query(&mask)
            .bearer_auth(token.value.reveal())
            .json(&paid_status_fields())
            .send()
            .await
            .map_err(|e| FirestoreApiError::RestResponseError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message =
                response.text().await.map_err(|e| FirestoreApiError::RestResponseError(e.to_string()))?;
            return Err(FirestoreApiError::QueryError { status, message });
        }
        Ok(())
    }
}
