//! The reconciliation step behind the webhook dispatcher.
//!
//! Reconciliation is modelled as a fire-and-observe step: its outcome is surfaced through logging only and never
//! changes the response the gateway sees. A transient document-store failure must not cause the gateway to replay
//! the event indefinitely; remediation for logged failures is an out-of-band concern.

use std::sync::Arc;

use firestore_tools::{FirestoreApi, FirestoreApiError, TokenProvider};

/// What happened to the order behind a successful charge event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The order document was found and patched as paid.
    OrderMarkedPaid { document: String },
    /// No order matched the reference. Expected when the event outruns order creation, or for references this
    /// system never issued.
    OrderNotFound,
    /// The deployment has no document-store project or credential configured, so reconciliation is disabled.
    SkippedNotConfigured,
}

/// Applies a successful charge to the matching order record.
///
/// Implementations must be idempotent with respect to duplicate delivery: reconciling the same reference twice
/// leaves the order in the same state as reconciling it once.
#[allow(async_fn_in_trait)]
pub trait OrderReconciler {
    async fn reconcile(&self, reference: &str) -> Result<ReconcileOutcome, FirestoreApiError>;
}

/// The production reconciler: resolve a credential, locate the order by its gateway reference, patch it as paid.
#[derive(Clone)]
pub struct FirestoreReconciler {
    api: FirestoreApi,
    tokens: Arc<TokenProvider>,
}

impl FirestoreReconciler {
    pub fn new(api: FirestoreApi, tokens: TokenProvider) -> Self {
        Self { api, tokens: Arc::new(tokens) }
    }
}

impl OrderReconciler for FirestoreReconciler {
    async fn reconcile(&self, reference: &str) -> Result<ReconcileOutcome, FirestoreApiError> {
        // Checked before any token exchange, so a half-configured deployment does not burn an exchange per event.
        if !self.api.is_configured() || !self.tokens.has_credentials() {
            return Ok(ReconcileOutcome::SkippedNotConfigured);
        }
        let token = self.tokens.access_token().await?;
        let document = match self.api.find_order_by_reference(&token, reference).await? {
            Some(document) => document,
            None => return Ok(ReconcileOutcome::OrderNotFound),
        };
        self.api.mark_order_paid(&token, &document.name).await?;
        Ok(ReconcileOutcome::OrderMarkedPaid { document: document.name })
    }
}
