use firestore_tools::FirestoreApiError;
use mockall::mock;

use crate::reconciliation::{OrderReconciler, ReconcileOutcome};

mock! {
    pub Reconciler {}
    impl OrderReconciler for Reconciler {
        async fn reconcile(&self, reference: &str) -> Result<ReconcileOutcome, FirestoreApiError>;
    }
}
