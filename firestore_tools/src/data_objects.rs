use serde::Deserialize;
use serde_json::{Map, Value};

/// The field paths the paid patch is allowed to touch. Everything else on the order document is preserved.
pub const PAID_UPDATE_MASK: [&str; 2] = ["status", "payment.paymentStatus"];

/// One row of a `:runQuery` response. Rows without a `document` key (read-time markers, partial progress) are
/// skipped by callers.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRow {
    #[serde(default)]
    pub document: Option<Document>,
}

/// A Firestore document envelope. `name` is the full resource path, which doubles as the patch target.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// The structured query that locates an order by the payment reference assigned at initialization time.
/// The reference is unique per order, hence `limit 1`.
pub fn order_reference_query(reference: &str) -> Value {
    serde_json::json!({
        "structuredQuery": {
            "from": [{ "collectionId": "orders" }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "payment.gatewayReference" },
                    "op": "EQUAL",
                    "value": { "stringValue": reference }
                }
            },
            "limit": 1
        }
    })
}

/// The Firestore typed-value body for the paid patch. Absolute values, so applying it twice is a no-op the second
/// time.
pub fn paid_status_fields() -> Value {
    serde_json::json!({
        "fields": {
            "status": { "stringValue": "Approved" },
            "payment": { "mapValue": { "fields": { "paymentStatus": { "stringValue": "Paid" } } } }
        }
    })
}
