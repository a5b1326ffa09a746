use thiserror::Error;

#[derive(Debug, Error)]
pub enum FirestoreApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("No Firestore credentials are configured")]
    NoCredentials,
    #[error("Invalid service account key material: {0}")]
    KeyError(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
