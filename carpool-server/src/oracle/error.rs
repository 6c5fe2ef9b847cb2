//! Routing provider error types.

use std::sync::Arc;

/// Errors from geocoding and routing lookups.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The geocoder found no match for the address
    #[error("address not found: {address}")]
    AddressNotFound { address: String },

    /// The request did not complete in time
    #[error("timed out during {operation}")]
    Timeout { operation: &'static str },

    /// HTTP request failed (connection error, body read error, etc.)
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Provider returned a non-success HTTP status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Provider answered, but with a non-OK status field
    #[error("{operation} error: {status}")]
    Status {
        operation: &'static str,
        status: String,
    },

    /// Response body could not be parsed or lacked the expected fields
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Provider cannot answer for another reason (no route, no data)
    #[error("routing unavailable: {0}")]
    Unavailable(String),
}

impl OracleError {
    /// Whether the failure is caused by user input rather than the provider.
    pub fn is_address_not_found(&self) -> bool {
        matches!(self, OracleError::AddressNotFound { .. })
    }

    /// Whether the failure is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, OracleError::Timeout { .. })
    }
}

impl OracleError {
    /// Owned copy of a shared error. `reqwest::Error` cannot be cloned, so
    /// transport errors keep only their message.
    fn duplicate(&self) -> Self {
        match self {
            OracleError::AddressNotFound { address } => OracleError::AddressNotFound {
                address: address.clone(),
            },
            OracleError::Timeout { operation } => OracleError::Timeout {
                operation: *operation,
            },
            OracleError::Http(err) => OracleError::Unavailable(format!("HTTP error: {err}")),
            OracleError::Api { status, message } => OracleError::Api {
                status: *status,
                message: message.clone(),
            },
            OracleError::Status { operation, status } => OracleError::Status {
                operation: *operation,
                status: status.clone(),
            },
            OracleError::Json { message, body } => OracleError::Json {
                message: message.clone(),
                body: body.clone(),
            },
            OracleError::Unavailable(reason) => OracleError::Unavailable(reason.clone()),
        }
    }
}

/// The cache shares one upstream error between every caller that waited on
/// the same lookup.
impl From<Arc<OracleError>> for OracleError {
    fn from(shared: Arc<OracleError>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(|still_shared| still_shared.duplicate())
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OracleError::Timeout {
                operation: "HTTP request",
            }
        } else {
            OracleError::Http(err)
        }
    }
}
