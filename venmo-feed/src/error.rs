use reqwest::StatusCode;
use thiserror::Error;

/// Every way a page fetch can fail. All of them end the export.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid {0} header value")]
    InvalidHeader(&'static str),

    #[error("failed to create HTTP request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to make HTTP request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to fetch transactions: {status} {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse JSON response: {0}")]
    Decode(#[source] serde_json::Error),
}
