//! Error results that can be returned from the net module
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request error: {0}")]
    Request(#[from] crate::http::HttpError),

    #[error("io error: {0}")]
    IO(#[from] std::io::Error),

    #[error("failed to parse url: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("{url} returned status {status} {status_text}")]
    Status {
        url: String,
        status: u16,
        status_text: String,
    },
}
