use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// The media endpoint answered with a non-success status.
    #[error("Instagram API error: {status}")]
    Api { status: u16 },
    /// The request could not be sent or the body could not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body was not JSON at all.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

pub type FeedResult<T> = Result<T, FeedError>;
