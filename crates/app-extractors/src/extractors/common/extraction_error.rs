use std::time::Duration;

use crate::yt_dlp::InfoError;

/// Why a single strategy attempt did not produce media.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("URL does not contain a post shortcode")]
    MissingShortcode,
    #[error("no media found")]
    NoMedia,
    #[error("invalid media URL {url:?}: {reason}")]
    InvalidMediaUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error(transparent)]
    Info(#[from] InfoError),
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("{0}")]
    Other(String),
}
