use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tracing::{error, info, warn, Instrument};
use url::Url;

use crate::{
    extractors::Orchestrator,
    platform::Platform,
    rate_limit::{RateLimitDecision, RateLimiter},
    response::MediaResponse,
};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error. Please try again later.";

/// Why a submitted URL was refused before any extraction work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("no URL given")]
    Empty,
    #[error("not an absolute http(s) URL")]
    NotAUrl,
    #[error("URL does not belong to a supported platform")]
    UnknownPlatform,
    #[error("URL is not a {0} post or video")]
    UnsupportedUrl(Platform),
}
impl InvalidInput {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Empty | Self::NotAUrl => "Invalid or missing URL.".to_string(),
            Self::UnknownPlatform => {
                "Please provide a valid Instagram, YouTube, or TikTok URL.".to_string()
            }
            Self::UnsupportedUrl(platform) => {
                format!("Please provide a valid {} URL.", platform.display_name())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InvalidInput,
    RateLimited,
    ExtractionFailed,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },
    #[error("extraction failed for {platform}: {reason}")]
    ExtractionFailed { platform: Platform, reason: String },
    #[error("internal error: {0}")]
    Internal(String),
}
impl ServiceError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput(_) => ErrorCategory::InvalidInput,
            Self::RateLimited { .. } => ErrorCategory::RateLimited,
            Self::ExtractionFailed { .. } => ErrorCategory::ExtractionFailed,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Whole seconds to wait before retrying, rounded up.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after } => Some(
                RateLimitDecision::Denied {
                    retry_after: *retry_after,
                }
                .retry_after_secs(),
            ),
            _ => None,
        }
    }

    /// Text that is safe to show to the caller. Internal details never appear here.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(e) => e.user_message(),
            Self::RateLimited { .. } => format!(
                "Rate limit exceeded. Please wait {} seconds.",
                self.retry_after_secs().unwrap_or(1)
            ),
            Self::ExtractionFailed { platform, .. } => platform.failure_message().to_string(),
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn to_response(&self) -> MediaResponse {
        MediaResponse::failure(self.user_message())
    }
}

/// Validate, throttle, extract, normalize.
#[derive(Debug, Clone)]
pub struct MediaService {
    orchestrator: Arc<Orchestrator>,
    limiter: RateLimiter,
}
impl MediaService {
    #[must_use]
    pub fn new(orchestrator: Orchestrator, limiter: RateLimiter) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            limiter,
        }
    }

    #[must_use]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    #[must_use]
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Check that `raw_url` is an absolute http(s) URL of a supported post.
    pub fn validate(raw_url: &str) -> Result<(Url, Platform), InvalidInput> {
        let raw_url = raw_url.trim();
        if raw_url.is_empty() {
            return Err(InvalidInput::Empty);
        }

        let url = Url::parse(raw_url).map_err(|_| InvalidInput::NotAUrl)?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(InvalidInput::NotAUrl);
        }

        let platform = Platform::detect(raw_url).ok_or(InvalidInput::UnknownPlatform)?;
        if !platform.is_supported_url(raw_url) {
            return Err(InvalidInput::UnsupportedUrl(platform));
        }

        Ok((url, platform))
    }

    #[tracing::instrument(skip(self, raw_url), fields(platform = tracing::field::Empty))]
    pub async fn handle(
        &self,
        raw_url: &str,
        client_id: &str,
    ) -> Result<MediaResponse, ServiceError> {
        let (url, platform) = Self::validate(raw_url)?;
        tracing::Span::current().record("platform", platform.as_str());

        if let RateLimitDecision::Denied { retry_after } = self.limiter.check_and_record(client_id)
        {
            info!(?retry_after, "Request rate limited");
            return Err(ServiceError::RateLimited { retry_after });
        }

        let orchestrator = self.orchestrator.clone();
        let task_url = url.clone();
        let result = tokio::spawn(
            async move { orchestrator.extract(platform, &task_url).await }.in_current_span(),
        )
        .await
        .map_err(|e| {
            error!(%url, "Extraction task failed: {e}");
            ServiceError::Internal(e.to_string())
        })?;

        if let Some(reason) = result.error() {
            warn!(attempts = ?result.attempts(), "Every extraction strategy failed");
            return Err(ServiceError::ExtractionFailed {
                platform,
                reason: reason.to_string(),
            });
        }

        Ok(MediaResponse::normalize(Some(platform), result))
    }
}
