use super::{extracted_media::ExtractedMedia, media_link::MediaLink};

pub const ALL_METHODS_FAILED: &str = "all extraction methods failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub strategy: &'static str,
    pub error: String,
}

/// Outcome of running a platform's strategy chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success(ExtractedMedia),
    Failure {
        error: String,
        /// Every attempt that was made, in order
        attempts: Vec<FailedAttempt>,
    },
}
impl ExtractionResult {
    pub fn failure<T: Into<String>>(error: T, attempts: Vec<FailedAttempt>) -> Self {
        Self::Failure {
            error: error.into(),
            attempts,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn links(&self) -> &[MediaLink] {
        match self {
            Self::Success(media) => media.links(),
            Self::Failure { .. } => &[],
        }
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Success(media) => Some(media.source()),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Success(media) => Some(media.title()),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    #[must_use]
    pub fn attempts(&self) -> &[FailedAttempt] {
        match self {
            Self::Success(_) => &[],
            Self::Failure { attempts, .. } => attempts,
        }
    }
}
