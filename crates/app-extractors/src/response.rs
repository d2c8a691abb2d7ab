use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    extractors::{ExtractedMedia, ExtractionResult, MediaLink},
    platform::Platform,
};

/// The body returned to callers for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<MediaLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
impl MediaResponse {
    /// Turn a chain outcome into the outward shape.
    ///
    /// Failures for a known platform get that platform's explanation; the raw
    /// chain error is only surfaced when no platform is known.
    #[must_use]
    pub fn normalize(platform: Option<Platform>, result: ExtractionResult) -> Self {
        match result {
            ExtractionResult::Success(media) => Self::success(platform, media),
            ExtractionResult::Failure { error, .. } => {
                let message = platform.map_or(error, |x| x.failure_message().to_string());

                Self::failure(message)
            }
        }
    }

    #[must_use]
    pub fn success(platform: Option<Platform>, media: ExtractedMedia) -> Self {
        let (title, source, links, thumbnail) = media.into_parts();

        Self {
            success: true,
            links: Some(links),
            title: Some(title),
            source: Some(source),
            platform,
            thumbnail,
            error: None,
        }
    }

    pub fn failure<T: Into<String>>(message: T) -> Self {
        Self {
            success: false,
            links: None,
            title: None,
            source: None,
            platform: None,
            thumbnail: None,
            error: Some(message.into()),
        }
    }
}
