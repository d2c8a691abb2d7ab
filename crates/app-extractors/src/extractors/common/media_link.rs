use serde::{Deserialize, Serialize};
use url::Url;

use super::extraction_error::ExtractionError;

pub const QUALITY_ORIGINAL: &str = "original";
pub const QUALITY_AUDIO: &str = "audio";

/// One direct media URL offered to the user.
///
/// `label` is for humans only; `quality` is a resolution, `audio` or `original`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLink {
    pub label: String,
    pub url: Url,
    pub quality: String,
}
impl MediaLink {
    #[must_use]
    pub fn new<L, Q>(label: L, url: Url, quality: Q) -> Self
    where
        L: Into<String>,
        Q: Into<String>,
    {
        Self {
            label: label.into(),
            url,
            quality: quality.into(),
        }
    }

    /// Build a link from a raw URL string, rejecting anything that is not an absolute URL.
    pub fn parse<L, Q>(label: L, url: &str, quality: Q) -> Result<Self, ExtractionError>
    where
        L: Into<String>,
        Q: Into<String>,
    {
        let parsed = Url::parse(url).map_err(|e| ExtractionError::InvalidMediaUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(ExtractionError::InvalidMediaUrl {
                url: url.to_string(),
                reason: "URL is not absolute".to_string(),
            });
        }

        Ok(Self::new(label, parsed, quality))
    }
}
