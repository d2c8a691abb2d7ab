use serde::{Deserialize, Serialize};
use url::Url;

use super::{extraction_error::ExtractionError, media_link::MediaLink};

/// A successful extraction. Always holds at least one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMedia {
    title: String,
    source: String,
    links: Vec<MediaLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thumbnail: Option<Url>,
}
impl ExtractedMedia {
    pub fn new<S, T>(source: S, title: T, links: Vec<MediaLink>) -> Result<Self, ExtractionError>
    where
        S: Into<String>,
        T: Into<String>,
    {
        if links.is_empty() {
            return Err(ExtractionError::NoMedia);
        }

        Ok(Self {
            title: title.into(),
            source: source.into(),
            links,
            thumbnail: None,
        })
    }

    /// Attach a thumbnail. Unparseable URLs are dropped.
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: Option<&str>) -> Self {
        self.thumbnail = thumbnail.and_then(|x| Url::parse(x).ok());
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Name of the strategy that produced this result.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn links(&self) -> &[MediaLink] {
        &self.links
    }

    #[must_use]
    pub const fn thumbnail(&self) -> Option<&Url> {
        self.thumbnail.as_ref()
    }

    #[must_use]
    pub fn into_parts(self) -> (String, String, Vec<MediaLink>, Option<Url>) {
        (self.title, self.source, self.links, self.thumbnail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::common::media_link::QUALITY_ORIGINAL;

    #[test]
    fn refuses_empty_link_list() {
        let res = ExtractedMedia::new("embed", "Instagram Media", vec![]);

        assert!(matches!(res, Err(ExtractionError::NoMedia)));
    }

    #[test]
    fn drops_invalid_thumbnail() {
        let link = MediaLink::parse("Instagram Image", "https://cdn.example.com/a.jpg", QUALITY_ORIGINAL)
            .expect("valid link");

        let media = ExtractedMedia::new("embed", "t", vec![link])
            .expect("non-empty")
            .with_thumbnail(Some("not a url"));

        assert!(media.thumbnail().is_none());
    }
}
