use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::{
    extractors::{ExtractedMedia, ExtractionError, MediaLink, Strategy, QUALITY_ORIGINAL},
    yt_dlp::{InfoExtractor, InfoOptions, VideoInfo},
};

pub const DEFAULT_TITLE: &str = "TikTok Video";

#[derive(Debug)]
pub struct TiktokYtDlp {
    info: Arc<dyn InfoExtractor>,
}
impl TiktokYtDlp {
    #[must_use]
    pub fn new(info: Arc<dyn InfoExtractor>) -> Self {
        Self { info }
    }
}

#[async_trait::async_trait]
impl Strategy for TiktokYtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn description(&self) -> &'static str {
        "List every TikTok format yt-dlp can resolve"
    }

    async fn attempt(&self, url: &Url) -> Result<ExtractedMedia, ExtractionError> {
        let info = self.info.extract_info(url, &InfoOptions::default()).await?;
        let links = links_from_info(&info);
        debug!(links = links.len(), "Got TikTok links");

        ExtractedMedia::new(
            self.name(),
            info.title.as_deref().unwrap_or(DEFAULT_TITLE),
            links,
        )
        .map(|x| x.with_thumbnail(info.thumbnail.as_deref()))
    }
}

/// One link per format with a URL, in yt-dlp's order.
///
/// Falls back to the single resolved URL when no format carries one.
pub fn links_from_info(info: &VideoInfo) -> Vec<MediaLink> {
    let links = info
        .formats()
        .filter_map(|x| {
            let ext = x.ext.as_deref().unwrap_or("mp4");
            let quality = x
                .height
                .map_or_else(|| QUALITY_ORIGINAL.to_string(), |h| h.to_string());

            MediaLink::parse(format!("TikTok Video ({ext})"), x.url()?, quality).ok()
        })
        .collect::<Vec<_>>();

    if !links.is_empty() {
        return links;
    }

    info.direct_url()
        .and_then(|x| MediaLink::parse(DEFAULT_TITLE, x, QUALITY_ORIGINAL).ok())
        .into_iter()
        .collect()
}
