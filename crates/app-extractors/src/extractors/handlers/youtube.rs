use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::{
    extractors::{ExtractedMedia, ExtractionError, MediaLink, Strategy, QUALITY_AUDIO},
    yt_dlp::{InfoExtractor, InfoOptions, VideoInfo},
};

pub const FORMAT: &str = "best/bestvideo+bestaudio/best[height<=1080]";
pub const DEFAULT_TITLE: &str = "YouTube Video";

/// How many video qualities are offered.
pub const MAX_VIDEO_LINKS: usize = 3;

#[derive(Debug)]
pub struct YoutubeYtDlp {
    info: Arc<dyn InfoExtractor>,
}
impl YoutubeYtDlp {
    #[must_use]
    pub fn new(info: Arc<dyn InfoExtractor>) -> Self {
        Self { info }
    }
}

#[async_trait::async_trait]
impl Strategy for YoutubeYtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn description(&self) -> &'static str {
        "List the best YouTube video formats and an audio-only track"
    }

    async fn attempt(&self, url: &Url) -> Result<ExtractedMedia, ExtractionError> {
        let options = InfoOptions::default().with_format(FORMAT);

        let info = self.info.extract_info(url, &options).await?;
        let links = links_from_info(&info);
        debug!(links = links.len(), "Got YouTube links");

        ExtractedMedia::new(
            self.name(),
            info.title.as_deref().unwrap_or(DEFAULT_TITLE),
            links,
        )
        .map(|x| x.with_thumbnail(info.thumbnail.as_deref()))
    }
}

/// Up to three tallest video formats followed by the best audio-only format.
///
/// Without any formats the single resolved URL is offered instead.
pub fn links_from_info(info: &VideoInfo) -> Vec<MediaLink> {
    let mut links = info
        .videos_by_height()
        .into_iter()
        .filter_map(|x| {
            let height = x.height_label();
            let ext = x.ext.as_deref().unwrap_or("mp4");

            MediaLink::parse(format!("Video {height}p ({ext})"), x.url()?, height).ok()
        })
        .take(MAX_VIDEO_LINKS)
        .collect::<Vec<_>>();

    let audio = info.best_audio().and_then(|x| {
        let ext = x.ext.as_deref().unwrap_or("mp3");

        MediaLink::parse(format!("Audio Only ({ext})"), x.url()?, QUALITY_AUDIO).ok()
    });
    links.extend(audio);

    if links.is_empty() {
        let fallback = info.direct_url().and_then(|x| {
            let ext = info.ext.as_deref().unwrap_or("mp4");

            MediaLink::parse(format!("Video ({ext})"), x, "unknown").ok()
        });
        links.extend(fallback);
    }

    links
}
