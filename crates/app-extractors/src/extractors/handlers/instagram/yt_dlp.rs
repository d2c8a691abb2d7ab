use std::sync::Arc;

use tracing::debug;
use url::Url;

use super::DEFAULT_TITLE;
use crate::{
    common::request::USER_AGENT,
    extractors::{ExtractedMedia, ExtractionError, MediaLink, Strategy, QUALITY_ORIGINAL},
    yt_dlp::{InfoExtractor, InfoOptions, VideoInfo},
};

pub const FORMAT: &str = "best";

#[derive(Debug)]
pub struct InstagramYtDlp {
    info: Arc<dyn InfoExtractor>,
}
impl InstagramYtDlp {
    #[must_use]
    pub fn new(info: Arc<dyn InfoExtractor>) -> Self {
        Self { info }
    }
}

#[async_trait::async_trait]
impl Strategy for InstagramYtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn description(&self) -> &'static str {
        "Resolve Instagram posts through yt-dlp"
    }

    async fn attempt(&self, url: &Url) -> Result<ExtractedMedia, ExtractionError> {
        let options = InfoOptions::default()
            .with_format(FORMAT)
            .with_user_agent(USER_AGENT);

        let info = self.info.extract_info(url, &options).await?;
        let links = links_from_info(&info);
        debug!(links = links.len(), "Got Instagram links from yt-dlp");

        ExtractedMedia::new(
            self.name(),
            info.title.as_deref().unwrap_or(DEFAULT_TITLE),
            links,
        )
        .map(|x| x.with_thumbnail(info.thumbnail.as_deref()))
    }
}

/// The tallest video format, or the single resolved URL when there is none.
pub fn links_from_info(info: &VideoInfo) -> Vec<MediaLink> {
    let best = info.best_video().and_then(|x| {
        let url = x.url()?;
        let height = x.height_label();

        MediaLink::parse(format!("Video {height}p"), url, height).ok()
    });

    if let Some(link) = best {
        return vec![link];
    }

    info.direct_url()
        .and_then(|x| MediaLink::parse(DEFAULT_TITLE, x, QUALITY_ORIGINAL).ok())
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yt_dlp::{stub::StubInfo, VideoFormat};

    fn video(height: Option<u32>, url: &str) -> VideoFormat {
        VideoFormat {
            url: Some(url.to_string()),
            vcodec: Some("avc1".to_string()),
            height,
            ..VideoFormat::default()
        }
    }

    #[test]
    fn picks_tallest_video() {
        let info = VideoInfo {
            formats: Some(vec![
                video(Some(480), "https://cdn.example.com/480.mp4"),
                video(Some(1080), "https://cdn.example.com/1080.mp4"),
            ]),
            url: Some("https://cdn.example.com/direct.mp4".to_string()),
            ..VideoInfo::default()
        };

        let links = links_from_info(&info);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].label, "Video 1080p");
        assert_eq!(links[0].quality, "1080");
        assert_eq!(links[0].url.path(), "/1080.mp4");
    }

    #[test]
    fn unknown_height_is_labelled_unknown() {
        let info = VideoInfo {
            formats: Some(vec![video(None, "https://cdn.example.com/v.mp4")]),
            ..VideoInfo::default()
        };

        let links = links_from_info(&info);

        assert_eq!(links[0].label, "Video unknownp");
        assert_eq!(links[0].quality, "unknown");
    }

    #[test]
    fn falls_back_to_direct_url() {
        let info = VideoInfo {
            formats: Some(vec![]),
            url: Some("https://cdn.example.com/photo.jpg".to_string()),
            ..VideoInfo::default()
        };

        let links = links_from_info(&info);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].label, DEFAULT_TITLE);
        assert_eq!(links[0].quality, QUALITY_ORIGINAL);
    }

    #[test]
    fn nothing_usable_gives_no_links() {
        assert!(links_from_info(&VideoInfo::default()).is_empty());
    }

    fn post_url() -> Url {
        Url::parse("https://www.instagram.com/reel/ABC123/").expect("valid url")
    }

    #[tokio::test]
    async fn attempt_sends_best_format_and_browser_agent() {
        let info = Arc::new(StubInfo::ok(VideoInfo {
            formats: Some(vec![video(Some(720), "https://cdn.example.com/720.mp4")]),
            thumbnail: Some("https://cdn.example.com/cover.jpg".to_string()),
            ..VideoInfo::default()
        }));

        let media = InstagramYtDlp::new(info.clone())
            .attempt(&post_url())
            .await
            .expect("media");

        assert_eq!(media.source(), "yt-dlp");
        assert_eq!(media.title(), DEFAULT_TITLE);
        assert_eq!(media.links()[0].label, "Video 720p");
        assert!(media.thumbnail().is_some());

        let calls = info.calls();
        assert_eq!(calls[0].0, post_url());
        assert_eq!(
            calls[0].1,
            InfoOptions::default()
                .with_format(FORMAT)
                .with_user_agent(USER_AGENT)
        );
    }

    #[tokio::test]
    async fn extractor_error_fails_the_attempt() {
        let info = Arc::new(StubInfo::failing("exit status: 1", "Login required"));

        let res = InstagramYtDlp::new(info).attempt(&post_url()).await;

        assert!(matches!(res, Err(ExtractionError::Info(_))));
    }
}
