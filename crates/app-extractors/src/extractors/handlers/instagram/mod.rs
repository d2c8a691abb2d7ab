use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

pub use self::{api::InstagramApi, embed::InstagramEmbed, yt_dlp::InstagramYtDlp};
use crate::{
    common::request::RequestClient,
    extractors::{ExtractionError, ExtractorSettings, StrategyEntry},
    yt_dlp::InfoExtractor,
};

pub mod api;
pub mod embed;
pub mod yt_dlp;

pub const DEFAULT_TITLE: &str = "Instagram Media";
pub const LABEL_VIDEO: &str = "Instagram Video";
pub const LABEL_IMAGE: &str = "Instagram Image";

/// Captions used as titles are cut to this many characters.
pub const TITLE_MAX_CHARS: usize = 50;

static SHORTCODE_MATCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:/p/|/reel/|/tv/)([a-zA-Z0-9_-]+)").expect("Invalid regex"));

/// The post identifier following `/p/`, `/reel/` or `/tv/`.
pub fn shortcode(url: &str) -> Result<&str, ExtractionError> {
    SHORTCODE_MATCH
        .captures(url)
        .and_then(|x| x.get(1))
        .map(|x| x.as_str())
        .ok_or(ExtractionError::MissingShortcode)
}

/// Cut a caption down to a title, counting user-perceived characters.
#[must_use]
pub fn caption_title(caption: Option<&str>) -> String {
    let caption = caption.map(str::trim).unwrap_or_default();

    if caption.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    caption.graphemes(true).take(TITLE_MAX_CHARS).collect()
}

/// yt-dlp first, then the internal API, then the embed page.
pub fn chain(
    settings: &ExtractorSettings,
    info: Arc<dyn InfoExtractor>,
    client: &RequestClient,
) -> Vec<StrategyEntry> {
    vec![
        Arc::new(InstagramYtDlp::new(info)),
        Arc::new(InstagramApi::new(
            client.clone(),
            settings.instagram_base_url.clone(),
            settings.instagram_app_id.clone(),
            settings.instagram_query_hashes.clone(),
        )),
        Arc::new(InstagramEmbed::new(
            client.clone(),
            settings.instagram_base_url.clone(),
        )),
    ]
}
