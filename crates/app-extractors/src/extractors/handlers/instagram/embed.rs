use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};
use url::Url;

use super::{shortcode, DEFAULT_TITLE, LABEL_IMAGE, LABEL_VIDEO};
use crate::{
    common::request::{RequestClient, MOBILE_USER_AGENT},
    extractors::{ExtractedMedia, ExtractionError, MediaLink, Strategy, QUALITY_ORIGINAL},
};

/// A named regular expression whose first capture group is a candidate media URL.
#[derive(Debug)]
pub struct EmbedPattern {
    pub name: &'static str,
    regex: Regex,
}
impl EmbedPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("Invalid regex"),
        }
    }

    /// The first capture in `body` that unescapes to an acceptable media URL.
    #[must_use]
    pub fn find_media(&self, body: &str) -> Option<MediaLink> {
        self.regex
            .captures_iter(body)
            .filter_map(|x| x.get(1))
            .map(|x| unescape(x.as_str()))
            .find_map(|x| media_link(&x))
    }
}

/// Tried in order; the first pattern that yields a link wins.
pub static EMBED_PATTERNS: Lazy<[EmbedPattern; 4]> = Lazy::new(|| {
    [
        EmbedPattern::new("video_url", r#""video_url":"([^"]+)""#),
        EmbedPattern::new("display_url", r#""display_url":"([^"]+)""#),
        EmbedPattern::new("videoUrl", r#"videoUrl":"([^"]+)""#),
        EmbedPattern::new("mp4_src", r#"src="([^"]*\.mp4[^"]*)""#),
    ]
});

/// Undo JSON-in-HTML escaping of a captured URL.
#[must_use]
pub fn unescape(raw: &str) -> String {
    raw.replace("\\u0026", "&")
        .replace("\\/", "/")
        .replace('\\', "")
        .replace("&amp;", "&")
}

/// Accept `candidate` only if it is an http(s) URL whose path ends in a known media extension.
#[must_use]
pub fn media_link(candidate: &str) -> Option<MediaLink> {
    if !candidate.starts_with("http") {
        return None;
    }

    let url = Url::parse(candidate).ok()?;
    let path = url.path().to_ascii_lowercase();

    let label = if path.ends_with(".mp4") {
        LABEL_VIDEO
    } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        LABEL_IMAGE
    } else {
        return None;
    };

    Some(MediaLink::new(label, url, QUALITY_ORIGINAL))
}

#[must_use]
pub fn scan(body: &str) -> Option<MediaLink> {
    EMBED_PATTERNS.iter().find_map(|pattern| {
        let link = pattern.find_media(body);
        if link.is_some() {
            trace!(pattern = pattern.name, "Embed pattern matched");
        }
        link
    })
}

/// Scrapes the public embed page (and the legacy `?__a=1` page) of a post.
#[derive(Debug, Clone)]
pub struct InstagramEmbed {
    client: RequestClient,
    base_url: Url,
}
impl InstagramEmbed {
    #[must_use]
    pub const fn new(client: RequestClient, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn pages(&self, shortcode: &str) -> Result<[Url; 2], ExtractionError> {
        let join = |path: String| {
            self.base_url
                .join(&path)
                .map_err(|e| ExtractionError::Other(format!("Invalid Instagram base URL: {e}")))
        };

        let embed = join(format!("/p/{shortcode}/embed/"))?;
        let mut legacy = join(format!("/p/{shortcode}/"))?;
        legacy.set_query(Some("__a=1"));

        Ok([embed, legacy])
    }

    async fn fetch(&self, page: Url) -> Result<String, ExtractionError> {
        let resp = self
            .client
            .get(page)
            .header("User-Agent", MOBILE_USER_AGENT)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("DNT", "1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        trace!(status = ?resp.status(), "Got embed page");

        resp.text().await.map_err(ExtractionError::from)
    }
}

#[async_trait::async_trait]
impl Strategy for InstagramEmbed {
    fn name(&self) -> &'static str {
        "embed"
    }

    fn description(&self) -> &'static str {
        "Scrape media URLs out of Instagram's embed page"
    }

    async fn attempt(&self, url: &Url) -> Result<ExtractedMedia, ExtractionError> {
        let shortcode = shortcode(url.as_str())?;

        for page in self.pages(shortcode)? {
            match self.fetch(page.clone()).await {
                Ok(body) => {
                    if let Some(link) = scan(&body) {
                        return ExtractedMedia::new(self.name(), DEFAULT_TITLE, vec![link]);
                    }
                    debug!(%page, "No media found in page");
                }
                Err(e) => {
                    debug!(%page, "Failed to fetch embed page: {e}");
                }
            }
        }

        Err(ExtractionError::NoMedia)
    }
}
