use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The closed set of platforms that have an extraction chain.
///
/// Adding a platform means adding a detection rule here and a strategy chain
/// in [`crate::extractors::handlers::default_chains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Youtube,
    Tiktok,
}

static INSTAGRAM_POST_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://([a-z0-9-]+\.)?(instagram\.com|instagr\.am)/(p|reel|tv)/[a-zA-Z0-9_-]+")
        .expect("Invalid regex")
});

static YOUTUBE_VIDEO_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://([a-z0-9-]+\.)?(youtube\.com/(watch\?(.*&)?v=|embed/|v/|shorts/)|youtu\.be/)[a-zA-Z0-9_-]+",
    )
    .expect("Invalid regex")
});

static TIKTOK_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://([a-z0-9-]+\.)?tiktok\.com/").expect("Invalid regex")
});

impl Platform {
    /// Detection order. The first platform with a matching fragment wins.
    pub const ALL: [Self; 3] = [Self::Instagram, Self::Youtube, Self::Tiktok];

    /// Classify a raw URL by case-insensitive substring match on known domains.
    ///
    /// Pure and infallible: anything unrecognised is `None`.
    #[must_use]
    pub fn detect(url: &str) -> Option<Self> {
        let url = url.to_lowercase();

        Self::ALL
            .into_iter()
            .find(|platform| platform.domain_fragments().iter().any(|x| url.contains(x)))
    }

    #[must_use]
    pub const fn domain_fragments(self) -> &'static [&'static str] {
        match self {
            Self::Instagram => &["instagram.com", "instagr.am"],
            Self::Youtube => &["youtube.com", "youtu.be"],
            Self::Tiktok => &["tiktok.com"],
        }
    }

    /// Whether the URL points at something this platform's chain can extract
    /// (a post, a video), as opposed to e.g. a profile page.
    #[must_use]
    pub fn is_supported_url(self, url: &str) -> bool {
        let url = url.trim();

        match self {
            Self::Instagram => INSTAGRAM_POST_URL.is_match(url),
            Self::Youtube => YOUTUBE_VIDEO_URL.is_match(url),
            Self::Tiktok => TIKTOK_URL.is_match(url),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
            Self::Youtube => "YouTube",
            Self::Tiktok => "TikTok",
        }
    }

    /// User-facing explanation used when every strategy for the platform failed.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Instagram => {
                "Unable to fetch media from Instagram. The post might be private, deleted, or \
                 temporarily unavailable."
            }
            Self::Youtube => {
                "Unable to fetch video from YouTube. The video might be private, deleted, \
                 age-restricted, or temporarily unavailable."
            }
            Self::Tiktok => {
                "Unable to fetch video from TikTok. The video might be private, deleted, or \
                 temporarily unavailable."
            }
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_domains_case_insensitively() {
        let cases = [
            ("https://www.instagram.com/p/ABC123/", Some(Platform::Instagram)),
            ("HTTPS://INSTAGR.AM/p/xyz", Some(Platform::Instagram)),
            ("https://youtube.com/watch?v=dQw4w9WgXcQ", Some(Platform::Youtube)),
            ("https://YOUTU.BE/dQw4w9WgXcQ", Some(Platform::Youtube)),
            ("https://www.tiktok.com/@user/video/123", Some(Platform::Tiktok)),
            ("https://vimeo.com/123", None),
            ("not a url", None),
            ("", None),
        ];

        for (url, expected) in cases {
            assert_eq!(Platform::detect(url), expected, "{url}");
        }
    }

    #[test]
    fn detection_order_is_instagram_youtube_tiktok() {
        // Substring matching means a URL can mention several platforms.
        assert_eq!(
            Platform::detect("https://tiktok.com/?ref=youtube.com&from=instagram.com"),
            Some(Platform::Instagram)
        );
        assert_eq!(
            Platform::detect("https://www.tiktok.com/share?u=youtu.be/abc"),
            Some(Platform::Youtube)
        );
    }

    #[test]
    fn detection_is_repeatable() {
        let url = "https://www.instagram.com/reel/Cx_1-a/";

        assert_eq!(Platform::detect(url), Platform::detect(url));
    }

    #[test]
    fn supported_url_shapes() {
        assert!(Platform::Instagram.is_supported_url("https://www.instagram.com/p/ABC123/"));
        assert!(Platform::Instagram.is_supported_url("https://instagr.am/reel/a_b-c"));
        assert!(Platform::Instagram.is_supported_url("https://instagram.com/tv/xyz?igsh=1"));
        assert!(!Platform::Instagram.is_supported_url("https://www.instagram.com/someuser/"));

        assert!(Platform::Youtube.is_supported_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(Platform::Youtube
            .is_supported_url("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"));
        assert!(Platform::Youtube.is_supported_url("https://m.youtube.com/shorts/abcDEF123"));
        assert!(Platform::Youtube.is_supported_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(!Platform::Youtube.is_supported_url("https://www.youtube.com/@channel"));

        assert!(Platform::Tiktok.is_supported_url("https://www.tiktok.com/@user/video/1"));
        assert!(Platform::Tiktok.is_supported_url("https://vm.tiktok.com/ZMabc/"));
        assert!(!Platform::Tiktok.is_supported_url("ftp://tiktok.com/x"));
    }

    #[test]
    fn serializes_as_lowercase_tag() {
        for platform in Platform::ALL {
            assert_eq!(
                serde_json::to_value(platform).expect("serializable"),
                serde_json::Value::String(platform.to_string())
            );
        }
    }
}
