use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// The subset of yt-dlp's `--dump-json` output the extractors look at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    /// Single direct media URL, reported when yt-dlp resolved one format.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Option<Vec<VideoFormat>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFormat {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Audio bitrate in kbps
    #[serde(default)]
    pub abr: Option<f64>,
}

impl VideoFormat {
    /// yt-dlp marks a missing stream with the codec `"none"`; an absent codec
    /// field means "unknown" and is treated as carrying video.
    #[must_use]
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref() != Some("none")
    }

    #[must_use]
    pub fn is_audio_only(&self) -> bool {
        self.vcodec.as_deref() == Some("none")
            && self.acodec.as_deref().is_some_and(|x| x != "none")
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|x| !x.is_empty())
    }

    #[must_use]
    pub fn height_label(&self) -> String {
        self.height
            .map_or_else(|| "unknown".to_string(), |x| x.to_string())
    }

    fn height_key(&self) -> u32 {
        self.height.unwrap_or_default()
    }

    fn abr_key(&self) -> f64 {
        self.abr.unwrap_or_default()
    }
}

impl VideoInfo {
    pub fn formats(&self) -> impl Iterator<Item = &VideoFormat> {
        self.formats.iter().flatten()
    }

    /// Video formats with a usable URL, highest first.
    ///
    /// The sort is stable so formats of equal height keep yt-dlp's order.
    #[must_use]
    pub fn videos_by_height(&self) -> Vec<&VideoFormat> {
        let mut videos = self
            .formats()
            .filter(|x| x.has_video() && x.url().is_some())
            .collect::<Vec<_>>();

        videos.sort_by_key(|x| std::cmp::Reverse(x.height_key()));

        videos
    }

    #[must_use]
    pub fn best_video(&self) -> Option<&VideoFormat> {
        self.videos_by_height().into_iter().next()
    }

    /// Audio-only format with the highest bitrate. Ties go to the earliest format.
    #[must_use]
    pub fn best_audio(&self) -> Option<&VideoFormat> {
        self.formats()
            .filter(|x| x.is_audio_only() && x.url().is_some())
            .fold(None, |best: Option<&VideoFormat>, x| match best {
                Some(b) if b.abr_key().partial_cmp(&x.abr_key()) != Some(Ordering::Less) => {
                    Some(b)
                }
                _ => Some(x),
            })
    }

    #[must_use]
    pub fn direct_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|x| !x.is_empty())
    }
}
