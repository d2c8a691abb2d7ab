use std::{path::PathBuf, time::Duration};

use app_config::common::{
    DEFAULT_INSTAGRAM_APP_ID, DEFAULT_INSTAGRAM_BASE_URL, DEFAULT_INSTAGRAM_QUERY_HASHES,
};
use url::Url;

/// Everything the default strategy chains need to reach the outside world.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub yt_dlp_path: PathBuf,
    pub yt_dlp_timeout: Duration,
    pub http_timeout: Duration,
    /// Upper bound for a single strategy attempt
    pub attempt_timeout: Duration,
    pub instagram_base_url: Url,
    pub instagram_app_id: String,
    pub instagram_query_hashes: Vec<String>,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            yt_dlp_path: PathBuf::from("yt-dlp"),
            yt_dlp_timeout: crate::yt_dlp::DEFAULT_TIMEOUT,
            http_timeout: crate::common::request::DEFAULT_TIMEOUT,
            attempt_timeout: Duration::from_secs(90),
            instagram_base_url: Url::parse(DEFAULT_INSTAGRAM_BASE_URL)
                .expect("Invalid default Instagram URL"),
            instagram_app_id: DEFAULT_INSTAGRAM_APP_ID.to_string(),
            instagram_query_hashes: DEFAULT_INSTAGRAM_QUERY_HASHES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
