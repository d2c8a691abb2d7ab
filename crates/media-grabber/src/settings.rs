use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use app_config::Config;
use app_extractors::{ExtractorSettings, MediaService, Orchestrator, RateLimiter};
use url::Url;

pub fn extractor_settings(config: &Config) -> anyhow::Result<ExtractorSettings> {
    let instagram_base_url = Url::parse(&config.endpoint.instagram_base_url)
        .context("Invalid Instagram base URL")?;

    Ok(ExtractorSettings {
        yt_dlp_path: config
            .dependency_paths
            .yt_dlp_path()
            .map_or_else(|| PathBuf::from("yt-dlp"), ToOwned::to_owned),
        yt_dlp_timeout: config.extractor.yt_dlp_timeout.duration(),
        http_timeout: config.extractor.http_timeout.duration(),
        attempt_timeout: config.extractor.attempt_timeout.duration(),
        instagram_base_url,
        instagram_app_id: config.extractor.instagram_app_id.clone(),
        instagram_query_hashes: config.extractor.instagram_query_hashes.clone(),
    })
}

pub fn build_service(config: &Config) -> anyhow::Result<MediaService> {
    let settings = extractor_settings(config)?;
    let orchestrator = Orchestrator::from_settings(&settings)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to build extraction chains")?;
    let limiter = RateLimiter::new(config.rate_limit.window.duration());

    Ok(MediaService::new(orchestrator, limiter))
}

/// Upper bound for a whole request: every attempt of the longest chain, plus slack.
#[must_use]
pub fn request_timeout(config: &Config, longest_chain: usize) -> Duration {
    let attempts = u32::try_from(longest_chain.max(1)).unwrap_or(u32::MAX);

    config
        .extractor
        .attempt_timeout
        .duration()
        .saturating_mul(attempts)
        .saturating_add(Duration::from_secs(30))
}
