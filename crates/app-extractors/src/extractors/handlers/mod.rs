pub mod instagram;
pub mod tiktok;
pub mod youtube;

use std::{collections::HashMap, sync::Arc};

use super::{ExtractorSettings, StrategyEntry};
use crate::{
    common::request::Client,
    platform::Platform,
    yt_dlp::{InfoExtractor, YtDlp},
};

pub type StrategyChains = HashMap<Platform, Vec<StrategyEntry>>;

/// The production chains, backed by the `yt-dlp` binary from `settings`.
pub fn default_chains(settings: &ExtractorSettings) -> Result<StrategyChains, String> {
    let info = YtDlp::new(&settings.yt_dlp_path).with_timeout(settings.yt_dlp_timeout);

    default_chains_with(settings, Arc::new(info))
}

/// The production chains with a caller-provided metadata extractor.
pub fn default_chains_with(
    settings: &ExtractorSettings,
    info: Arc<dyn InfoExtractor>,
) -> Result<StrategyChains, String> {
    let client = Client::base(settings.http_timeout)?;

    let youtube: StrategyEntry = Arc::new(youtube::YoutubeYtDlp::new(info.clone()));
    let tiktok: StrategyEntry = Arc::new(tiktok::TiktokYtDlp::new(info.clone()));

    Ok(HashMap::from([
        (
            Platform::Instagram,
            instagram::chain(settings, info, &client),
        ),
        (Platform::Youtube, vec![youtube]),
        (Platform::Tiktok, vec![tiktok]),
    ]))
}
