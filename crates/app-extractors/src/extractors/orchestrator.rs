use std::{collections::HashMap, time::Duration};

use tracing::{info, info_span, warn, Instrument};
use url::Url;

use super::{
    handlers::{self, StrategyChains},
    ExtractedMedia, ExtractionError, ExtractionResult, ExtractorSettings, FailedAttempt,
    Strategy, StrategyEntry, StrategySummary, ALL_METHODS_FAILED,
};
use crate::platform::Platform;

/// Runs a platform's strategy chain in order and returns the first success.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    chains: StrategyChains,
    attempt_timeout: Option<Duration>,
}
impl Orchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Production chains for every platform.
    pub fn from_settings(settings: &ExtractorSettings) -> Result<Self, String> {
        let chains = handlers::default_chains(settings)?;

        Ok(Self::new()
            .with_chains(chains)
            .with_attempt_timeout(settings.attempt_timeout))
    }

    #[must_use]
    pub fn with_chains(mut self, chains: StrategyChains) -> Self {
        self.chains = chains;
        self
    }

    #[must_use]
    pub fn with_chain(mut self, platform: Platform, chain: Vec<StrategyEntry>) -> Self {
        self.chains.insert(platform, chain);
        self
    }

    /// Abort a single strategy attempt after `timeout` and move on to the next one.
    #[must_use]
    pub const fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn chain(&self, platform: Platform) -> &[StrategyEntry] {
        self.chains
            .get(&platform)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every configured chain, strategies listed in the order they are tried.
    #[must_use]
    pub fn platforms(&self) -> HashMap<Platform, Vec<StrategySummary>> {
        self.chains
            .iter()
            .map(|(platform, chain)| {
                let summaries = chain.iter().map(|x| StrategySummary::of(x.as_ref())).collect();

                (*platform, summaries)
            })
            .collect()
    }

    /// Try each strategy of the platform's chain until one produces media.
    ///
    /// Strategies after the first success are never invoked. A failing strategy
    /// is logged and recorded, never propagated.
    pub async fn extract(&self, platform: Platform, url: &Url) -> ExtractionResult {
        let chain = self.chain(platform);
        if chain.is_empty() {
            warn!(%platform, "No extraction strategies configured");
            return ExtractionResult::failure(ALL_METHODS_FAILED, vec![]);
        }

        let mut attempts = Vec::with_capacity(chain.len());

        for strategy in chain {
            let span = info_span!("strategy", %platform, strategy = strategy.name());

            match self.attempt(strategy.as_ref(), url).instrument(span).await {
                Ok(media) => {
                    info!(
                        %platform,
                        strategy = strategy.name(),
                        links = media.links().len(),
                        "Extraction succeeded"
                    );
                    return ExtractionResult::Success(media);
                }

                Err(e) => {
                    warn!(
                        %platform,
                        strategy = strategy.name(),
                        "Extraction strategy failed: {e}"
                    );
                    attempts.push(FailedAttempt {
                        strategy: strategy.name(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let error = match attempts.as_slice() {
            [only] => only.error.clone(),
            _ => ALL_METHODS_FAILED.to_string(),
        };

        ExtractionResult::failure(error, attempts)
    }

    async fn attempt(
        &self,
        strategy: &dyn Strategy,
        url: &Url,
    ) -> Result<ExtractedMedia, ExtractionError> {
        match self.attempt_timeout {
            Some(timeout) => tokio::time::timeout(timeout, strategy.attempt(url))
                .await
                .map_err(|_| ExtractionError::TimedOut(timeout))?,
            None => strategy.attempt(url).await,
        }
    }
}
