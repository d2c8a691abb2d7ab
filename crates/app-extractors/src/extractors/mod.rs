use std::{fmt::Debug, sync::Arc};

use serde::Serialize;
use url::Url;

pub use common::{
    extracted_media::ExtractedMedia,
    extraction_error::ExtractionError,
    extraction_result::{ExtractionResult, FailedAttempt, ALL_METHODS_FAILED},
    media_link::{MediaLink, QUALITY_AUDIO, QUALITY_ORIGINAL},
};
pub use orchestrator::Orchestrator;
pub use settings::ExtractorSettings;

mod common;
pub mod handlers;
pub mod orchestrator;
pub mod settings;

/// One way of turning a post URL into direct media links.
///
/// Strategies for a platform are tried in order until one succeeds.
#[async_trait::async_trait]
pub trait Strategy: Debug + Send + Sync {
    /// Tag reported as the result `source` on success
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn attempt(&self, url: &Url) -> Result<ExtractedMedia, ExtractionError>;
}

pub type StrategyEntry = Arc<dyn Strategy>;

/// What a strategy calls itself, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategySummary {
    pub name: &'static str,
    pub description: &'static str,
}
impl StrategySummary {
    #[must_use]
    pub fn of(strategy: &dyn Strategy) -> Self {
        Self {
            name: strategy.name(),
            description: strategy.description(),
        }
    }
}
