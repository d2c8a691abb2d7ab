pub mod extractors;
pub mod platform;
pub mod rate_limit;
pub mod response;
pub mod service;
pub mod yt_dlp;

pub(crate) mod common;

pub use extractors::{ExtractorSettings, Orchestrator};
pub use platform::Platform;
pub use rate_limit::RateLimiter;
pub use response::MediaResponse;
pub use service::{ErrorCategory, MediaService, ServiceError};
