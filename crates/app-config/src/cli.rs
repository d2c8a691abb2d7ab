use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

use crate::{common, server};

/// Turn Instagram, YouTube and TikTok links into direct media links.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[clap(name = "media-grabber", disable_help_flag = true)]
pub struct CliArgs {
    /// Print help
    #[clap(action = ArgAction::Help, long)]
    help: Option<bool>,

    #[command(flatten)]
    pub dependency_path: common::ProgramPathConfig,

    #[command(flatten)]
    pub endpoint: common::EndpointConfig,

    #[command(flatten)]
    pub extractor: common::ExtractorConfig,

    #[command(flatten)]
    pub rate_limit: common::RateLimitConfig,

    #[command(flatten)]
    pub run: common::RunConfig,

    #[command(flatten)]
    pub server: server::ServerConfig,
}
