use clap::Args;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = "Server options")]
pub struct ServerConfig {
    /// The port on which the server will listen.
    #[arg(long, default_value = "5000", env = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    #[validate(range(min = 1))]
    pub port: u16,

    /// The host on which the server will listen.
    #[arg(long, default_value = "127.0.0.1", env = "HOST")]
    #[validate(length(min = 1))]
    pub host: String,

    /// Use the first `X-Forwarded-For` entry as the client identity for rate limiting.
    ///
    /// Only enable this when running behind a reverse proxy that sets the header.
    #[arg(long, default_value_t = false, env = "MEDIA_GRABBER_TRUST_FORWARDED_FOR")]
    pub trust_forwarded_for: bool,
}
