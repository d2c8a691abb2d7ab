use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use clap::{Args, CommandFactory, ValueEnum, ValueHint};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

use crate::{
    cli::CliArgs,
    timeframe::{parse_timeframe, Timeframe},
};

pub const DEFAULT_INSTAGRAM_BASE_URL: &str = "https://www.instagram.com";
pub const DEFAULT_INSTAGRAM_APP_ID: &str = "936619743392459";
pub const DEFAULT_INSTAGRAM_QUERY_HASHES: &[&str] = &[
    "9f8827793ef34641b2fb195d4d41151c",
    "e769aa130647d2354c40ea6a439bfc08",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("Program paths"))]
pub struct ProgramPathConfig {
    /// Path to the yt-dlp executable.
    ///
    /// If not provided, yt-dlp will be searched for in $PATH
    #[arg(long, default_value = None, env = "MEDIA_GRABBER_YT_DLP", value_hint = ValueHint::FilePath, value_parser = validate_valid_path())]
    #[validate(custom(function = "valid_path"), required)]
    yt_dlp_path: Option<PathBuf>,
}
impl ProgramPathConfig {
    #[must_use]
    pub fn yt_dlp_path(&self) -> Option<&Path> {
        self.yt_dlp_path.as_deref()
    }

    #[must_use]
    pub fn resolve_paths(mut self) -> Self {
        self.yt_dlp_path = self
            .yt_dlp_path
            .or_else(|| which::which("yt-dlp").ok());

        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("External endpoints/APIs"))]
pub struct EndpointConfig {
    /// The base URL used for the Instagram API and embed page requests.
    #[arg(long, default_value = DEFAULT_INSTAGRAM_BASE_URL, env = "MEDIA_GRABBER_ENDPOINT_INSTAGRAM", value_hint = ValueHint::Url, value_parser = validate_absolute_url())]
    #[validate(custom(function = "absolute_url"))]
    pub instagram_base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("Extraction options"))]
pub struct ExtractorConfig {
    /// How long a single yt-dlp invocation may run before it is killed.
    #[arg(long, default_value = "60s", env = "MEDIA_GRABBER_YT_DLP_TIMEOUT", value_parser = parse_timeframe)]
    #[validate(custom(function = "non_zero_timeframe"))]
    pub yt_dlp_timeout: Timeframe,

    /// Timeout for each HTTP request made while scraping.
    #[arg(long, default_value = "10s", env = "MEDIA_GRABBER_HTTP_TIMEOUT", value_parser = parse_timeframe)]
    #[validate(custom(function = "non_zero_timeframe"))]
    pub http_timeout: Timeframe,

    /// Upper bound for a single extraction strategy, including all of its requests.
    #[arg(long, default_value = "90s", env = "MEDIA_GRABBER_ATTEMPT_TIMEOUT", value_parser = parse_timeframe)]
    #[validate(custom(function = "non_zero_timeframe"))]
    pub attempt_timeout: Timeframe,

    /// Value sent as the `X-IG-App-ID` header to the Instagram API.
    #[arg(long, default_value = DEFAULT_INSTAGRAM_APP_ID, env = "MEDIA_GRABBER_INSTAGRAM_APP_ID")]
    #[validate(length(min = 1))]
    pub instagram_app_id: String,

    /// Instagram GraphQL query hashes, tried in order.
    ///
    /// These are undocumented and expire without notice.
    #[arg(
        long = "instagram-query-hash",
        env = "MEDIA_GRABBER_INSTAGRAM_QUERY_HASHES",
        value_delimiter = ',',
        default_values = DEFAULT_INSTAGRAM_QUERY_HASHES,
    )]
    #[validate(length(min = 1))]
    pub instagram_query_hashes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("Rate limiting"))]
pub struct RateLimitConfig {
    /// Minimum time between two accepted requests from the same client.
    #[arg(long = "rate-limit-window", default_value = "30s", env = "MEDIA_GRABBER_RATE_LIMIT_WINDOW", value_parser = parse_timeframe)]
    #[validate(custom(function = "non_zero_timeframe"))]
    pub window: Timeframe,

    /// How often stale rate limit entries are evicted.
    #[arg(long = "rate-limit-sweep-interval", default_value = "5min", env = "MEDIA_GRABBER_RATE_LIMIT_SWEEP_INTERVAL", value_parser = parse_timeframe)]
    #[validate(custom(function = "non_zero_timeframe"))]
    pub sweep_interval: Timeframe,
}

#[derive(Debug, Clone, Serialize, Deserialize, ValueEnum)]
pub enum DumpConfigType {
    Json,
    Toml,
}
#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[allow(clippy::option_option)]
#[clap(next_help_heading = Some("Run options"))]
pub struct RunConfig {
    /// Dump the config to stdout
    #[arg(long, value_enum, default_value = None)]
    pub dump_config: Option<Option<DumpConfigType>>,

    /// Dump shell completions to stdout
    #[arg(long, default_value = None, value_name = "SHELL", value_parser = hacky_dump_completions())]
    #[serde(skip)]
    pub dump_completions: Option<Shell>,
}

#[must_use]
pub fn validate_valid_path() -> impl clap::builder::TypedValueParser {
    move |s: &str| {
        let path = Path::new(s);
        if !path.exists() {
            return Err("File does not exist");
        }

        Ok(path.to_path_buf())
    }
}

pub fn valid_path(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::new("File does not exist"));
    }

    if !path.is_file() {
        return Err(ValidationError::new("Path is not a valid file"));
    }

    Ok(())
}

#[must_use]
pub fn validate_absolute_url() -> impl clap::builder::TypedValueParser {
    move |s: &str| {
        let parsed = match Url::parse(s) {
            Ok(parsed) => parsed,
            Err(e) => return Err(format!("URL must be absolute: {e}")),
        };

        if parsed.cannot_be_a_base() {
            return Err("URL must be absolute".to_string());
        }

        Ok(s.trim_end_matches('/').to_string())
    }
}

pub fn absolute_url<'a, T>(url: T) -> Result<(), ValidationError>
where
    T: Into<Cow<'a, str>>,
{
    let parsed =
        Url::parse(url.into().as_ref()).map_err(|_| ValidationError::new("Invalid URL"))?;

    if parsed.cannot_be_a_base() {
        return Err(ValidationError::new("URL must be absolute"));
    }

    Ok(())
}

pub fn non_zero_timeframe(timeframe: &Timeframe) -> Result<(), ValidationError> {
    if timeframe.duration().is_zero() {
        return Err(ValidationError::new("Duration must be greater than zero"));
    }

    Ok(())
}

#[must_use]
pub fn hacky_dump_completions() -> impl clap::builder::TypedValueParser {
    move |s: &str| {
        let parsed = Shell::from_str(s, true);

        if let Ok(shell) = &parsed {
            clap_complete::generate(
                *shell,
                &mut CliArgs::command(),
                crate::APPLICATION_NAME,
                &mut std::io::stdout(),
            );
            std::process::exit(0);
        }

        parsed
            .map(|_| ())
            .map_err(|_| ValidationError::new("Invalid shell"))
    }
}
