use std::env;

use tracing::Level;
pub use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "MEDIA_GRABBER_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "MEDIA_GRABBER_LOG_FORMAT";

pub const COMPONENT_LEVELS: &[(&str, Level)] = &[
    ("media_grabber", Level::INFO),
    ("request", Level::INFO),
    ("app_config", Level::INFO),
    ("app_extractors", Level::INFO),
    ("app_logger", Level::INFO),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
impl LogFormat {
    fn from_env() -> Self {
        match env::var(LOG_FORMAT_ENV) {
            Ok(x) if x.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Initialize the logger
///
/// # Panics
/// Panics if a global subscriber was already set
pub fn init() {
    init_with(COMPONENT_LEVELS.to_vec());
}

pub fn init_with_app_level(level: Level) {
    let levels = COMPONENT_LEVELS
        .iter()
        .map(|(k, _v)| (k.to_owned(), level))
        .collect::<Vec<_>>();

    init_with(levels);
}

pub fn init_with<T>(levels: T)
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    let filter = build_filter(levels, env::var(LOG_LEVEL_ENV).unwrap_or_default().as_str());

    let registry = tracing_subscriber::registry().with(filter);

    let res = match LogFormat::from_env() {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true))
            .try_init(),
    };

    res.expect("setting default subscriber failed");
}

fn build_filter<T>(levels: T, extra_directives: &str) -> EnvFilter
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    let default_levels = levels
        .into_iter()
        .map(|(k, v)| {
            if k.is_empty() {
                v.to_string()
            } else {
                format!("{}={}", k, v)
            }
        })
        .collect::<Vec<_>>()
        .join(",");

    let mut filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .parse_lossy(default_levels);

    let directives = extra_directives
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<Directive>() {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("Failed to parse log level directive {s:?}: {e:?}");
                None
            }
        });

    for d in directives {
        filter = filter.add_directive(d);
    }

    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_directives_are_appended() {
        let filter = build_filter(
            [("app_extractors", Level::INFO)],
            "app_extractors=trace, ,request=debug",
        );
        let rendered = filter.to_string().to_lowercase();

        assert!(rendered.contains("app_extractors=trace"), "{rendered}");
        assert!(rendered.contains("request=debug"), "{rendered}");
    }
}
