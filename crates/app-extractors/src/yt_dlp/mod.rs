use std::{
    fmt::Debug,
    path::PathBuf,
    process::Stdio,
    time::Duration,
};

use tracing::{debug, trace};
use url::Url;

pub use self::info::{VideoFormat, VideoInfo};

mod info;
#[cfg(test)]
pub(crate) mod stub;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum InfoError {
    #[error("failed to run yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("yt-dlp did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("yt-dlp exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("failed to parse yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Options forwarded to the extraction library for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoOptions {
    /// yt-dlp format selector, e.g. `best`
    pub format: Option<String>,
    pub user_agent: Option<String>,
}
impl InfoOptions {
    #[must_use]
    pub fn with_format<T: Into<String>>(mut self, format: T) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_user_agent<T: Into<String>>(mut self, user_agent: T) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Given a URL, returns raw format and metadata records for it, or fails.
#[async_trait::async_trait]
pub trait InfoExtractor: Debug + Send + Sync {
    async fn extract_info(&self, url: &Url, options: &InfoOptions) -> Result<VideoInfo, InfoError>;
}

/// Runs the `yt-dlp` binary in metadata-only mode.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    timeout: Duration,
}
impl YtDlp {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(binary: P) -> Self {
        Self {
            binary: binary.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, url: &Url, options: &InfoOptions) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.arg("--ignore-config")
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--no-warnings")
            .arg("--no-playlist")
            .args(["--socket-timeout", "30"]);

        if let Some(format) = &options.format {
            cmd.args(["--format", format.as_str()]);
        }

        if let Some(user_agent) = &options.user_agent {
            cmd.args(["--user-agent", user_agent.as_str()]);
        }

        cmd.arg("--")
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        cmd
    }
}

#[async_trait::async_trait]
impl InfoExtractor for YtDlp {
    #[tracing::instrument(skip(self, url, options), fields(url = %url))]
    async fn extract_info(&self, url: &Url, options: &InfoOptions) -> Result<VideoInfo, InfoError> {
        let mut cmd = self.command(url, options);
        debug!(?cmd, "Running yt-dlp");

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| InfoError::TimedOut(self.timeout))?
            .map_err(InfoError::Spawn)?;

        trace!(status = ?output.status, "yt-dlp finished");

        if !output.status.success() {
            return Err(InfoError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_dump_json(&output.stdout)
    }
}

/// yt-dlp prints one JSON document per line; only the first one is used.
fn parse_dump_json(stdout: &[u8]) -> Result<VideoInfo, InfoError> {
    let stdout = String::from_utf8_lossy(stdout);
    let first = stdout
        .lines()
        .map(str::trim)
        .find(|x| !x.is_empty())
        .unwrap_or_default();

    serde_json::from_str(first).map_err(InfoError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_json_line() {
        let stdout = b"\n{\"title\": \"one\"}\n{\"title\": \"two\"}\n";

        let info = parse_dump_json(stdout).expect("valid output");

        assert_eq!(info.title.as_deref(), Some("one"));
    }

    #[test]
    fn empty_output_is_a_parse_error() {
        assert!(matches!(parse_dump_json(b""), Err(InfoError::Parse(_))));
    }

    #[test]
    fn builds_metadata_only_command() {
        let ytdlp = YtDlp::new("/usr/bin/yt-dlp");
        let url = Url::parse("https://youtu.be/abc").expect("valid url");
        let options = InfoOptions::default()
            .with_format("best")
            .with_user_agent("agent");

        let cmd = ytdlp.command(&url, &options);
        let args = cmd
            .as_std()
            .get_args()
            .map(|x| x.to_string_lossy().to_string())
            .collect::<Vec<_>>();

        assert!(args.contains(&"--dump-json".to_string()));
        assert!(args.contains(&"--no-download".to_string()));
        assert!(args.windows(2).any(|x| x == ["--format", "best"]));
        assert!(args.windows(2).any(|x| x == ["--user-agent", "agent"]));
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/abc"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let ytdlp = YtDlp::new("/nonexistent/yt-dlp-binary");
        let url = Url::parse("https://youtu.be/abc").expect("valid url");

        let res = ytdlp.extract_info(&url, &InfoOptions::default()).await;

        assert!(matches!(res, Err(InfoError::Spawn(_))));
    }
}
