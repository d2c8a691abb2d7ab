use parking_lot::Mutex;
use url::Url;

use super::{InfoError, InfoExtractor, InfoOptions, VideoInfo};

/// Hands out one canned answer and remembers what it was asked.
#[derive(Debug)]
pub struct StubInfo {
    answer: Mutex<Option<Result<VideoInfo, InfoError>>>,
    calls: Mutex<Vec<(Url, InfoOptions)>>,
}
impl StubInfo {
    pub fn ok(info: VideoInfo) -> Self {
        Self::answering(Ok(info))
    }

    pub fn failing(status: &str, stderr: &str) -> Self {
        Self::answering(Err(InfoError::Failed {
            status: status.to_string(),
            stderr: stderr.to_string(),
        }))
    }

    fn answering(answer: Result<VideoInfo, InfoError>) -> Self {
        Self {
            answer: Mutex::new(Some(answer)),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> Vec<(Url, InfoOptions)> {
        self.calls.lock().clone()
    }
}

#[async_trait::async_trait]
impl InfoExtractor for StubInfo {
    async fn extract_info(&self, url: &Url, options: &InfoOptions) -> Result<VideoInfo, InfoError> {
        self.calls.lock().push((url.clone(), options.clone()));

        self.answer.lock().take().unwrap_or_else(|| {
            Err(InfoError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "asked twice".to_string(),
            })
        })
    }
}
