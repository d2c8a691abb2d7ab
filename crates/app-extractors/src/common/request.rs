use std::time::Duration;

pub use reqwest::{Client as RequestClient, ClientBuilder as RequestClientBuilder};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, \
                              like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const MOBILE_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Client;

impl Client {
    pub fn base(timeout: Duration) -> Result<RequestClient, String> {
        Self::builder(timeout)
            .build()
            .map_err(|e| format!("Failed to create client: {:?}", e))
    }

    pub fn builder(timeout: Duration) -> RequestClientBuilder {
        RequestClient::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(timeout)
    }
}
