use reqwest::{header, Client, StatusCode};
use tracing::info;

use crate::error::FetchError;

const USER_AGENT: &str = "Mozilla/5.0";

pub struct Fetcher {
    client: Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Fetcher { client }
    }

    /// GET `url` and return the body. Anything but 200 is an error.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        info!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
