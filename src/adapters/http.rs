use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

/// One HTTP session per run, shared by the lister and the pipeline.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// `timeout` bounds connecting and each idle gap between reads, not the
    /// whole transfer, so large bodies that keep flowing are never cut off.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.request_timeout(), config.user_agent())
    }

    /// GET that turns non-2xx answers into `HttpStatusError`.
    pub async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_get_maps_error_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let client = HttpClient::new(Duration::from_secs(5), "test-agent").unwrap();
        let err = client.get(&server.url("/missing")).await.unwrap_err();

        mock.assert();
        assert!(matches!(err, EtlError::HttpStatusError { status: 404, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_get_sends_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ok")
                .header("user-agent", "test-agent");
            then.status(200).body("fine");
        });

        let client = HttpClient::new(Duration::from_secs(5), "test-agent").unwrap();
        let response = client.get(&server.url("/ok")).await.unwrap();

        mock.assert();
        assert_eq!(response.text().await.unwrap(), "fine");
    }

    #[tokio::test]
    async fn test_timeout_is_a_retryable_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .body("late")
                .delay(Duration::from_millis(500));
        });

        let client = HttpClient::new(Duration::from_millis(50), "test-agent").unwrap();
        let err = client.get(&server.url("/slow")).await.unwrap_err();

        assert!(matches!(err, EtlError::ApiError(ref e) if e.is_timeout()));
        assert!(err.is_retryable());
    }
}
