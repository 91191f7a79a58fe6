//! `reqwest` transport posting XML to the gateway endpoint.

use super::Transport;
use crate::config::GatewayConfig;
use crate::errors::{RealexError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

/// HTTP transport for the XML API.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Creates a transport for the configured endpoint and timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use realex_rs::config::GatewayConfig;
    /// use realex_rs::transport::HttpTransport;
    ///
    /// let config = GatewayConfig::new("myMerchantId", "secret");
    /// let transport = HttpTransport::new(&config).unwrap();
    /// assert_eq!(transport.endpoint().host_str(), Some("api.sandbox.realexpayments.com"));
    /// ```
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RealexError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, config.parsed_service_url()?))
    }

    /// Uses a preconfigured `reqwest` client.
    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Endpoint requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: String) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/xml; charset=UTF-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "gateway returned HTTP error status");
            return Err(RealexError::Transport(format!(
                "Unexpected HTTP status code [{}]",
                status
            )));
        }

        Ok(response.text().await?)
    }
}
