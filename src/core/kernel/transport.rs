use crate::core::config::ConfigError;
use async_trait::async_trait;
use tracing::{instrument, trace};

/// Raw outcome of one HTTP exchange.
///
/// A network-level failure (the request never completed) is represented with
/// `status: None` and the error text in `body`; it is never raised as an
/// error, since by that point a side effect may already have occurred on the
/// remote side.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status, or `None` if the request never completed.
    pub status: Option<u16>,
    /// Response body, or the transport error text when `status` is `None`.
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: body.into(),
        }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: message.into(),
        }
    }
}

/// Transport seam for issuing HTTP requests.
///
/// A body present means POST, absent means GET. Implementations must never
/// error; transport failures are reported through [`RawResponse`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        url: &str,
        body: Option<&str>,
        content_type: Option<&str>,
    ) -> RawResponse;
}

/// `reqwest`-backed transport.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the given User-Agent. Redirects are followed.
    pub fn new(user_agent: &str) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| {
                ConfigError::InvalidConfiguration(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, body), fields(url = %url, post = body.is_some()))]
    async fn send(
        &self,
        url: &str,
        body: Option<&str>,
        content_type: Option<&str>,
    ) -> RawResponse {
        let request = match body {
            Some(entity) => {
                let mut request = self.client.post(url).body(entity.to_string());
                if let Some(ct) = content_type {
                    request = request.header("Content-Type", ct);
                }
                request
            }
            None => self.client.get(url),
        };

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(text) => {
                        trace!(status, "received response");
                        RawResponse::new(status, text)
                    }
                    Err(e) => RawResponse::transport_failure(format!(
                        "Failed to read response body: {}",
                        e
                    )),
                }
            }
            Err(e) => RawResponse::transport_failure(format!("Request failed: {}", e)),
        }
    }
}
