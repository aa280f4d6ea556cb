//! Transport implementations

use crate::config::EngineConfig;
use crate::error::Result;
use crate::request::RequestDescriptor;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

/// Raw result of one HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Body bytes, unparsed
    pub body: Bytes,
}

impl RawResponse {
    /// Create a response from a status and body
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, lossily
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs a single HTTP exchange for a request descriptor.
///
/// An `Err` means the exchange never produced a status code (connection or
/// timeout failure); the executor treats that as retryable, equivalent to
/// a 500. Status-code handling is entirely the executor's business — a
/// transport returns whatever the wire said.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request, returning the raw status and body
    async fn perform(&self, request: &RequestDescriptor) -> Result<RawResponse>;
}

/// Production transport backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport from engine config (timeout, user agent)
    pub fn new(config: &EngineConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: &RequestDescriptor) -> Result<RawResponse> {
        let mut req = self.client.get(request.target().clone());
        for (name, value) in request.header_map() {
            req = req.header(name.as_str(), value.as_str());
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(RawResponse { status, body })
    }
}
