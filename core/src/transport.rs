//! Executing tracking requests over the network.
//!
//! # Design
//! `Transport` is the seam between the I/O-free core and an HTTP stack.
//! `ReqwestTransport` is the bundled implementation; tests and embedding
//! hosts can supply their own. A transport reports only failures to complete
//! the exchange. Any HTTP status counts as a response.

use std::future::Future;

use crate::config::TrackerConfig;
use crate::error::TrackingError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes an `HttpRequest` and returns the server's `HttpResponse`.
pub trait Transport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TrackingError>> + Send;
}

/// `Transport` backed by a `reqwest::Client` using rustls.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client honoring the configured timeout and connection policy.
    ///
    /// With `close_connection` set, idle connections are not pooled.
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackingError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if config.close_connection {
            builder = builder.pool_max_idle_per_host(0);
        }
        let client = builder.build().map_err(transport_error)?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TrackingError> {
        let mut builder = self.client.get(request.url());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = request.cookie_header() {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

fn transport_error(err: reqwest::Error) -> TrackingError {
    TrackingError::Transport(err.to_string())
}
