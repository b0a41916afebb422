//! Asynchronous tracking surface.
//!
//! # Design
//! `Tracker` pairs a `TrackingClient` with a `Transport` and runs the full
//! build -> execute -> absorb cycle for each operation. Every operation takes
//! `&mut self`: identity tokens written by one response must be visible to
//! the next request, so calls on one tracker are serialized by the borrow
//! checker. Sharing a tracker between tasks means wrapping it in a
//! `tokio::sync::Mutex`, which keeps that ordering.
//!
//! There is no retry and no cancellation handling beyond dropping the
//! future. A failed call leaves the tokens untouched.

use crate::client::TrackingClient;
use crate::config::TrackerConfig;
use crate::error::TrackingError;
use crate::http::HttpRequest;
use crate::identity::IdentityTokens;
use crate::transport::{ReqwestTransport, Transport};

#[derive(Debug)]
pub struct Tracker<T = ReqwestTransport> {
    client: TrackingClient,
    transport: T,
}

impl Tracker<ReqwestTransport> {
    /// A tracker using the bundled `reqwest` transport.
    pub fn new(config: TrackerConfig) -> Result<Self, TrackingError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Tracker<T> {
    pub fn with_transport(config: TrackerConfig, transport: T) -> Self {
        Self {
            client: TrackingClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &TrackingClient {
        &self.client
    }

    pub fn identity(&self) -> &IdentityTokens {
        self.client.identity()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Signal that the app has started.
    pub async fn track_app_start(&mut self) -> Result<(), TrackingError> {
        let request = self.client.build_app_start()?;
        self.send(request).await
    }

    /// Record a screen view at `path`, optionally with a display name.
    pub async fn track_screen(
        &mut self,
        path: &str,
        screen_name: Option<&str>,
    ) -> Result<(), TrackingError> {
        let request = self.client.build_screen(path, screen_name)?;
        self.send(request).await
    }

    /// Record a custom event `key` raised on the screen at `path`.
    pub async fn track_event(
        &mut self,
        key: &str,
        name: &str,
        path: &str,
        screen_name: Option<&str>,
    ) -> Result<(), TrackingError> {
        let request = self.client.build_event(key, name, path, screen_name)?;
        self.send(request).await
    }

    pub async fn add_tags<I, S>(&mut self, tags: I) -> Result<(), TrackingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = self.client.build_add_tags(tags)?;
        self.send(request).await
    }

    pub async fn remove_tags<I, S>(&mut self, tags: I) -> Result<(), TrackingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = self.client.build_remove_tags(tags)?;
        self.send(request).await
    }

    async fn send(&mut self, request: HttpRequest) -> Result<(), TrackingError> {
        let response = self.transport.execute(request).await?;
        self.client.absorb_response(&response);
        Ok(())
    }
}
