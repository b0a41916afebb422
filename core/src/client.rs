//! Tracking request builder and response consumer.
//!
//! # Design
//! `TrackingClient` owns the configuration and the identity tokens. Each
//! tracking operation is a `build_*` method that produces an `HttpRequest`;
//! `absorb_response` consumes the matching `HttpResponse` and updates the
//! tokens. The caller (or `Tracker`) executes the round-trip in between, so
//! this type stays deterministic and free of I/O.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::TrackerConfig;
use crate::error::TrackingError;
use crate::format::{self, TagAction};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, TRACKING_PATH};
use crate::identity::IdentityTokens;

/// Query parameters of one tracking request.
pub type Params = BTreeMap<String, String>;

/// Synchronous core of the tracking client.
#[derive(Debug, Clone)]
pub struct TrackingClient {
    config: TrackerConfig,
    host: String,
    label: String,
    identity: IdentityTokens,
}

impl TrackingClient {
    pub fn new(config: TrackerConfig) -> Self {
        let host = format::resolve_host(&config.base_url);
        let label = format::app_label(config.app_name.as_deref(), config.app_version.as_deref());
        Self {
            config,
            host,
            label,
            identity: IdentityTokens::default(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The normalized host every request is sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn identity(&self) -> &IdentityTokens {
        &self.identity
    }

    /// Build the GET request for `params`.
    ///
    /// Injects `userid` and `page_referrer` from the configuration, sets
    /// `Accept-Language: de`, and attaches the identity cookies once the
    /// contact token is known.
    pub fn build_request(&self, mut params: Params) -> Result<HttpRequest, TrackingError> {
        if self.host.is_empty() {
            return Err(TrackingError::InvalidEndpoint(self.config.base_url.clone()));
        }
        if let Some(user_id) = &self.config.user_id {
            params.insert("userid".to_string(), user_id.clone());
        }
        if let Some(bundle) = &self.config.app_bundle_name {
            params.insert("page_referrer".to_string(), bundle.clone());
        }

        let mut headers = vec![("Accept-Language".to_string(), "de".to_string())];
        if self.config.close_connection {
            headers.push(("Connection".to_string(), "close".to_string()));
        }

        let request = HttpRequest {
            method: HttpMethod::Get,
            scheme: self.config.scheme,
            host: self.host.clone(),
            path: TRACKING_PATH.to_string(),
            query: params,
            headers,
            cookies: self.identity.cookies(),
        };
        let identified = !request.cookies.is_empty();
        debug!(url = %request.url(), identified, "built tracking request");
        Ok(request)
    }

    /// Update the identity tokens from a response's cookies.
    ///
    /// The status code is not inspected. Returns whether any token changed.
    pub fn absorb_response(&mut self, response: &HttpResponse) -> bool {
        let cookies = response.set_cookies();
        let changed = self
            .identity
            .absorb(cookies.iter().map(|(name, value)| (name.as_str(), value.as_str())));
        if changed {
            debug!(
                status = response.status,
                contact = self.identity.contact.value(),
                "identity tokens updated"
            );
        }
        changed
    }

    pub fn build_app_start(&self) -> Result<HttpRequest, TrackingError> {
        self.build_request(params([
            ("page_url", "app_started".to_string()),
            ("page_title", format::app_start_title(&self.label)),
        ]))
    }

    pub fn build_screen(
        &self,
        path: &str,
        screen_name: Option<&str>,
    ) -> Result<HttpRequest, TrackingError> {
        require("path", path)?;
        self.build_request(params([
            ("page_url", path.to_string()),
            ("page_title", format::screen_title(&self.label, screen_name)),
        ]))
    }

    pub fn build_event(
        &self,
        key: &str,
        name: &str,
        path: &str,
        screen_name: Option<&str>,
    ) -> Result<HttpRequest, TrackingError> {
        require("key", key)?;
        require("path", path)?;
        self.build_request(params([
            ("page_url", format::event_url(key, path)),
            ("page_title", format::event_title(&self.label, name, screen_name)),
        ]))
    }

    pub fn build_add_tags<I, S>(&self, tags: I) -> Result<HttpRequest, TrackingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build_tags(TagAction::Add, tags)
    }

    pub fn build_remove_tags<I, S>(&self, tags: I) -> Result<HttpRequest, TrackingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build_tags(TagAction::Remove, tags)
    }

    fn build_tags<I, S>(&self, action: TagAction, tags: I) -> Result<HttpRequest, TrackingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: BTreeSet<String> = tags.into_iter().map(Into::into).collect();
        let joined = format::join_tags(&tags, action);
        self.build_request(params([
            ("page_title", format::tags_title(&self.label, action, &joined)),
            ("tags", joined),
        ]))
    }
}

fn params<const N: usize>(pairs: [(&str, String); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn require(name: &'static str, value: &str) -> Result<(), TrackingError> {
    if value.is_empty() {
        return Err(TrackingError::InvalidArgument { name });
    }
    Ok(())
}
