//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe tracking requests and responses as plain data. The
//! core builds `HttpRequest` values and consumes `HttpResponse` values without
//! touching the network; a `Transport` (or any host code) performs the actual
//! round-trip. Cookies are kept apart from headers on the request so the
//! identity-propagation rule can be asserted directly.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// Fixed resource path of the tracking pixel.
pub const TRACKING_PATH: &str = "mtracking.gif";

/// HTTP method for a request. Tracking only ever issues GETs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// URL scheme used in front of the normalized host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// A tracking request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub scheme: Scheme,
    pub host: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
}

impl HttpRequest {
    /// Full request URL with a form-urlencoded query string.
    pub fn url(&self) -> String {
        let mut url = format!("{}://{}/{}", self.scheme, self.host, self.path);
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Value for a `Cookie` header, or `None` when no cookies are attached.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Only `Set-Cookie` headers are consumed by the client; status and body are
/// kept for hosts that want to log them.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Name/value pairs of every `Set-Cookie` header, attributes dropped.
    pub fn set_cookies(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case("set-cookie"))
            .filter_map(|(_, value)| parse_set_cookie(value))
            .collect()
    }
}

/// `name=value; Path=/; HttpOnly` -> `(name, value)`.
fn parse_set_cookie(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');
    Some((name.to_string(), value.to_string()))
}
