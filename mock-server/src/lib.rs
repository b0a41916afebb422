use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{
        header::{ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// A transparent 1x1 GIF.
pub const TRACKING_PIXEL: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

/// One request received on the tracking pixel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub query: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    pub accept_language: Option<String>,
    pub connection: Option<String>,
}

pub type Hits = Arc<RwLock<Vec<Hit>>>;

pub fn app() -> Router {
    router(Hits::default())
}

/// Router over caller-owned hit storage, so tests can inspect it directly.
pub fn router(hits: Hits) -> Router {
    Router::new()
        .route("/mtracking.gif", get(track))
        .route("/hits", get(list_hits).delete(clear_hits))
        .with_state(hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn track(
    State(hits): State<Hits>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let cookies = request_cookies(&headers);
    let hit = Hit {
        query,
        accept_language: header_string(&headers, ACCEPT_LANGUAGE.as_str()),
        connection: header_string(&headers, CONNECTION.as_str()),
        cookies,
    };
    info!(
        page_url = hit.query.get("page_url").map(String::as_str).unwrap_or(""),
        contact = hit.cookies.get("mtc_id").map(String::as_str).unwrap_or(""),
        "tracking hit"
    );

    let issued = issue_identity(&hit.cookies);
    hits.write().await.push(hit);

    let mut response_headers = HeaderMap::new();
    response_headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/gif"));
    for (name, value) in issued {
        let cookie = format!("{name}={value}; path=/; HttpOnly");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response_headers.append(SET_COOKIE, value);
        }
    }
    (response_headers, TRACKING_PIXEL).into_response()
}

async fn list_hits(State(hits): State<Hits>) -> Json<Vec<Hit>> {
    Json(hits.read().await.clone())
}

async fn clear_hits(State(hits): State<Hits>) -> StatusCode {
    hits.write().await.clear();
    StatusCode::NO_CONTENT
}

/// Identity cookies for the response: a known contact keeps its ids, an
/// unknown visitor gets fresh ones. The device id goes out under
/// `mautic_device_id` like a real Mautic instance.
pub fn issue_identity(cookies: &BTreeMap<String, String>) -> [(&'static str, String); 3] {
    let known = |name: &str| cookies.get(name).filter(|v| !v.is_empty()).cloned();
    let fresh = || Uuid::new_v4().simple().to_string();
    match known("mtc_id") {
        Some(contact) => [
            ("mtc_id", contact),
            ("mtc_sid", known("mtc_sid").unwrap_or_else(fresh)),
            ("mautic_device_id", known("mtc_device_id").unwrap_or_else(fresh)),
        ],
        None => [
            ("mtc_id", fresh()),
            ("mtc_sid", fresh()),
            ("mautic_device_id", fresh()),
        ],
    }
}

/// Every `name=value` pair across all `Cookie` headers.
pub fn request_cookies(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
