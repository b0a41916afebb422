//! Client for a Mautic-style tracking pixel endpoint.
//!
//! # Overview
//! Sends app-start, screen-view, custom-event and tag signals as GET requests
//! to `<host>/mtracking.gif`, echoing the contact, session and device ids the
//! server hands out so all calls land on the same visitor.
//!
//! # Design
//! - `TrackingClient` builds `HttpRequest` values and absorbs `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - `Tracker` drives a `TrackingClient` over a `Transport`; the bundled
//!   `ReqwestTransport` uses `reqwest`.
//! - Title and URL strings come from the pure helpers in `format`.
//!
//! ```no_run
//! use tracking_core::{Tracker, TrackerConfig};
//!
//! # async fn run() -> Result<(), tracking_core::TrackingError> {
//! let config = TrackerConfig::new("https://mautic.example.com/").with_app_name("Shop");
//! let mut tracker = Tracker::new(config)?;
//! tracker.track_app_start().await?;
//! tracker.track_screen("cart", Some("Cart")).await?;
//! tracker.add_tags(["buyer"]).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod identity;
pub mod tracker;
pub mod transport;

pub use client::{Params, TrackingClient};
pub use config::TrackerConfig;
pub use error::TrackingError;
pub use format::TagAction;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Scheme};
pub use identity::{IdentityToken, IdentityTokens};
pub use tracker::Tracker;
pub use transport::{ReqwestTransport, Transport};
