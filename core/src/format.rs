//! Pure string helpers for hosts, labels and event titles.
//!
//! # Design
//! Every string that ends up in a tracking request's `page_url` or
//! `page_title` is produced here, so the wire format can be tested without
//! building a client.

use std::collections::BTreeSet;

/// Normalize a base endpoint into the bare host used for every request.
///
/// Strips a leading `http://` or `https://` (case-insensitive), removes every
/// `/`, lowercases and trims. Applying it to its own output is a no-op.
pub fn resolve_host(endpoint: &str) -> String {
    let without_scheme = strip_prefix_ignore_case(endpoint, "https://")
        .or_else(|| strip_prefix_ignore_case(endpoint, "http://"))
        .unwrap_or(endpoint);
    without_scheme
        .replace('/', "")
        .to_lowercase()
        .trim()
        .to_string()
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}

/// The display label embedded in every event title.
///
/// Note the trailing separators: a versioned label ends in `": "` and a bare
/// app name ends in a space, so titles built on top of it read
/// `"Shop (1.2):  Started"` (two spaces) rather than being re-spaced here.
pub fn app_label(app_name: Option<&str>, app_version: Option<&str>) -> String {
    match (app_name, app_version) {
        (None, None) => "App".to_string(),
        (None, Some(version)) => format!("App ({version}): "),
        (Some(name), None) => format!("{name} "),
        (Some(name), Some(version)) => format!("{name} ({version}): "),
    }
}

pub fn app_start_title(label: &str) -> String {
    format!("{label} Started")
}

pub fn screen_title(label: &str, screen_name: Option<&str>) -> String {
    match screen_name {
        Some(name) => format!("{label} Navigation: {name}"),
        None => format!("{label} Navigation"),
    }
}

pub fn event_title(label: &str, event_name: &str, screen_name: Option<&str>) -> String {
    match screen_name {
        Some(screen) => format!("{label} Event: {screen} / {event_name}"),
        None => format!("{label} Event: {event_name}"),
    }
}

/// `page_url` for a custom event: `screen_<path>_event_<key>`.
pub fn event_url(key: &str, path: &str) -> String {
    format!("screen_{path}_event_{key}")
}

/// Whether a tag request adds or removes the tags on the contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAction {
    Add,
    Remove,
}

impl TagAction {
    fn verb(self) -> &'static str {
        match self {
            TagAction::Add => "Added",
            TagAction::Remove => "Removed",
        }
    }

    /// Removal is signalled to the server by a leading `-` on each tag.
    fn mark(self, tag: &str) -> String {
        match self {
            TagAction::Add => tag.to_string(),
            TagAction::Remove => format!("-{tag}"),
        }
    }
}

/// Comma-join a tag set, marking each member for `action`.
///
/// Tags are joined in sorted order so the same set always produces the same
/// request.
pub fn join_tags(tags: &BTreeSet<String>, action: TagAction) -> String {
    tags.iter()
        .map(|tag| action.mark(tag))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn tags_title(label: &str, action: TagAction, joined: &str) -> String {
    format!("{label} {} Tags: {joined}", action.verb())
}
