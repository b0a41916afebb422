//! Session-identity tokens echoed to the server as cookies.
//!
//! # Design
//! The three tokens are owned by the client and never shared. They start
//! empty and are only ever filled from `Set-Cookie` values on a response.
//! Outgoing requests carry them once the contact token is known.

/// Cookie name of the contact token.
pub const CONTACT_COOKIE: &str = "mtc_id";
/// Cookie name of the session token.
pub const SESSION_COOKIE: &str = "mtc_sid";
/// Cookie name the device token is sent under.
pub const DEVICE_COOKIE: &str = "mtc_device_id";
/// Substring that identifies the device id in response cookies.
///
/// Mautic issues the device id as `mautic_device_id`, not under the name the
/// client echoes it back with (`DEVICE_COOKIE`). Both names are kept as the
/// server exposes them.
pub const DEVICE_RESPONSE_MATCH: &str = "mautic_device_id";

/// A single cookie-like identity value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityToken {
    name: &'static str,
    value: String,
    http_only: bool,
}

impl IdentityToken {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            value: String::new(),
            http_only: true,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// `false` once the value has been set from a response, so the token
    /// stays readable by the client.
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Set the value and clear `http_only`. Returns whether either changed.
    fn update(&mut self, value: &str) -> bool {
        let changed = self.http_only || self.value != value;
        self.http_only = false;
        self.value = value.to_string();
        changed
    }

    fn as_cookie(&self) -> (String, String) {
        (self.name.to_string(), self.value.clone())
    }
}

/// Contact, session and device tokens of one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityTokens {
    pub contact: IdentityToken,
    pub session: IdentityToken,
    pub device: IdentityToken,
}

impl Default for IdentityTokens {
    fn default() -> Self {
        Self {
            contact: IdentityToken::new(CONTACT_COOKIE),
            session: IdentityToken::new(SESSION_COOKIE),
            device: IdentityToken::new(DEVICE_COOKIE),
        }
    }
}

impl IdentityTokens {
    /// Cookies are propagated only after the server has issued a contact id.
    pub fn is_established(&self) -> bool {
        !self.contact.is_empty()
    }

    /// The cookies to attach to the next request: all three tokens once the
    /// contact is known, nothing before.
    pub fn cookies(&self) -> Vec<(String, String)> {
        if !self.is_established() {
            return Vec::new();
        }
        vec![
            self.contact.as_cookie(),
            self.session.as_cookie(),
            self.device.as_cookie(),
        ]
    }

    /// Take over identity values from response cookies, matching by
    /// substring of the cookie name. Returns whether any token changed.
    pub fn absorb<'a, I>(&mut self, cookies: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut changed = false;
        for (name, value) in cookies {
            if name.contains(SESSION_COOKIE) {
                changed |= self.session.update(value);
            }
            if name.contains(DEVICE_RESPONSE_MATCH) {
                changed |= self.device.update(value);
            }
            if name.contains(CONTACT_COOKIE) {
                changed |= self.contact.update(value);
            }
        }
        changed
    }
}
