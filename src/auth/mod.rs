//! Session capability for godw.
//!
//! There is no server-side session table. A request is `Admin` when it
//! names the admin identity as a query key (which also issues a session
//! cookie) or when its session cookie carries that identity. Whoever holds
//! the cookie holds admin capability until it expires.

use std::collections::HashMap;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "username";

/// Session validity window in hours.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Access level of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Capability {
    /// Anyone.
    #[default]
    Guest,
    /// Holder of the admin identity.
    Admin,
}

impl Capability {
    /// Whether destructive operations are allowed.
    pub fn is_admin(self) -> bool {
        self == Capability::Admin
    }
}

/// Capability evaluated for one request, plus the cookie to issue if any.
#[derive(Debug, Clone)]
pub struct Access {
    /// Evaluated capability.
    pub capability: Capability,
    /// Session cookie to set on the response.
    pub cookie: Option<Cookie<'static>>,
}

impl Access {
    /// Add the issued cookie (if any) to a response jar.
    pub fn apply(&self, jar: CookieJar) -> CookieJar {
        match &self.cookie {
            Some(cookie) => jar.add(cookie.clone()),
            None => jar,
        }
    }
}

/// Evaluates request credentials against the configured admin identity.
#[derive(Debug, Clone)]
pub struct AuthGate {
    admin_identity: String,
}

impl AuthGate {
    /// Create a gate for `admin_identity`.
    pub fn new(admin_identity: impl Into<String>) -> Self {
        Self {
            admin_identity: admin_identity.into(),
        }
    }

    /// Evaluate cookies and query parameters of a request.
    pub fn evaluate(&self, cookies: &CookieJar, query: &HashMap<String, String>) -> Access {
        if query.contains_key(&self.admin_identity) {
            return Access {
                capability: Capability::Admin,
                cookie: Some(self.session_cookie()),
            };
        }

        let capability = match cookies.get(SESSION_COOKIE) {
            Some(cookie) if cookie.value() == self.admin_identity => Capability::Admin,
            _ => Capability::Guest,
        };

        Access {
            capability,
            cookie: None,
        }
    }

    /// Build a fresh session cookie for the admin identity.
    pub fn session_cookie(&self) -> Cookie<'static> {
        let ttl = Duration::hours(SESSION_TTL_HOURS);

        Cookie::build((SESSION_COOKIE, self.admin_identity.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(ttl)
            .expires(OffsetDateTime::now_utc() + ttl)
            .build()
    }
}
