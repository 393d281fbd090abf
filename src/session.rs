//! Vendor session cookies, keyed by client session.
//!
//! The vendor issues a `ccce.key` cookie on the first classification call
//! and expects it back on every follow-up. Cookies are held per client key
//! and expire after a fixed lifetime measured with the injected [`Clock`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::ports::Clock;

/// Name of the vendor's session cookie.
pub const SESSION_COOKIE: &str = "ccce.key";

#[derive(Debug, Clone)]
struct StoredCookie {
    cookie: String,
    expires_at: DateTime<Utc>,
}

/// In-memory cookie jar with per-entry expiry.
pub struct VendorSessionStore {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, StoredCookie>>,
}

impl VendorSessionStore {
    /// Creates an empty store whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { ttl, clock, entries: Mutex::new(HashMap::new()) }
    }

    /// Cookie stored for `client`, or `None` if absent or expired.
    ///
    /// Expired entries are evicted.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn get(&self, client: &str) -> Option<String> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("session store lock poisoned");
        match entries.get(client) {
            Some(stored) if stored.expires_at > now => Some(stored.cookie.clone()),
            Some(_) => {
                entries.remove(client);
                debug!(client, "vendor session cookie expired");
                None
            }
            None => None,
        }
    }

    /// Stores `cookie` for `client`, replacing any previous entry.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn put(&self, client: &str, cookie: impl Into<String>) {
        let expires_at = self.clock.now() + self.ttl;
        let stored = StoredCookie { cookie: cookie.into(), expires_at };
        self.entries.lock().expect("session store lock poisoned").insert(client.to_string(), stored);
        debug!(client, %expires_at, "vendor session cookie stored");
    }

    /// Forgets the cookie for `client`.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn clear(&self, client: &str) {
        self.entries.lock().expect("session store lock poisoned").remove(client);
    }
}

/// Finds the vendor session cookie among `Set-Cookie` header values.
///
/// Returns `ccce.key=<value>` with attributes after the first `;` dropped.
pub fn extract_session_cookie<'a>(headers: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE}=");
    headers.into_iter().find_map(|header| {
        header.split(';').next().map(str::trim).filter(|pair| pair.starts_with(&prefix)).map(
            str::to_string,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct ManualClock(StdMutex<DateTime<Utc>>);

    impl ManualClock {
        fn at(rfc3339: &str) -> Arc<Self> {
            let start = DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc);
            Arc::new(Self(StdMutex::new(start)))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    #[test]
    fn stored_cookie_is_returned_until_it_expires() {
        let clock = ManualClock::at("2024-03-01T12:00:00Z");
        let store = VendorSessionStore::new(Duration::minutes(25), clock.clone());

        store.put("client-a", "ccce.key=abc");
        assert_eq!(store.get("client-a").as_deref(), Some("ccce.key=abc"));

        clock.advance(Duration::minutes(24));
        assert_eq!(store.get("client-a").as_deref(), Some("ccce.key=abc"));

        clock.advance(Duration::minutes(1));
        assert_eq!(store.get("client-a"), None);
    }

    #[test]
    fn clients_are_isolated() {
        let clock = ManualClock::at("2024-03-01T12:00:00Z");
        let store = VendorSessionStore::new(Duration::minutes(25), clock);

        store.put("client-a", "ccce.key=a");
        store.put("client-b", "ccce.key=b");
        store.clear("client-a");

        assert_eq!(store.get("client-a"), None);
        assert_eq!(store.get("client-b").as_deref(), Some("ccce.key=b"));
    }

    #[test]
    fn put_refreshes_expiry() {
        let clock = ManualClock::at("2024-03-01T12:00:00Z");
        let store = VendorSessionStore::new(Duration::minutes(25), clock.clone());

        store.put("c", "ccce.key=old");
        clock.advance(Duration::minutes(20));
        store.put("c", "ccce.key=new");
        clock.advance(Duration::minutes(20));

        assert_eq!(store.get("c").as_deref(), Some("ccce.key=new"));
    }

    #[test]
    fn extracts_vendor_cookie_without_attributes() {
        let headers = ["other=1; Path=/", "ccce.key=s3cr3t; Path=/; HttpOnly"];
        assert_eq!(extract_session_cookie(headers).as_deref(), Some("ccce.key=s3cr3t"));
    }

    #[test]
    fn ignores_unrelated_cookies() {
        assert_eq!(extract_session_cookie(["session=1", "xccce.key=2"]), None);
        assert_eq!(extract_session_cookie(std::iter::empty()), None);
    }
}
