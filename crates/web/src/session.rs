//! Cookie-carried session identity.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use exam_core::model::SessionKey;

pub const SESSION_COOKIE: &str = "exam_session";

/// Key carried by the request's session cookie, or a freshly issued one.
///
/// A missing or unparsable cookie yields a new key and a jar that sets it.
#[must_use]
pub fn session_key(jar: CookieJar) -> (CookieJar, SessionKey) {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<SessionKey>().ok());
    if let Some(key) = existing {
        return (jar, key);
    }

    let key = SessionKey::generate();
    let cookie = Cookie::build((SESSION_COOKIE, key.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), key)
}
