//! One-shot notices carried across a redirect in the `flash` cookie.
//!
//! The cookie jar percent-encodes values on the way out and decodes them on the way in.

use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "flash";

/// Queues `message` for the next rendered page.
pub fn set(jar: CookieJar, message: &str) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, message.to_string()))
        .path("/")
        .http_only(true);
    jar.add(cookie)
}

/// Removes the pending notice, if any, and returns it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let Some(message) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };

    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), Some(message))
}
