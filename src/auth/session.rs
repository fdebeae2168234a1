//! Session cookie issuing and clearing.
//!
//! The session is a signed JWT in an HTTP-only cookie. Issuing and clearing
//! share one attribute set so browsers treat the clearing cookie as the same
//! cookie and drop it.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{auth::jwt::JwtKeys, config::CookieConfig};

fn base_cookie(cfg: &CookieConfig, value: String) -> Cookie<'static> {
    Cookie::build((cfg.name.clone(), value))
        .path("/")
        .http_only(true)
        .secure(cfg.secure)
        // Browsers drop `SameSite=None` cookies that are not `Secure`.
        .same_site(if cfg.secure { SameSite::None } else { SameSite::Lax })
        .build()
}

/// Signs a token for `user_id` and adds it to `jar`. Fails if signing fails;
/// an unsigned cookie is never produced.
pub fn issue(
    jar: CookieJar,
    keys: &JwtKeys,
    cfg: &CookieConfig,
    user_id: Uuid,
) -> anyhow::Result<CookieJar> {
    let token = keys.sign(user_id)?;
    let mut cookie = base_cookie(cfg, token);
    cookie.set_max_age(keys.ttl);
    Ok(jar.add(cookie))
}

/// Overwrites the session cookie with an empty, already expired one.
pub fn clear(jar: CookieJar, cfg: &CookieConfig) -> CookieJar {
    let mut cookie = base_cookie(cfg, String::new());
    cookie.set_max_age(Duration::ZERO);
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    jar.add(cookie)
}

/// Raw token from the request cookies, if any.
pub fn token<'a>(jar: &'a CookieJar, cfg: &CookieConfig) -> Option<&'a str> {
    jar.get(&cfg.name)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
}
