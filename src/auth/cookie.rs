use actix_web::cookie::{time::Duration, Cookie, SameSite};

use crate::config::AuthSettings;

/// The cookie carrying a freshly issued session token.
pub fn session_cookie(settings: &AuthSettings, token: &str) -> Cookie<'static> {
    Cookie::build(settings.cookie_name.clone(), token.to_string())
        .path("/")
        .http_only(true)
        .secure(settings.secure_cookies)
        .same_site(same_site(settings))
        .max_age(Duration::seconds(settings.session_ttl_secs))
        .finish()
}

/// An expired, empty cookie that makes the browser forget the session.
pub fn removal_cookie(settings: &AuthSettings) -> Cookie<'static> {
    let mut cookie = Cookie::build(settings.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .secure(settings.secure_cookies)
        .same_site(same_site(settings))
        .finish();
    cookie.make_removal();
    cookie
}

// Cross-site frontends only receive the cookie with SameSite=None, which
// browsers accept on secure cookies alone.
fn same_site(settings: &AuthSettings) -> SameSite {
    if settings.secure_cookies {
        SameSite::None
    } else {
        SameSite::Lax
    }
}
