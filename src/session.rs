//! The login session: the user id, stored in an encrypted private cookie.

use rocket::http::CookieJar;

pub const SESSION_COOKIE: &str = "user_id";

pub fn log_in(cookies: &CookieJar<'_>, user_id: i32) {
    cookies.add_private((SESSION_COOKIE, user_id.to_string()));
}

pub fn log_out(cookies: &CookieJar<'_>) {
    cookies.remove_private(SESSION_COOKIE);
}

/// The user id bound to the session, if the cookie is present and was
/// encrypted with our secret key.
pub fn user_id(cookies: &CookieJar<'_>) -> Option<i32> {
    cookies
        .get_private(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}
