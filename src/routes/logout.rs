use crate::guards::AuthenticatedUser;
use crate::session;
use rocket::http::CookieJar;
use rocket::response::Redirect;

#[tracing::instrument(name = "Log out", skip(user, cookies), fields(username = %user.username))]
#[get("/logout")]
pub fn logout(user: AuthenticatedUser, cookies: &CookieJar<'_>) -> Redirect {
    session::log_out(cookies);
    tracing::info!("Session cleared.");
    Redirect::to("/login")
}
