use rocket::response::Redirect;

/// Protected routes send anonymous visitors to the login form.
#[catch(401)]
pub fn unauthorized_redirect_to_login() -> Redirect {
    Redirect::to("/login")
}
