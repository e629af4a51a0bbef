use crate::authentication::{validate_credentials, AuthError};
use crate::database::TodoDbConn;
use crate::domain::{Credentials, Username};
use crate::routes::{error_chain_fmt, respond_to_unexpected_error};
use crate::session;
use crate::setup::{self, SetupInstructions};
use crate::templates;
use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Redirect, Responder};
use rocket::Request;
use secrecy::Secret;
use uuid::Uuid;

#[derive(FromForm)]
pub struct LoginFormData {
    username: String,
    password: String,
}

#[get("/login")]
pub async fn login_form(
    flash: Option<FlashMessage<'_>>,
    conn: TodoDbConn,
) -> Result<RawHtml<String>, SetupInstructions> {
    setup::ensure_ready(&conn).await?;
    Ok(RawHtml(templates::login_page(
        flash.as_ref().map(|f| f.message()),
    )))
}

#[tracing::instrument(
    name = "Log in",
    skip(form, conn, cookies),
    fields(request_id = %Uuid::new_v4(), username = %form.username, user_id = tracing::field::Empty)
)]
#[post("/login", data = "<form>")]
pub async fn login(
    form: Form<LoginFormData>,
    conn: TodoDbConn,
    cookies: &CookieJar<'_>,
) -> Result<Redirect, LoginError> {
    let LoginFormData { username, password } = form.into_inner();
    let username = Username::parse(username)
        .map_err(|e| LoginError::AuthError(anyhow::anyhow!(e)))?;
    let credentials = Credentials {
        username,
        password: Secret::new(password),
    };

    let user_id = validate_credentials(credentials, &conn)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials(_) => LoginError::AuthError(e.into()),
            AuthError::UnexpectedError(_) => LoginError::UnexpectedError(e.into()),
        })?;
    tracing::Span::current().record("user_id", &tracing::field::display(user_id));

    session::log_in(cookies, user_id);
    Ok(Redirect::to("/todos"))
}

#[derive(thiserror::Error)]
pub enum LoginError {
    #[error("Authentication failed")]
    AuthError(#[source] anyhow::Error),
    #[error("Something went wrong")]
    UnexpectedError(#[source] anyhow::Error),
}

impl std::fmt::Debug for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for LoginError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        match self {
            LoginError::AuthError(e) => {
                tracing::info!(error.cause_chain = ?e, "Login attempt rejected.");
                RawHtml(templates::login_page(Some("Invalid credentials"))).respond_to(request)
            }
            LoginError::UnexpectedError(e) => respond_to_unexpected_error(e, request),
        }
    }
}
