use crate::authentication::{register_user, RegistrationError};
use crate::database::TodoDbConn;
use crate::domain::{Credentials, Username};
use crate::routes::{error_chain_fmt, respond_to_unexpected_error, respond_with_bad_request};
use crate::setup::{self, SetupInstructions};
use crate::templates;
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::{status, Flash, Redirect, Responder};
use rocket::Request;
use secrecy::Secret;
use uuid::Uuid;

#[derive(FromForm)]
pub struct RegisterFormData {
    username: String,
    password: String,
}

impl TryFrom<RegisterFormData> for Credentials {
    type Error = String;

    fn try_from(form: RegisterFormData) -> Result<Self, Self::Error> {
        let username = Username::parse(form.username)?;
        Ok(Credentials {
            username,
            password: Secret::new(form.password),
        })
    }
}

#[get("/register")]
pub async fn register_form(conn: TodoDbConn) -> Result<RawHtml<String>, SetupInstructions> {
    setup::ensure_ready(&conn).await?;
    Ok(RawHtml(templates::register_page(None)))
}

#[tracing::instrument(
    name = "Register",
    skip(form, conn),
    fields(request_id = %Uuid::new_v4(), username = %form.username)
)]
#[post("/register", data = "<form>")]
pub async fn register(
    form: Form<RegisterFormData>,
    conn: TodoDbConn,
) -> Result<Flash<Redirect>, RegisterError> {
    let credentials: Credentials = form
        .into_inner()
        .try_into()
        .map_err(RegisterError::ValidationError)?;
    register_user(credentials, &conn).await?;
    tracing::info!("New user has been registered.");
    Ok(Flash::success(
        Redirect::to("/login"),
        "User created, please login.",
    ))
}

#[derive(thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Username already taken")]
    UsernameTaken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<RegistrationError> for RegisterError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::UsernameTaken(_) => RegisterError::UsernameTaken,
            RegistrationError::UnexpectedError(e) => RegisterError::UnexpectedError(e),
        }
    }
}

impl std::fmt::Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for RegisterError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        match self {
            RegisterError::ValidationError(reason) => respond_with_bad_request(&reason, request),
            RegisterError::UsernameTaken => status::Custom(
                Status::Conflict,
                RawHtml(templates::register_page(Some("Username already taken"))),
            )
            .respond_to(request),
            RegisterError::UnexpectedError(e) => respond_to_unexpected_error(e, request),
        }
    }
}
