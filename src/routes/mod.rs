pub mod health_check;
pub mod home;
pub mod login;
pub mod logout;
pub mod register;
pub mod todos;

use crate::setup::{self, SetupInstructions};
use crate::templates;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::{status, Responder};
use rocket::{Request, Response};

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// Storage failures end up here. A missing schema gets the setup
/// instructions, anything else a bare `500`.
fn respond_to_unexpected_error<'r>(
    error: anyhow::Error,
    request: &'r Request<'_>,
) -> rocket::response::Result<'static> {
    if setup::is_schema_missing(&error) {
        tracing::warn!(error.cause_chain = ?error, "The database schema is missing.");
        return SetupInstructions::from_error(&error).respond_to(request);
    }
    tracing::error!(error.cause_chain = ?error, "Failed to handle the request.");
    Response::build()
        .status(Status::InternalServerError)
        .ok()
}

fn respond_with_bad_request<'r>(
    reason: &str,
    request: &'r Request<'_>,
) -> rocket::response::Result<'static> {
    status::BadRequest(RawHtml(templates::bad_request_page(reason))).respond_to(request)
}
