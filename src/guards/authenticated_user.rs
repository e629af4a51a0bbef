use crate::database::TodoDbConn;
use crate::guards::OrStatus;
use crate::session;
use crate::setup;
use anyhow::Context;
use diesel::{OptionalExtension, QueryDsl, RunQueryDsl};
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest};
use rocket::Request;

/// A user with a live session. Routes taking this guard answer `401`
/// (redirected to the login form by a catcher) when nobody is logged in.
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
    // prevents construction outside of this module
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match from_request_result(request).await {
            Ok(user) => Outcome::Success(user),
            Err((status, e)) => {
                tracing::info!(error.cause_chain = ?e, %status, "Rejected an unauthenticated request.");
                Outcome::Error((status, e))
            }
        }
    }
}

async fn from_request_result(
    request: &Request<'_>,
) -> Result<AuthenticatedUser, (Status, anyhow::Error)> {
    let user_id = session::user_id(request.cookies())
        .or_status(Status::Unauthorized, "User has not logged in.")?;
    let conn = request
        .guard::<TodoDbConn>()
        .await
        .succeeded()
        .or_status(
            Status::ServiceUnavailable,
            "Failed to retrieve a connection from the DB pool.",
        )?;

    let username = load_username(user_id, conn)
        .await
        .map_err(|e| {
            let status = if setup::is_schema_missing(&e) {
                Status::ServiceUnavailable
            } else {
                Status::InternalServerError
            };
            (status, e)
        })?
        .or_status(
            Status::Unauthorized,
            "The session belongs to a user that no longer exists.",
        )?;

    Ok(AuthenticatedUser {
        user_id,
        username,
        _private: (),
    })
}

#[tracing::instrument(name = "Load the session user", skip(conn))]
async fn load_username(user_id: i32, conn: TodoDbConn) -> Result<Option<String>, anyhow::Error> {
    use crate::schema::users;

    conn.run(move |c| {
        users::table
            .find(user_id)
            .select(users::username)
            .first::<String>(c)
            .optional()
    })
    .await
    .context("Failed to load the user bound to the session.")
}
