//! Detection of an uninitialized database.
//!
//! The schema is created out of band (embedded migrations at startup, or
//! `diesel migration run`). Until that happens every storage-backed page
//! answers with setup instructions instead of a bare server error. The
//! state is never cached: each probe looks at the database again, so the
//! application notices a migration on the next request.

use crate::database::TodoDbConn;
use crate::templates;
use diesel::result::{DatabaseErrorInformation, Error as DieselError};
use diesel::{OptionalExtension, QueryDsl, QueryResult, RunQueryDsl};
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::{status, Responder};
use rocket::Request;

#[derive(Debug, PartialEq, Eq)]
pub enum SchemaState {
    Ready,
    /// Carries the storage error that the probe ran into.
    Uninitialized(String),
}

#[tracing::instrument(name = "Probe the database schema", skip(conn))]
pub async fn probe(conn: &TodoDbConn) -> SchemaState {
    let result = conn
        .run(|c| -> QueryResult<()> {
            use crate::schema::{todos, users};
            users::table.select(users::id).first::<i32>(c).optional()?;
            todos::table.select(todos::id).first::<i32>(c).optional()?;
            Ok(())
        })
        .await;
    match result {
        Ok(()) => SchemaState::Ready,
        Err(e) => {
            tracing::warn!(error = %e, "The database schema is not initialized.");
            SchemaState::Uninitialized(e.to_string())
        }
    }
}

/// Answers with the setup instructions unless the schema is ready.
pub async fn ensure_ready(conn: &TodoDbConn) -> Result<(), SetupInstructions> {
    match probe(conn).await {
        SchemaState::Ready => Ok(()),
        SchemaState::Uninitialized(detail) => Err(SetupInstructions::new(Some(detail))),
    }
}

/// Whether a storage failure anywhere in the chain means that the tables
/// have not been created, or that the database file cannot be opened.
pub fn is_schema_missing(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<DieselError>(),
            Some(DieselError::DatabaseError(_, info)) if reports_missing_schema(&**info)
        )
    })
}

fn reports_missing_schema(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> bool {
    let message = info.message();
    message.contains("no such table") || message.contains("unable to open database")
}

/// The setup-instructions page, served with `503 Service Unavailable`.
pub struct SetupInstructions {
    detail: Option<String>,
}

impl SetupInstructions {
    pub fn new(detail: Option<String>) -> Self {
        Self { detail }
    }

    pub fn from_error(error: &anyhow::Error) -> Self {
        Self::new(Some(error.root_cause().to_string()))
    }
}

impl<'r> Responder<'r, 'static> for SetupInstructions {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        status::Custom(
            Status::ServiceUnavailable,
            RawHtml(templates::setup_page(self.detail.as_deref())),
        )
        .respond_to(request)
    }
}
