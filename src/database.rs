//! SQLite connection pool and the request guard that hands out connections.
//!
//! The pool never opens a connection up front. An unreachable database
//! therefore does not stop the server from starting: each request that
//! needs storage fails its guard with `503`, which renders the setup page.

use crate::configuration::DatabaseSettings;
use crate::telemetry::spawn_blocking_with_tracing;
use anyhow::{anyhow, Context};
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::SqliteConnection;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest};
use rocket::Request;
use std::sync::Arc;
use tokio::sync::Mutex;

type SqliteManager = ConnectionManager<SqliteConnection>;

/// Managed by Rocket; cloning is cheap.
#[derive(Clone)]
pub struct TodoDbPool(Pool<SqliteManager>);

pub fn get_connection_pool(configuration: &DatabaseSettings) -> TodoDbPool {
    let manager = SqliteManager::new(configuration.connection_string());
    let pool = Pool::builder()
        .min_idle(Some(0))
        .connection_timeout(configuration.connection_timeout())
        .build_unchecked(manager);
    TodoDbPool(pool)
}

/// One pooled connection, borrowed for the duration of a request.
pub struct TodoDbConn {
    connection: Arc<Mutex<PooledConnection<SqliteManager>>>,
}

impl TodoDbConn {
    #[tracing::instrument(name = "Get a connection from the DB pool", skip(pool))]
    pub async fn get_one(pool: &TodoDbPool) -> Result<Self, anyhow::Error> {
        let pool = pool.0.clone();
        let connection = spawn_blocking_with_tracing(move || pool.get())
            .await
            .context("Failed to spawn blocking task.")?
            .context("Failed to retrieve a connection from the DB pool.")?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Runs `f` with the connection on the blocking thread pool.
    pub async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        let outcome = spawn_blocking_with_tracing(move || {
            let mut connection = connection.blocking_lock();
            f(&mut **connection)
        })
        .await;
        match outcome {
            Ok(value) => value,
            // a panic inside `f` resurfaces in the calling task
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for TodoDbConn {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let pool = match request.rocket().state::<TodoDbPool>() {
            Some(pool) => pool,
            None => {
                let e = anyhow!("No connection pool is managed by the application.");
                tracing::error!(error.cause_chain = ?e, "Missing DB pool.");
                return Outcome::Error((Status::InternalServerError, e));
            }
        };
        match TodoDbConn::get_one(pool).await {
            Ok(conn) => Outcome::Success(conn),
            Err(e) => {
                tracing::warn!(error.cause_chain = ?e, "The database is unreachable.");
                Outcome::Error((Status::ServiceUnavailable, e))
            }
        }
    }
}
