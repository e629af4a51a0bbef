use crate::catchers::*;
use crate::configuration::Settings;
use crate::database::{get_connection_pool, TodoDbConn, TodoDbPool};
use crate::port_saver::Port;
use crate::port_saver;
use crate::routes::{health_check, home, login, logout, register, todos};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::fairing::{self, AdHoc};
use rocket::figment::Figment;
use rocket::{Build, Ignite, Rocket};
use secrecy::ExposeSecret;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

impl Application {
    pub async fn build(configuration: &Settings) -> Result<Self, rocket::Error> {
        let (port_saver, port) = port_saver::create_pair();
        let mut server = rocket::custom(figment(configuration))
            .manage(get_connection_pool(&configuration.database))
            .attach(port_saver);
        if configuration.database.migrate_on_startup {
            server = server.attach(AdHoc::try_on_ignite("Database migrations", run_migrations));
        } else {
            tracing::warn!("Skipping database migrations; the schema must be created separately.");
        }
        server
            .mount(
                "/",
                routes![
                    health_check::health_check,
                    home::home,
                    login::login_form,
                    login::login,
                    register::register_form,
                    register::register,
                    logout::logout,
                    todos::list_todos,
                    todos::add_todo,
                    todos::delete_todo
                ],
            )
            .register(
                "/",
                catchers![
                    unauthorized_redirect_to_login,
                    unprocessable_entity_to_bad_request,
                    service_unavailable_setup_instructions
                ],
            )
            .ignite()
            .await
            .map(|server| Self { server, port })
    }
}

fn figment(configuration: &Settings) -> Figment {
    let application = &configuration.application;
    rocket::Config::figment()
        .merge(("address", application.host))
        .merge(("port", application.port.unwrap_or(0)))
        .merge(("secret_key", application.secret_key.expose_secret()))
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    let pool = match rocket.state::<TodoDbPool>().cloned() {
        Some(pool) => pool,
        None => {
            tracing::error!("No connection pool to run migrations with.");
            return Err(rocket);
        }
    };
    // An unreachable database is reported by the setup page, not at startup.
    let conn = match TodoDbConn::get_one(&pool).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(error.cause_chain = ?e, "Skipping database migrations.");
            return Ok(rocket);
        }
    };
    let outcome = conn
        .run(|c| {
            c.run_pending_migrations(MIGRATIONS)
                .map(|applied| applied.len())
                .map_err(|e| e.to_string())
        })
        .await;
    match outcome {
        Ok(applied) => {
            tracing::info!(applied, "Database migrations are up to date.");
            Ok(rocket)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to run database migrations.");
            Err(rocket)
        }
    }
}
