use crate::database::TodoDbConn;
use crate::domain::{Credentials, Username};
use crate::models::{NewUser, User};
use crate::routes::error_chain_fmt;
use crate::telemetry::spawn_blocking_with_tracing;
use anyhow::Context;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::Argon2;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use secrecy::{ExposeSecret, Secret};

// Verified against when the username is unknown, so that both failure
// modes cost the same.
const FALLBACK_PASSWORD_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$\
    gZiV/M1gPc22ElAH/Jh1Hw$\
    CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error)]
pub enum RegistrationError {
    #[error("The username {0} is already taken.")]
    UsernameTaken(Username),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Returns the id of the user the credentials belong to.
#[tracing::instrument(name = "Validate credentials", skip(credentials, conn))]
pub async fn validate_credentials(
    credentials: Credentials,
    conn: &TodoDbConn,
) -> Result<i32, AuthError> {
    let mut user_id = None;
    let mut expected_password_hash = Secret::new(FALLBACK_PASSWORD_HASH.to_string());

    if let Some((stored_user_id, stored_password_hash)) =
        get_stored_credentials(credentials.username.clone(), conn).await?
    {
        user_id = Some(stored_user_id);
        expected_password_hash = stored_password_hash;
    }

    spawn_blocking_with_tracing(move || {
        verify_password_hash(expected_password_hash, credentials.password)
    })
    .await
    .context("Failed to spawn blocking task.")??;

    user_id
        .ok_or_else(|| anyhow::anyhow!("Unknown username."))
        .map_err(AuthError::InvalidCredentials)
}

#[tracing::instrument(
    name = "Verify password hash",
    skip(expected_password_hash, password_candidate)
)]
fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), AuthError> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .context("Failed to parse hash in PHC string format.")?;

    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .context("Invalid password.")
        .map_err(AuthError::InvalidCredentials)
}

#[tracing::instrument(name = "Get stored credentials", skip(username, conn))]
async fn get_stored_credentials(
    username: Username,
    conn: &TodoDbConn,
) -> Result<Option<(i32, Secret<String>)>, anyhow::Error> {
    use crate::schema::users;

    let user = conn
        .run(move |c| {
            users::table
                .filter(users::username.eq(username.as_ref()))
                .first::<User>(c)
                .optional()
        })
        .await
        .context("Failed to perform a query to retrieve stored credentials.")?;
    Ok(user.map(|user| (user.id, Secret::new(user.password_hash))))
}

/// Stores a new user with a salted Argon2id hash of the password.
#[tracing::instrument(name = "Register a new user", skip(credentials, conn))]
pub async fn register_user(
    credentials: Credentials,
    conn: &TodoDbConn,
) -> Result<(), RegistrationError> {
    let Credentials { username, password } = credentials;
    let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("Failed to spawn blocking task.")??;

    let name = username.clone();
    conn.run(move |c| {
        use crate::schema::users;
        diesel::insert_into(users::table)
            .values(NewUser {
                username: name.as_ref(),
                password_hash: password_hash.expose_secret(),
            })
            .execute(c)
    })
    .await
    .map(|_| ())
    .map_err(|e| match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RegistrationError::UsernameTaken(username)
        }
        e => RegistrationError::UnexpectedError(
            anyhow::Error::new(e).context("Failed to insert the new user."),
        ),
    })
}

fn compute_password_hash(password: Secret<String>) -> Result<Secret<String>, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(Secret::new(password_hash))
}
