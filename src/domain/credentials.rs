use super::Username;
use secrecy::Secret;

/// A username and password pair as submitted through the login or
/// registration form. The password is not validated.
pub struct Credentials {
    pub username: Username,
    pub password: Secret<String>,
}
