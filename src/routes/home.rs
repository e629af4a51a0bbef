use crate::database::TodoDbConn;
use crate::setup::{self, SetupInstructions};
use rocket::response::Redirect;

/// Sends visitors to their list once the database is usable.
#[get("/")]
pub async fn home(conn: TodoDbConn) -> Result<Redirect, SetupInstructions> {
    setup::ensure_ready(&conn).await?;
    Ok(Redirect::to("/todos"))
}
