use crate::database::TodoDbConn;
use crate::domain::TaskText;
use crate::guards::AuthenticatedUser;
use crate::models::{NewTodo, Todo};
use crate::routes::{error_chain_fmt, respond_to_unexpected_error, respond_with_bad_request};
use crate::templates;
use anyhow::Context;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use rocket::form::Form;
use rocket::response::content::RawHtml;
use rocket::response::{Redirect, Responder};
use rocket::Request;
use uuid::Uuid;

#[derive(FromForm)]
pub struct TaskFormData {
    task: String,
}

#[tracing::instrument(
    name = "List todos",
    skip(user, conn),
    fields(request_id = %Uuid::new_v4(), username = %user.username)
)]
#[get("/todos")]
pub async fn list_todos(
    user: AuthenticatedUser,
    conn: TodoDbConn,
) -> Result<RawHtml<String>, TodoError> {
    let todos = get_todos(&conn, user.user_id)
        .await
        .context("Failed to fetch the todos of the current user.")?;
    Ok(RawHtml(templates::todos_page(&user.username, &todos)))
}

#[tracing::instrument(
    name = "Add a todo",
    skip(user, form, conn),
    fields(request_id = %Uuid::new_v4(), username = %user.username)
)]
#[post("/add", data = "<form>")]
pub async fn add_todo(
    user: AuthenticatedUser,
    form: Form<TaskFormData>,
    conn: TodoDbConn,
) -> Result<Redirect, TodoError> {
    let task = TaskText::parse(form.into_inner().task).map_err(TodoError::ValidationError)?;
    insert_todo(&conn, user.user_id, task)
        .await
        .context("Failed to store a new todo.")?;
    Ok(Redirect::to("/todos"))
}

/// Deleting a todo that does not exist, or that belongs to somebody else,
/// is not an error: the user is sent back to their list either way.
#[tracing::instrument(
    name = "Delete a todo",
    skip(user, conn),
    fields(request_id = %Uuid::new_v4(), username = %user.username)
)]
#[get("/delete/<task_id>")]
pub async fn delete_todo(
    user: AuthenticatedUser,
    task_id: i32,
    conn: TodoDbConn,
) -> Result<Redirect, TodoError> {
    let deleted = delete_owned_todo(&conn, user.user_id, task_id)
        .await
        .context("Failed to delete a todo.")?;
    if deleted == 0 {
        tracing::info!("No todo with this id belongs to the current user.");
    }
    Ok(Redirect::to("/todos"))
}

#[derive(thiserror::Error)]
pub enum TodoError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for TodoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for TodoError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        match self {
            TodoError::ValidationError(reason) => respond_with_bad_request(&reason, request),
            TodoError::UnexpectedError(e) => respond_to_unexpected_error(e, request),
        }
    }
}

#[tracing::instrument(name = "Get todos from the database", skip(conn))]
async fn get_todos(conn: &TodoDbConn, user_id: i32) -> Result<Vec<Todo>, diesel::result::Error> {
    use crate::schema::todos;
    conn.run(move |c| {
        todos::table
            .filter(todos::user_id.eq(user_id))
            .load::<Todo>(c)
    })
    .await
}

#[tracing::instrument(name = "Save a new todo in the database", skip(conn, task))]
async fn insert_todo(
    conn: &TodoDbConn,
    user_id: i32,
    task: TaskText,
) -> Result<(), diesel::result::Error> {
    use crate::schema::todos;
    conn.run(move |c| {
        diesel::insert_into(todos::table)
            .values(NewTodo {
                user_id,
                task: task.as_ref(),
            })
            .execute(c)
    })
    .await
    .map(|_| ())
}

/// Returns how many rows were removed: zero or one.
#[tracing::instrument(name = "Delete an owned todo from the database", skip(conn))]
async fn delete_owned_todo(
    conn: &TodoDbConn,
    user_id: i32,
    task_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::todos;
    conn.run(move |c| {
        diesel::delete(
            todos::table
                .filter(todos::id.eq(task_id))
                .filter(todos::user_id.eq(user_id)),
        )
        .execute(c)
    })
    .await
}
