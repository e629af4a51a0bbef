//! Inline HTML pages. Anything user-supplied goes through `html_escape`.

use crate::models::Todo;

const STYLES: &str = r#"
    body { font-family: sans-serif; max-width: 640px; margin: 40px auto; padding: 0 20px; }
    .flash { background: #eef6ee; border: 1px solid #9c9; padding: 8px; }
    .error { background: #f2dede; border: 1px solid #d9534f; padding: 8px; }
    code { background: #f5f5f5; padding: 2px 4px; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{styles}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = title,
        styles = STYLES,
        body = body
    )
}

fn message_html(message: Option<&str>, class: &str) -> String {
    message.map_or(String::new(), |m| {
        format!(r#"<p class="{}">{}</p>"#, class, html_escape(m))
    })
}

/// The login form. `message` is either a pending flash message or the
/// outcome of a failed login attempt.
pub fn login_page(message: Option<&str>) -> String {
    layout(
        "Login",
        &format!(
            r#"<h2>Login</h2>
{message}
<form method="post" action="/login">
  <input type="text" name="username" placeholder="Username" required><br>
  <input type="password" name="password" placeholder="Password" required><br>
  <button type="submit">Login</button>
</form>
<a href="/register">Register</a>"#,
            message = message_html(message, "flash")
        ),
    )
}

pub fn register_page(error: Option<&str>) -> String {
    layout(
        "Register",
        &format!(
            r#"<h2>Register</h2>
{error}
<form method="post" action="/register">
  <input type="text" name="username" placeholder="Username" required><br>
  <input type="password" name="password" placeholder="Password" required><br>
  <button type="submit">Register</button>
</form>
<a href="/login">Login</a>"#,
            error = message_html(error, "error")
        ),
    )
}

pub fn todos_page(username: &str, todos: &[Todo]) -> String {
    let items: String = todos
        .iter()
        .map(|todo| {
            format!(
                "  <li>{} <a href=\"/delete/{}\">Delete</a></li>\n",
                html_escape(&todo.task),
                todo.id
            )
        })
        .collect();
    layout(
        "Your To-Do List",
        &format!(
            r#"<h2>Your To-Do List</h2>
<p>Logged in as {username}</p>
<form method="post" action="/add">
  <input type="text" name="task" placeholder="New task" required>
  <button type="submit">Add</button>
</form>
<ul>
{items}</ul>
<a href="/logout">Logout</a>"#,
            username = html_escape(username),
            items = items
        ),
    )
}

/// Shown when the form data could not be used as submitted.
pub fn bad_request_page(reason: &str) -> String {
    layout(
        "Bad Request",
        &format!(
            r#"<h2>Bad Request</h2>
{reason}
<a href="/">Back</a>"#,
            reason = message_html(Some(reason), "error")
        ),
    )
}

pub fn setup_page(detail: Option<&str>) -> String {
    let detail = detail.map_or(String::new(), |d| {
        format!(
            "<p>Database Error: <code>{}</code></p>\n",
            html_escape(d)
        )
    });
    layout(
        "Database Setup Required",
        &format!(
            r#"<h2>Database Setup Required</h2>
<p>Database tables do not exist yet, or the database cannot be opened.</p>
{detail}<p>Create the schema with one of:</p>
<ol>
  <li>Run <code>diesel migration run</code> against the configured database.</li>
  <li>Set <code>database.migrate_on_startup: true</code> (or
      <code>APP_DATABASE__MIGRATE_ON_STARTUP=true</code>) and restart the server.</li>
</ol>
<p>Reload this page once the migrations have been applied.</p>"#,
            detail = detail
        ),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
