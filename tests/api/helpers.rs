use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};
use once_cell::sync::Lazy;
use todo_list::configuration::get_configuration;
use todo_list::models::Todo;
use todo_list::startup::Application;
use todo_list::telemetry::{get_subscriber, init_subscriber};
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to initialize tracing.");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to initialize tracing.");
    }
});

pub struct TestApp {
    pub address: String,
    pub database_path: String,
}

/// One visitor of the application, with its own cookie jar.
pub struct TestUser {
    address: String,
    client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    spawn(temp_directory(), true).await
}

/// An application whose database was never migrated.
pub async fn spawn_app_without_schema() -> TestApp {
    spawn(temp_directory(), false).await
}

/// An application whose database file lives in a directory that does not
/// exist, so no connection can ever be opened.
pub async fn spawn_app_with_unreachable_database() -> TestApp {
    let directory = std::env::temp_dir()
        .join(Uuid::new_v4().to_string())
        .join("missing");
    spawn(directory.to_string_lossy().into_owned(), true).await
}

fn temp_directory() -> String {
    std::env::temp_dir().to_string_lossy().into_owned()
}

async fn spawn(database_directory: String, migrate_on_startup: bool) -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c.database.directory = database_directory;
        c.database.database_name = Uuid::new_v4().to_string();
        c.database.migrate_on_startup = migrate_on_startup;
        c.database.connection_timeout_milliseconds = 200;
        c
    };

    let app = Application::build(&configuration)
        .await
        .expect("Failed to build the application.");
    let port = app.port;
    let _ = tokio::spawn(app.server.launch());
    let port = port.get().await.expect("The server never reported its port.");

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        database_path: configuration.database.connection_string(),
    }
}

impl TestApp {
    pub fn new_user(&self) -> TestUser {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .expect("Failed to build the HTTP client.");
        TestUser {
            address: self.address.clone(),
            client,
        }
    }

    pub fn db_connection(&self) -> SqliteConnection {
        SqliteConnection::establish(&self.database_path).expect("Failed to connect to SQLite.")
    }

    /// Todos stored for `username`, read straight from the database.
    pub fn todos_of(&self, username: &str) -> Vec<Todo> {
        use todo_list::schema::{todos, users};

        todos::table
            .inner_join(users::table)
            .filter(users::username.eq(username))
            .select((todos::id, todos::user_id, todos::task))
            .load::<Todo>(&mut self.db_connection())
            .expect("Failed to load todos.")
    }
}

impl TestUser {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", &self.address, path))
            .form(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_form("/register", &[("username", username), ("password", password)])
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    pub async fn register_and_login(&self, username: &str, password: &str) {
        assert_is_redirect_to(&self.register(username, password).await, "/login");
        assert_is_redirect_to(&self.login(username, password).await, "/todos");
    }

    pub async fn add_todo(&self, task: &str) -> reqwest::Response {
        self.post_form("/add", &[("task", task)]).await
    }

    pub async fn get_todos_html(&self) -> String {
        let response = self.get("/todos").await;
        assert_eq!(response.status().as_u16(), 200);
        response.text().await.unwrap()
    }
}

pub fn assert_is_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}
