use crate::helpers::{
    assert_is_redirect_to, spawn_app, spawn_app_with_unreachable_database,
    spawn_app_without_schema,
};
use diesel::RunQueryDsl;

const SETUP_HEADING: &str = "Database Setup Required";

async fn assert_setup_instructions(response: reqwest::Response) {
    assert_eq!(response.status().as_u16(), 503);
    let html = response.text().await.unwrap();
    assert!(html.contains(SETUP_HEADING), "Unexpected page: {}", html);
    assert!(html.contains("Database tables do not exist"));
}

#[tokio::test]
async fn the_root_shows_setup_instructions_when_the_schema_is_missing() {
    // arrange
    let app = spawn_app_without_schema().await;

    // act
    let response = app.new_user().get("/").await;

    // assert
    assert_setup_instructions(response).await;
}

#[tokio::test]
async fn auth_forms_show_setup_instructions_when_the_schema_is_missing() {
    // arrange
    let app = spawn_app_without_schema().await;
    let visitor = app.new_user();

    // act & assert
    assert_setup_instructions(visitor.get("/login").await).await;
    assert_setup_instructions(visitor.get("/register").await).await;
    assert_setup_instructions(visitor.register("alice", "pw1").await).await;
    assert_setup_instructions(visitor.login("alice", "pw1").await).await;
}

#[tokio::test]
async fn an_unreachable_database_still_serves_setup_instructions() {
    // arrange
    let app = spawn_app_with_unreachable_database().await;
    let visitor = app.new_user();

    // act & assert
    assert_setup_instructions(visitor.get("/").await).await;
    assert_setup_instructions(visitor.get("/login").await).await;
    assert_setup_instructions(visitor.get("/register").await).await;
    assert_setup_instructions(visitor.register("alice", "pw1").await).await;
    assert_eq!(visitor.get("/health_check").await.status().as_u16(), 200);
}

#[tokio::test]
async fn anonymous_visitors_end_up_on_the_setup_instructions() {
    // arrange
    let app = spawn_app_without_schema().await;
    let visitor = app.new_user();

    // act
    let response = visitor.get("/todos").await;

    // assert
    assert_is_redirect_to(&response, "/login");
    assert_setup_instructions(visitor.get("/login").await).await;
}

#[tokio::test]
async fn protected_routes_show_setup_instructions_when_the_schema_disappears() {
    // arrange
    let app = spawn_app().await;
    let alice = app.new_user();
    alice.register_and_login("alice", "pw1").await;
    alice.add_todo("buy milk").await;
    diesel::sql_query("DROP TABLE todos")
        .execute(&mut app.db_connection())
        .unwrap();
    diesel::sql_query("DROP TABLE users")
        .execute(&mut app.db_connection())
        .unwrap();

    // act & assert
    assert_setup_instructions(alice.get("/todos").await).await;
    assert_setup_instructions(alice.add_todo("buy bread").await).await;
    assert_setup_instructions(alice.get("/delete/1").await).await;
    assert_setup_instructions(alice.get("/logout").await).await;
    assert_setup_instructions(alice.get("/").await).await;
}

#[tokio::test]
async fn the_application_notices_a_late_migration() {
    // arrange
    let app = spawn_app_without_schema().await;
    let visitor = app.new_user();
    assert_setup_instructions(visitor.get("/").await).await;

    // act
    {
        use diesel_migrations::MigrationHarness;
        app.db_connection()
            .run_pending_migrations(todo_list::startup::MIGRATIONS)
            .unwrap();
    }

    // assert
    assert_is_redirect_to(&visitor.get("/").await, "/todos");
    visitor.register_and_login("alice", "pw1").await;
    assert_eq!(visitor.get("/todos").await.status().as_u16(), 200);
}
