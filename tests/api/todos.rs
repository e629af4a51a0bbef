use crate::helpers::{assert_is_redirect_to, spawn_app};

#[tokio::test]
async fn add_list_and_delete_a_todo_end_to_end() {
    // arrange
    let app = spawn_app().await;
    let alice = app.new_user();
    alice.register_and_login("alice", "pw1").await;

    // act
    let response = alice.add_todo("buy milk").await;

    // assert
    assert_is_redirect_to(&response, "/todos");
    let html = alice.get_todos_html().await;
    assert_eq!(html.matches("<li>").count(), 1);
    assert!(html.contains("buy milk"));

    let todos = app.todos_of("alice");
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].task, "buy milk");

    // act
    let response = alice.get(&format!("/delete/{}", todos[0].id)).await;

    // assert
    assert_is_redirect_to(&response, "/todos");
    let html = alice.get_todos_html().await;
    assert_eq!(html.matches("<li>").count(), 0);
    assert!(app.todos_of("alice").is_empty());
}

#[tokio::test]
async fn a_todo_is_invisible_to_other_users() {
    // arrange
    let app = spawn_app().await;
    let alice = app.new_user();
    let bob = app.new_user();
    alice.register_and_login("alice", "pw1").await;
    bob.register_and_login("bob", "pw2").await;

    // act
    alice.add_todo("alice's secret plan").await;

    // assert
    let html = bob.get_todos_html().await;
    assert_eq!(html.matches("<li>").count(), 0);
    assert!(!html.contains("secret plan"));
    assert_eq!(alice.get_todos_html().await.matches("<li>").count(), 1);
}

#[tokio::test]
async fn a_user_cannot_delete_another_users_todo() {
    // arrange
    let app = spawn_app().await;
    let alice = app.new_user();
    let bob = app.new_user();
    alice.register_and_login("alice", "pw1").await;
    bob.register_and_login("bob", "pw2").await;
    alice.add_todo("buy milk").await;
    let todo_id = app.todos_of("alice")[0].id;

    // act
    let response = bob.get(&format!("/delete/{}", todo_id)).await;

    // assert
    assert_is_redirect_to(&response, "/todos");
    assert_eq!(app.todos_of("alice").len(), 1);
    assert!(alice.get_todos_html().await.contains("buy milk"));
}

#[tokio::test]
async fn deleting_a_nonexistent_todo_redirects_normally() {
    // arrange
    let app = spawn_app().await;
    let alice = app.new_user();
    alice.register_and_login("alice", "pw1").await;

    // act
    let response = alice.get("/delete/4242").await;

    // assert
    assert_is_redirect_to(&response, "/todos");
}

#[tokio::test]
async fn add_returns_a_400_for_an_empty_task() {
    // arrange
    let app = spawn_app().await;
    let alice = app.new_user();
    alice.register_and_login("alice", "pw1").await;
    let test_cases = vec![("", "empty task"), ("   ", "whitespace-only task")];

    for (task, description) in test_cases {
        // act
        let response = alice.add_todo(task).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 Bad Request for an {}.",
            description
        );
    }
    assert!(app.todos_of("alice").is_empty());
}

#[tokio::test]
async fn tasks_are_escaped_when_listed() {
    // arrange
    let app = spawn_app().await;
    let alice = app.new_user();
    alice.register_and_login("alice", "pw1").await;

    // act
    alice.add_todo("<script>alert(1)</script>").await;

    // assert
    let html = alice.get_todos_html().await;
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
}
