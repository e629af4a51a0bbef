use crate::helpers::{assert_is_redirect_to, spawn_app};

#[tokio::test]
async fn logout_clears_the_session() {
    // arrange
    let app = spawn_app().await;
    let visitor = app.new_user();
    visitor.register_and_login("alice", "pw1").await;
    assert_eq!(visitor.get("/todos").await.status().as_u16(), 200);

    // act
    let response = visitor.get("/logout").await;

    // assert
    assert_is_redirect_to(&response, "/login");
    assert_is_redirect_to(&visitor.get("/todos").await, "/login");
}
