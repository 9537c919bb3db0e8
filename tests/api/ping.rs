use crate::helpers::spawn_app;

#[actix_web::test]
async fn ping_returns_pong() {
    let app = spawn_app().await;

    let response = app.get_ping().await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "pong");
}
