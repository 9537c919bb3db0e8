use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{any, body_json, header, method, path},
};

use crate::helpers::{
    FakeMailer, TEST_API_KEY, TEST_GROUP_ID, UNREACHABLE_HOST, UNREACHABLE_PORT, spawn_app,
    spawn_app_with,
};

#[actix_web::test]
async fn subscribe_empty_body_ret422() {
    let app = spawn_app().await;

    let response = app.post_subscribe(json!({})).await;

    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid input");
    assert_eq!(body["details"][0]["loc"], json!(["email"]));
    assert_eq!(body["details"][0]["type"], "missing");
}

#[actix_web::test]
async fn subscribe_invalid_input_ret422() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.mailing_list_server)
        .await;

    let test_cases = [
        (json!({ "email": "not-an-email" }), "malformed email"),
        (json!({ "email": "" }), "empty email"),
        (json!({ "email": "@mail.com" }), "missing local part"),
        (json!({ "email": 42 }), "email is not a string"),
        (json!({ "name": "Yorch" }), "missing email field"),
    ];

    for (body, case) in test_cases {
        let response = app.post_subscribe(body).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "The api did not fail with code 422 when payload was {}",
            case
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body.get("error").is_some(), "no error key for {}", case);
        assert!(body.get("details").is_some(), "no details key for {}", case);
    }
}

#[actix_web::test]
async fn subscribe_malformed_json_ret422() {
    let app = spawn_app().await;

    for raw in ["", "{\"email\":", "not json"] {
        let response = app.post_subscribe_raw(raw).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "The api did not fail with code 422 when payload was {:?}",
            raw
        );
    }
}

#[actix_web::test]
async fn subscribe_provider_created_ret200() {
    let app = spawn_app().await;

    Mock::given(path("/api/subscribers"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "OK" })))
        .expect(1)
        .mount(&app.mailing_list_server)
        .await;

    let response = app.post_subscribe(json!({ "email": "test@mail.com" })).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Suscripción exitosa");
}

#[actix_web::test]
async fn subscribe_forwards_credentials_email_and_group() {
    let app = spawn_app().await;

    Mock::given(path("/api/subscribers"))
        .and(method("POST"))
        .and(header("Authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .and(body_json(json!({
            "email": "test@mail.com",
            "groups": [TEST_GROUP_ID],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.mailing_list_server)
        .await;

    let response = app
        .post_subscribe(json!({ "email": "test@mail.com", "source": "footer" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
}

#[actix_web::test]
async fn subscribe_provider_rejection_is_passed_through() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "Subscriber already exists" })),
        )
        .expect(1)
        .mount(&app.mailing_list_server)
        .await;

    let response = app.post_subscribe(json!({ "email": "test@mail.com" })).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Error al suscribirse");
    assert_eq!(body["details"]["message"], "Subscriber already exists");
}

#[actix_web::test]
async fn subscribe_provider_status_is_kept_verbatim() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&app.mailing_list_server)
        .await;

    let response = app.post_subscribe(json!({ "email": "test@mail.com" })).await;

    assert_eq!(response.status().as_u16(), 429);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["details"], "slow down");
}

#[actix_web::test]
async fn subscribe_unreachable_provider_ret500() {
    let app = spawn_app_with(Some(FakeMailer::default()), |c| {
        c.mailing_list.base_url = format!("http://{UNREACHABLE_HOST}:{UNREACHABLE_PORT}");
    })
    .await;

    let response = app.post_subscribe(json!({ "email": "test@mail.com" })).await;

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Failed to reach the mailing list provider")
    );
}

#[actix_web::test]
async fn subscribe_provider_timeout_ret500() {
    let app = spawn_app_with(Some(FakeMailer::default()), |c| {
        c.mailing_list.timeout_milliseconds = 200;
    })
    .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201).set_delay(std::time::Duration::from_secs(2)))
        .expect(1)
        .mount(&app.mailing_list_server)
        .await;

    let response = app.post_subscribe(json!({ "email": "test@mail.com" })).await;

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body.get("error").is_some());
}
