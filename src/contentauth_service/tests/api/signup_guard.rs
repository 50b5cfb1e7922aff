use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use serde_json::{Value, json};

use crate::helpers::{ALLOWED_ORIGIN, TestApp};

#[tokio::test]
async fn should_return_400_without_challenge_token() {
    let app = TestApp::new().await;
    app.turnstile_passes().await;

    let response = app
        .post_sign_up(&json!({ "email": "a@example.com", "password": "password123" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "code": "CHALLENGE_REQUIRED",
            "message": "Please complete the security challenge"
        })
    );
    assert_eq!(app.turnstile_calls().await, 0);
}

#[tokio::test]
async fn should_return_200_when_challenge_passes() {
    let app = TestApp::new().await;
    app.turnstile_passes().await;
    let email: String = SafeEmail().fake();

    let response = app
        .post_sign_up(&json!({
            "email": email,
            "password": "password123",
            "turnstileToken": "valid-token"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], json!(email));
    assert_eq!(app.turnstile_calls().await, 1);
}

#[tokio::test]
async fn should_forward_client_ip_to_turnstile() {
    let app = TestApp::new().await;
    app.turnstile_passes().await;

    app.http_client
        .post(format!("{}/api/auth/sign-up/email", app.address))
        .header("cf-connecting-ip", "198.51.100.23")
        .json(&json!({ "email": "ip@example.com", "turnstileToken": "tok" }))
        .send()
        .await
        .unwrap();

    let requests = app.turnstile_server.received_requests().await.unwrap();
    let form = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(form.contains("remoteip=198.51.100.23"));
    assert!(form.contains("response=tok"));
}

#[tokio::test]
async fn should_return_400_with_mapped_reason_when_challenge_fails() {
    let app = TestApp::new().await;
    app.turnstile_responds(
        200,
        json!({ "success": false, "error-codes": ["timeout-or-duplicate"] }),
    )
    .await;

    let response = app
        .post_sign_up(&json!({ "email": "a@example.com", "turnstileToken": "reused" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("CHALLENGE_FAILED"));
    assert_eq!(
        body["message"],
        json!("Challenge expired or already used. Please try again.")
    );
}

#[tokio::test]
async fn should_return_503_when_turnstile_is_down() {
    let app = TestApp::new().await;
    app.turnstile_responds(500, json!({ "success": false })).await;

    let response = app
        .post_sign_up(&json!({ "email": "a@example.com", "turnstileToken": "tok" }))
        .await;

    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("VERIFICATION_UNAVAILABLE"));
}

#[tokio::test]
async fn should_return_409_for_gmail_variant_of_existing_account() {
    let app = TestApp::new().await;
    app.turnstile_passes().await;

    let first = app
        .post_sign_up(&json!({ "email": "a.b@gmail.com", "turnstileToken": "t1" }))
        .await;
    assert_eq!(first.status().as_u16(), 200);

    let second = app
        .post_sign_up(&json!({ "email": "ab+x@gmail.com", "turnstileToken": "t2" }))
        .await;

    assert_eq!(second.status().as_u16(), 409);
    let body: Value = second.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "code": "EMAIL_EXISTS",
            "message": "An account with this email already exists"
        })
    );
}

#[tokio::test]
async fn should_allow_configured_cors_origin() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/auth/sign-up/email", app.address),
        )
        .header("origin", ALLOWED_ORIGIN)
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
}
