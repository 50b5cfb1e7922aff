use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn should_store_normalized_email_after_sign_up() {
    let app = TestApp::new().await;
    app.turnstile_passes().await;

    let response = app
        .post_sign_up(&json!({
            "email": "John.Doe+news@GoogleMail.com",
            "turnstileToken": "tok"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let id = body["user"]["id"].as_str().unwrap();

    assert_eq!(
        app.user_store.normalized_email(id).await.as_deref(),
        Some("johndoe@gmail.com")
    );
    assert_eq!(
        app.user_store.email(id).await.as_deref(),
        Some("John.Doe+news@GoogleMail.com")
    );
}

#[tokio::test]
async fn should_store_normalized_email_after_oauth_callback() {
    let app = TestApp::new().await;

    let response = app
        .post_callback(
            "google",
            &json!({ "id": "oauth-user", "email": "Jane.Smith@gmail.com" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/dashboard")
    );
    assert_eq!(
        app.user_store.normalized_email("oauth-user").await.as_deref(),
        Some("janesmith@gmail.com")
    );
    assert_eq!(app.turnstile_calls().await, 0);
}

#[tokio::test]
async fn should_block_email_sign_up_after_oauth_account_exists() {
    let app = TestApp::new().await;
    app.turnstile_passes().await;

    app.post_callback(
        "github",
        &json!({ "id": "gh-user", "email": "dev.person@gmail.com" }),
    )
    .await;

    let response = app
        .post_sign_up(&json!({ "email": "devperson+work@gmail.com", "turnstileToken": "tok" }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
}
