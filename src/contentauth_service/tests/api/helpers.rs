use std::sync::Arc;
use std::time::Duration;

use axum::{
    Extension, Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use contentauth_adapters::{
    challenge::TurnstileVerifier,
    config::{AllowedOrigins, test},
    persistence::HashMapUserStore,
};
use contentauth_core::HookUser;
use contentauth_service::{AuthService, ContentAuthHooks};
use reqwest::Client;
use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ALLOWED_ORIGIN: &str = "https://app.example.com";

pub struct TestApp {
    pub address: String,
    pub http_client: Client,
    pub user_store: HashMapUserStore,
    pub turnstile_server: MockServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let turnstile_server = MockServer::start().await;
        let user_store = HashMapUserStore::new();

        let verifier = TurnstileVerifier::new(
            turnstile_server.uri(),
            Secret::new("test-secret".to_string()),
            Client::builder()
                .timeout(test::turnstile::TIMEOUT)
                .build()
                .unwrap(),
        );
        let hooks = ContentAuthHooks::new(
            Arc::new(user_store.clone()),
            Some(Arc::new(verifier)),
            true,
        );

        let service = AuthService::new(host_router(user_store.clone()), hooks);

        let listener = TcpListener::bind(test::APP_ADDRESS).await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        let origins = AllowedOrigins::new(vec![ALLOWED_ORIGIN.to_string()]);

        tokio::spawn(async move {
            service
                .run_standalone(listener, Some(origins))
                .await
                .unwrap();
        });

        let http_client = Client::builder()
            .timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            address,
            http_client,
            user_store,
            turnstile_server,
        }
    }

    pub async fn post_sign_up(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/api/auth/sign-up/email", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_callback(&self, provider: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/api/auth/callback/{provider}", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn turnstile_responds(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/turnstile/v0/siteverify"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.turnstile_server)
            .await;
    }

    pub async fn turnstile_passes(&self) {
        self.turnstile_responds(200, json!({ "success": true, "hostname": "localhost" }))
            .await;
    }

    pub async fn turnstile_calls(&self) -> usize {
        self.turnstile_server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

/// Stand-in for the authentication framework: creates users on sign-up and
/// links existing users on OAuth callbacks, answering those with a redirect.
fn host_router(user_store: HashMapUserStore) -> Router {
    Router::new()
        .route("/sign-up/email", post(sign_up))
        .route("/callback/{provider}", post(callback))
        .with_state(user_store)
}

async fn sign_up(State(store): State<HashMapUserStore>, Json(body): Json<Value>) -> Json<Value> {
    let id = uuid::Uuid::new_v4().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    store.add_user(&id, &email).await;

    Json(json!({
        "token": "session-token",
        "user": { "id": id, "email": email, "emailVerified": false }
    }))
}

async fn callback(
    State(store): State<HashMapUserStore>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let id = body["id"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if store.email(&id).await.is_none() {
        store.add_user(&id, &email).await;
    }

    (
        StatusCode::FOUND,
        [(header::LOCATION, "/dashboard")],
        Extension(HookUser::new(id, email)),
        (),
    )
}
