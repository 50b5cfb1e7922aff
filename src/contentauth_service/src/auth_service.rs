use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, request},
    middleware::from_fn_with_state,
};
use contentauth_adapters::{
    challenge::TurnstileVerifier,
    config::{AUTH_BASE_PATH, AllowedOrigins, Settings},
    persistence::{HashMapUserStore, PostgresNormalizedEmailStore, apply_schema},
};
use contentauth_application::ContentAuthHooks;
use contentauth_axum::auth_hooks;
use contentauth_core::{AfterHook, BeforeHook, ChallengeVerifier, NormalizedEmailStore};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::error::AuthServiceError;
use crate::helpers::{configure_postgresql, resolve_schema};
use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// The host's auth routes mounted under `/api/auth` behind the hook pipeline
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Wrap the host's auth router with the given hooks
    ///
    /// # Arguments
    /// * `host_router` - Routes of the authentication framework, relative to `/api/auth`
    /// * `hooks` - Hook pipeline run around every request to those routes
    pub fn new<H>(host_router: Router, hooks: H) -> Self
    where
        H: BeforeHook + AfterHook + 'static,
    {
        let host_router =
            host_router.layer(from_fn_with_state(Arc::new(hooks), auth_hooks::<H>));

        Self {
            router: Router::new().nest(AUTH_BASE_PATH, host_router),
        }
    }

    /// Wire the hooks from settings
    ///
    /// Connects to Postgres, remaps the configured schema (creating missing
    /// tables when `postgres.apply_schema` is set) and enables challenge
    /// verification only when a Turnstile secret is configured.
    #[tracing::instrument(name = "AuthService::from_settings", skip_all)]
    pub async fn from_settings(
        settings: &Settings,
        host_router: Router,
    ) -> Result<Self, AuthServiceError> {
        let pool = configure_postgresql(settings).await?;
        let schema = resolve_schema(settings)?;

        if settings.postgres.apply_schema {
            apply_schema(&pool, &schema).await?;
        }

        let store: Arc<dyn NormalizedEmailStore> = match schema.user_table_binding() {
            Some(binding) => Arc::new(PostgresNormalizedEmailStore::new(pool, &binding)),
            // Normalization is disabled, so the store is never queried.
            None => Arc::new(HashMapUserStore::new()),
        };

        let verifier: Option<Arc<dyn ChallengeVerifier>> = if settings.turnstile.is_enabled() {
            let http_client = reqwest::Client::builder()
                .timeout(settings.turnstile.timeout())
                .build()?;

            Some(Arc::new(TurnstileVerifier::new(
                settings.turnstile.base_url.clone(),
                settings.turnstile.secret_key.clone(),
                http_client,
            )))
        } else {
            tracing::warn!("[ContentAuth] No Turnstile secret configured, challenge checks disabled");
            None
        };

        let hooks = ContentAuthHooks::new(store, verifier, settings.normalization.enabled);

        Ok(Self::new(host_router, hooks))
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the AuthService into a router that can be merged into another application
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        origin
                            .to_str()
                            .is_ok_and(|origin| allowed_origins.contains(origin))
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the auth service as a standalone server
    ///
    /// # Arguments
    /// * `listener` - TCP listener to bind the server to
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
