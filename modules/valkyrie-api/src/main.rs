use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{delete, get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use valkyrie_common::{Config, StoreBackend};
use valkyrie_store::{FileStore, MemoryStore, PgStore, SubmissionStore};

mod auth;
mod rest;
#[cfg(test)]
mod testing;

pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_token: String,
    pub rate_limiter: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("valkyrie_api=info".parse()?))
        .init();

    let config = Config::from_env();

    let store: Arc<dyn SubmissionStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config.database_url).await?;
            store.init_schema().await?;
            Arc::new(store)
        }
        StoreBackend::File => Arc::new(FileStore::new(&config.submissions_file)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!(backend = %config.store_backend, "Submission store ready");

    let state = Arc::new(AppState {
        store,
        admin_email: config.admin_email,
        admin_password: config.admin_password,
        admin_token: config.admin_token,
        rate_limiter: Mutex::new(HashMap::new()),
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Public intake
        .route("/api/waitlist", post(rest::waitlist::api_submit))
        // Admin
        .route("/api/admin/login", post(rest::admin::api_login))
        .route("/api/admin/submissions", get(rest::admin::api_submissions))
        .route(
            "/api/admin/submissions/{id}",
            delete(rest::admin::api_delete_submission),
        )
        .route("/api/admin/export", get(rest::admin::api_export))
        .route("/api/admin/clear", post(rest::admin::api_clear))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Privacy headers: submission data must not land in shared caches
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path + status + latency only (no query params, no IP)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Valkyrie waitlist API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
