use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, SecurityConfig};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::AppState;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config.security);

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .fallback(not_found)
        .layer(middleware::map_response(method_not_allowed))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root::root))
        .route("/login", post(public::login::login))
        .route("/users", post(public::register::register))
        .route("/hospitals/health", get(public::health::hospital_health))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/cm-users", get(protected::doctors::list).post(protected::doctors::create))
        .route("/cm-users/:id", put(protected::doctors::update))
        .route("/hospitals", get(protected::hospitals::list).post(protected::hospitals::create))
        .route("/hospitals/:hospcode", put(protected::hospitals::update))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {} not found", uri.path()))
}

/// Rewrap the router's bare 405 in the error envelope, keeping its `Allow` header.
async fn method_not_allowed(method: Method, uri: Uri, response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewrapped =
        ApiError::method_not_allowed(format!("Method {} not allowed on {}", method, uri.path())).into_response();
    if let Some(allow) = allow {
        rewrapped.headers_mut().insert(header::ALLOW, allow);
    }
    rewrapped
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Validate configuration, build the pool, and serve until Ctrl-C.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;
    if config.uses_development_secret() {
        warn!("JWT_SECRET not set; using the development signing secret");
    }

    let pool = DatabaseManager::connect_lazy(&config.database)?;
    DatabaseManager::probe(&pool).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));
    let state = AppState::new(config, pool)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("cm-api listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
