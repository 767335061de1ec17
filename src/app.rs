//! Application assembly: store from config, router with middleware, and the serve loop.

use crate::config::{ServerConfig, StoreBackend};
use crate::error::{internal_error_response, ConfigError, StoreError};
use crate::routes::{common_routes, dog_routes, openapi_routes};
use crate::state::AppState;
use crate::store::{ensure_database_exists, ensure_dogs_table, MemoryDogStore, PgDogStore};
use axum::response::Response;
use axum::Router;
use std::any::Any;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Request bodies above this size are rejected with 413.
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the configured store. For postgres this creates the database and `dogs` table if needed.
pub async fn build_state(config: &ServerConfig) -> Result<AppState, StartupError> {
    match config.store {
        StoreBackend::Memory => {
            tracing::info!("using in-memory dog store");
            Ok(AppState::new(MemoryDogStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::MissingDatabaseUrl)?;
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await
                .map_err(StoreError::from)?;
            ensure_dogs_table(&pool).await?;
            tracing::info!(max_connections = config.max_connections, "connected to postgres");
            Ok(AppState::new(PgDogStore::new(pool)))
        }
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "handler panicked");
    internal_error_response()
}

/// Full router: common, dog and OpenAPI routes behind request-id, tracing, panic and body-limit layers.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .merge(dog_routes(state))
        .merge(openapi_routes())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Bind `config.bind_addr()` and serve until ctrl-c.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), StartupError> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;
    tracing::info!(environment = ?config.environment, "server ready at http://{}", addr);
    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
