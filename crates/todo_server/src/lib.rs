//! HTTP endpoint for the todo repository.
//!
//! # Responsibility
//! - Map `/todos` verbs and paths onto `TodoService` calls.
//! - Encode todos and `{"message": ...}` bodies as JSON.
//! - Own process wiring: store selection, seeding, binding, shutdown.

use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, Method},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::{net::TcpListener, signal};
use todo_core::{open_repository, TodoRepository, TodoService};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod routes;

use config::Config;
use error::ServerError;
use routes::{create_todo, delete_todo, get_todo, list_todos, update_todo};

/// Service shared by every handler.
pub type SharedService = Arc<TodoService<Box<dyn TodoRepository>>>;

/// Todos inserted by `--seed` into an empty store.
pub const DEMO_TODOS: &[(&str, bool)] = &[
    ("Learn how the todo API works", true),
    ("Connect a client to the todo API", false),
];

/// Builds the router, mounting `/todos` under `base_path` when it is set.
pub fn app(service: SharedService, base_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    let routes = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .layer(cors)
        .with_state(service);

    let router = match normalize_base_path(base_path) {
        Some(prefix) => Router::new().nest(&prefix, routes),
        None => routes,
    };
    router.layer(middleware::from_fn(log_request))
}

/// Opens the configured store and serves until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let kind = config.store_kind();
    let repo = open_repository(&kind)?;
    let service = TodoService::with_title_policy(repo, config.title_policy());

    if config.seed {
        service.seed_if_empty(DEMO_TODOS.iter().copied())?;
    }

    let router = app(Arc::new(service), &config.base_path);
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(
        "event=server_start module=server status=ok addr={} store={} base_path={}",
        listener.local_addr()?,
        kind.name(),
        normalize_base_path(&config.base_path).unwrap_or_default()
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

/// Returns `/prefix` without a trailing slash, or `None` for the root.
fn normalize_base_path(base_path: &str) -> Option<String> {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown module=server status=ok signal=ctrl_c"),
            Err(err) => {
                warn!("event=shutdown module=server status=error error_code=ctrl_c_handler error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown module=server status=ok signal=terminate");
            }
            Err(err) => {
                warn!("event=shutdown module=server status=error error_code=sigterm_handler error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_base_path;

    #[test]
    fn base_path_is_normalized_to_a_single_leading_slash() {
        assert_eq!(normalize_base_path(""), None);
        assert_eq!(normalize_base_path("/"), None);
        assert_eq!(normalize_base_path("api"), Some("/api".to_string()));
        assert_eq!(normalize_base_path("/api/"), Some("/api".to_string()));
        assert_eq!(normalize_base_path(" /v1/api "), Some("/v1/api".to_string()));
    }
}
