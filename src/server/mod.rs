//! HTTP server: shared state, router and startup.
//!
//! Database work runs on blocking threads holding the shared connection; see
//! [`AppState::with_context`].

pub mod assets;
pub mod error;
pub mod pages;
pub mod routes;
pub mod session;

use anyhow::{anyhow, Context as _, Result};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::config::ThingsConfig;
use crate::db;
use crate::handler::{Context, Handlers, Reminders};
use error::AppError;
use session::Session;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    handlers: Arc<Handlers>,
    reminders: Arc<Reminders>,
    static_dir: Arc<PathBuf>,
    limit: usize,
}

impl AppState {
    pub fn new(conn: Connection, config: &ThingsConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            handlers: Arc::new(Handlers::standard()),
            reminders: Arc::new(Reminders::new()),
            static_dir: Arc::new(config.resolved_static_dir()),
            limit: config.storage.default_limit,
        }
    }

    /// Run `f` on a blocking thread with the database locked, after checking
    /// the session's namespace token.
    pub async fn with_context<T, F>(&self, session: &Session, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Context<'_>) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        let session = session.clone();
        tokio::task::spawn_blocking(move || {
            let conn = state.db.lock().unwrap_or_else(|poisoned| {
                tracing::warn!("recovering poisoned db lock");
                poisoned.into_inner()
            });
            session.authorize(&conn)?;

            let ctx = Context {
                conn: &conn,
                namespace: &session.namespace,
                handlers: &state.handlers,
                reminders: &state.reminders,
                limit: state.limit,
            };
            f(&ctx)
        })
        .await
        .map_err(|e| anyhow!("db task failed: {e}"))?
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/thing", post(routes::thing))
        .route("/tag/{tag}", get(routes::tag))
        .route("/static/{file}", get(routes::static_file))
        .route("/{namespace}/{kind}/{id}", post(routes::toggle))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Open the database and serve until ctrl-c.
pub async fn serve(config: ThingsConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let addr = config.server.addr.clone();
    let state = AppState::new(conn, &config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn poisoned_lock_does_not_block_later_requests() {
        let state = AppState::new(db::open_memory_database().unwrap(), &ThingsConfig::default());
        let db = state.db.clone();
        let _ = std::thread::spawn(move || {
            let _guard = db.lock().unwrap();
            panic!("request failed while holding the connection");
        })
        .join();
        assert!(state.db.is_poisoned());

        let session = Session {
            namespace: "alice".into(),
            token: None,
            fresh: false,
        };
        let namespace = state
            .with_context(&session, |ctx| Ok(ctx.namespace.to_string()))
            .await
            .unwrap();
        assert_eq!(namespace, "alice");
    }
}
