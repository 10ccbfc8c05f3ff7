//! JSON-over-HTTP surface. Every `/api` route authenticates through the
//! [`Session`] extractor before touching storage.

mod handlers;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::routing::{delete, get};
use axum::{async_trait, Router};
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::trace::TraceLayer;

use crate::auth::{JwtVerifier, Session};
use crate::db::Database;
use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub(crate) struct AppState {
    db: Arc<Mutex<Database>>,
    verifier: Arc<JwtVerifier>,
}

impl AppState {
    pub(crate) fn new(db: Database, verifier: JwtVerifier) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            verifier: Arc::new(verifier),
        }
    }

    /// Run `op` on the blocking pool with the database locked for exactly
    /// its duration. A lock poisoned by a panicking request is taken over;
    /// SQLite transactions keep the stored rows consistent.
    async fn with_db<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&mut Database) -> ApiResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut guard = db.lock().unwrap_or_else(PoisonError::into_inner);
            op(&mut guard)
        })
        .await
        .map_err(|e| ApiError::Storage(anyhow::anyhow!("database task failed: {e}")))?
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| ApiError::InvalidCredential)?),
            None => None,
        };
        state.verifier.verify(header)
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "Backend is running" }))
        .route(
            "/api/budgets",
            get(handlers::list_budgets).post(handlers::upsert_budget),
        )
        .route(
            "/api/budgets/:category",
            get(handlers::budget_status).delete(handlers::delete_budget),
        )
        .route("/api/summary", get(handlers::summary))
        .route(
            "/api/expenses",
            get(handlers::list_expenses).post(handlers::add_expense),
        )
        .route("/api/expenses/:id", delete(handlers::delete_expense))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
