//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for the fee catalog, fee transactions and payments
//! - The JSON error contract shared by all routes
//! - Request extractors

pub mod error;
pub mod extract;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bursar_db::PgUnitOfWork;
use bursar_shared::LedgerConfig;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Ledger settings (lock timeout, over-payment policy).
    pub ledger: LedgerConfig,
}

impl AppState {
    /// Creates the state.
    pub fn new(db: DatabaseConnection, ledger: LedgerConfig) -> Self {
        Self {
            db: Arc::new(db),
            ledger,
        }
    }

    /// Unit of work factory for the ledger services.
    #[must_use]
    pub fn unit_of_work(&self) -> PgUnitOfWork {
        PgUnitOfWork::new((*self.db).clone(), self.ledger.lock_timeout_ms)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
