//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod fee_structures;
pub mod fee_transactions;
pub mod fee_types;
pub mod health;
pub mod payments;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(fee_types::routes())
        .merge(fee_structures::routes())
        .merge(fee_transactions::routes())
        .merge(payments::routes())
}
