//! HTTP route handlers.
//!
//! Handlers stay thin: validate input, resolve the session user, delegate to
//! a service, wrap the response in `Json`. All fallible paths return
//! [`crate::error::AppError`].

pub mod assessment;
pub mod assets;
pub mod dashboard;
pub mod valuation;

use axum::Router;

use crate::state::AppState;

/// All API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(valuation::routes())
        .merge(assessment::routes())
        .merge(dashboard::routes())
        .merge(assets::routes())
}
