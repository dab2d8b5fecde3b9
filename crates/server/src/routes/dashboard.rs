//! Portfolio dashboard endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::services::dashboard::{self, DashboardView};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(show))
}

/// `GET /api/dashboard` - the aggregated portfolio for the session user.
#[tracing::instrument(skip(app, user), fields(user_id = %user.0))]
async fn show(State(app): State<AppState>, user: CurrentUser) -> Result<Json<DashboardView>> {
    let view = dashboard::build(app.storage(), &user.0).await?;
    Ok(Json(view))
}
