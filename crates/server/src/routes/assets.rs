//! Portfolio asset endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use assetlens_core::AssetRef;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{NewUserAsset, UserAsset};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/assets", get(list).post(create))
}

/// Request body binding an existing valuation or assessment to the user.
#[derive(Debug, Deserialize)]
pub struct CreateAssetForm {
    /// "vehicle" or "property".
    pub kind: String,
    /// The request id the asset points at.
    pub asset_id: String,
    pub custom_name: Option<String>,
}

/// `GET /api/assets` - the session user's saved assets, oldest first.
#[tracing::instrument(skip(app, user), fields(user_id = %user.0))]
async fn list(State(app): State<AppState>, user: CurrentUser) -> Result<Json<Vec<UserAsset>>> {
    let assets = app.storage().list_user_assets(&user.0).await?;
    Ok(Json(assets))
}

/// `POST /api/assets` - save an asset to the session user's portfolio.
#[tracing::instrument(skip(app, user, form), fields(user_id = %user.0))]
async fn create(
    State(app): State<AppState>,
    user: CurrentUser,
    Json(form): Json<CreateAssetForm>,
) -> Result<Json<UserAsset>> {
    if form.asset_id.trim().is_empty() {
        return Err(AppError::BadRequest("asset_id is required".to_owned()));
    }

    let asset = AssetRef::from_parts(&form.kind, form.asset_id.trim())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let created = app
        .storage()
        .create_user_asset(NewUserAsset {
            user_id: user.0,
            asset,
            custom_name: form
                .custom_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_owned),
        })
        .await?;

    Ok(Json(created))
}
