//! Vehicle valuation endpoints.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use assetlens_core::ValuationRequestId;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::NewValuationRequest;
use crate::services::reports::{self, VehicleReport};
use crate::services::valuation;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/valuation", post(create))
        .route("/api/valuation/{id}", get(show))
}

/// Submitted vehicle valuation form.
#[derive(Debug, Deserialize)]
pub struct ValuationForm {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i64,
    pub zip_code: String,
}

impl ValuationForm {
    /// Plausibility checks; these reject obvious garbage, not edge cases the
    /// provider can answer.
    fn validate(&self) -> Result<()> {
        if self.make.trim().is_empty() {
            return Err(AppError::BadRequest("make is required".to_owned()));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::BadRequest("model is required".to_owned()));
        }
        if self.year <= 0 {
            return Err(AppError::BadRequest("year must be positive".to_owned()));
        }
        if self.mileage < 0 {
            return Err(AppError::BadRequest("mileage cannot be negative".to_owned()));
        }
        if self.zip_code.trim().is_empty() {
            return Err(AppError::BadRequest("ZIP code is required".to_owned()));
        }
        Ok(())
    }
}

/// `POST /api/valuation` - run a valuation for the submitted vehicle.
#[tracing::instrument(skip(state, user, form), fields(user_id = %user.0))]
async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<ValuationForm>,
) -> Result<Json<VehicleReport>> {
    form.validate()?;

    let report = valuation::run(
        state.storage(),
        state.vehicle_market(),
        &state.config().policy,
        NewValuationRequest {
            user_id: Some(user.0),
            make: form.make.trim().to_owned(),
            model: form.model.trim().to_owned(),
            year: form.year,
            mileage: form.mileage,
            zip_code: form.zip_code.trim().to_owned(),
        },
    )
    .await?;

    Ok(Json(report))
}

/// `GET /api/valuation/{id}` - the combined request/result view.
#[tracing::instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleReport>> {
    let id = ValuationRequestId::new(id);
    let report = reports::vehicle_report(state.storage(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("valuation {id} is not available")))?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ValuationForm {
        ValuationForm {
            make: "Honda".to_owned(),
            model: "Civic".to_owned(),
            year: 2019,
            mileage: 42_000,
            zip_code: "02134".to_owned(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_implausible_fields_rejected() {
        let mut bad = form();
        bad.year = 0;
        assert!(bad.validate().is_err());

        let mut bad = form();
        bad.mileage = -1;
        assert!(bad.validate().is_err());

        let mut bad = form();
        bad.make = "   ".to_owned();
        assert!(bad.validate().is_err());

        let mut bad = form();
        bad.zip_code = String::new();
        assert!(bad.validate().is_err());
    }
}
