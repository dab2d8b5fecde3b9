//! Land assessment endpoints.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use assetlens_core::AssessmentRequestId;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::NewAssessmentRequest;
use crate::services::assessment;
use crate::services::reports::{self, PropertyReport};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/land-assessment", post(create))
        .route("/api/land-assessment/{id}", get(show))
}

/// Submitted land assessment form. The address arrives already parsed into
/// components; geocoding happens client-side.
#[derive(Debug, Deserialize)]
pub struct AssessmentForm {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,
}

impl AssessmentForm {
    fn validate(&self) -> Result<()> {
        if self.street_address.trim().is_empty() {
            return Err(AppError::BadRequest("street address is required".to_owned()));
        }
        if self.city.trim().is_empty() {
            return Err(AppError::BadRequest("city is required".to_owned()));
        }
        if self.state.trim().is_empty() {
            return Err(AppError::BadRequest("state is required".to_owned()));
        }
        Ok(())
    }
}

/// `POST /api/land-assessment` - run an assessment for the submitted address.
#[tracing::instrument(skip(app, user, form), fields(user_id = %user.0))]
async fn create(
    State(app): State<AppState>,
    user: CurrentUser,
    Json(form): Json<AssessmentForm>,
) -> Result<Json<PropertyReport>> {
    form.validate()?;

    let report = assessment::run(
        app.storage(),
        app.parcel(),
        &app.config().policy,
        NewAssessmentRequest {
            user_id: Some(user.0),
            street_address: form.street_address.trim().to_owned(),
            city: form.city.trim().to_owned(),
            state: form.state.trim().to_owned(),
            zip_code: form
                .zip_code
                .as_deref()
                .map(str::trim)
                .filter(|z| !z.is_empty())
                .map(str::to_owned),
        },
    )
    .await?;

    Ok(Json(report))
}

/// `GET /api/land-assessment/{id}` - the combined request/result view.
#[tracing::instrument(skip(app))]
async fn show(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyReport>> {
    let id = AssessmentRequestId::new(id);
    let report = reports::property_report(app.storage(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("assessment {id} is not available")))?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AssessmentForm {
        AssessmentForm {
            street_address: "701 Elm Street".to_owned(),
            city: "Austin".to_owned(),
            state: "TX".to_owned(),
            zip_code: Some("78701".to_owned()),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_missing_components_rejected() {
        let mut bad = form();
        bad.street_address = String::new();
        assert!(bad.validate().is_err());

        let mut bad = form();
        bad.city = "  ".to_owned();
        assert!(bad.validate().is_err());

        let mut bad = form();
        bad.state = String::new();
        assert!(bad.validate().is_err());

        // ZIP is optional.
        let mut ok = form();
        ok.zip_code = None;
        assert!(ok.validate().is_ok());
    }
}
