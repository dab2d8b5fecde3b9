//! Land assessment flow.
//!
//! Persist the request, look up the parcel record (primary query plus one
//! abbreviated-suffix alternate inside the client), normalize the county
//! fields, persist the result, assemble the report. As with valuations, the
//! request row exists before the provider call; a lookup failure leaves it
//! result-less and reads report it as unavailable.

use crate::config::ValuationPolicy;
use crate::error::Result;
use crate::models::{NewAssessmentRequest, NewAssessmentResult};
use crate::normalize;
use crate::providers::ParcelClient;
use crate::store::Storage;

use super::reports::PropertyReport;

/// Run the full assessment flow for a submitted address.
///
/// # Errors
///
/// - [`crate::error::AppError::Provider`] when no parcel matches either query
///   or the provider is down;
/// - [`crate::error::AppError::NoUsableData`] when a parcel matches but every
///   value field is zero or absent;
/// - [`crate::error::AppError::Storage`] when persistence fails.
#[tracing::instrument(skip_all, fields(city = %new.city, state = %new.state))]
pub async fn run(
    storage: &dyn Storage,
    parcel: &ParcelClient,
    policy: &ValuationPolicy,
    new: NewAssessmentRequest,
) -> Result<PropertyReport> {
    let request = storage.create_assessment_request(new).await?;

    let record = parcel
        .find_parcel(
            &request.street_address,
            &request.city,
            &request.state,
            request.zip_code.as_deref(),
        )
        .await?;

    let normalized = normalize::normalize_parcel(&record, policy)?;

    let result = storage
        .create_assessment_result(NewAssessmentResult {
            request_id: Some(request.id.clone()),
            assessed_value: normalized.assessed_value,
            market_value: normalized.market_value,
            land_value: normalized.land_value,
            improvement_value: normalized.improvement_value,
            property_type: Some(normalized.property_type),
            lot_size_acres: normalized.lot_size_acres,
            year_built: normalized.year_built,
            owner_name: normalized.owner_name,
            apn: normalized.apn,
        })
        .await?;

    tracing::info!(
        request_id = %request.id,
        result_id = %result.id,
        "assessment completed"
    );

    Ok(PropertyReport::assemble(request, result))
}
