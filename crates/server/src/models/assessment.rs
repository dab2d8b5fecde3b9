//! Land assessment request and result entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use assetlens_core::{AssessmentRequestId, AssessmentResultId, UserId};

/// A property assessment query, immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub id: AssessmentRequestId,
    pub user_id: Option<UserId>,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an assessment request.
#[derive(Debug, Clone)]
pub struct NewAssessmentRequest {
    pub user_id: Option<UserId>,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,
}

/// The normalized parcel record for a request, 1:1 via `request_id`.
///
/// All fields nullable: parcel providers supply whatever the county recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub id: AssessmentResultId,
    pub request_id: Option<AssessmentRequestId>,
    pub assessed_value: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub land_value: Option<Decimal>,
    pub improvement_value: Option<Decimal>,
    pub property_type: Option<String>,
    /// Lot size normalized to acres.
    pub lot_size_acres: Option<Decimal>,
    pub year_built: Option<i32>,
    pub owner_name: Option<String>,
    /// Assessor parcel number.
    pub apn: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an assessment result.
#[derive(Debug, Clone)]
pub struct NewAssessmentResult {
    pub request_id: Option<AssessmentRequestId>,
    pub assessed_value: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub land_value: Option<Decimal>,
    pub improvement_value: Option<Decimal>,
    pub property_type: Option<String>,
    pub lot_size_acres: Option<Decimal>,
    pub year_built: Option<i32>,
    pub owner_name: Option<String>,
    pub apn: Option<String>,
}
