//! Vehicle valuation request and result entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use assetlens_core::{UserId, ValuationRequestId, ValuationResultId};

/// A vehicle valuation query, immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationRequest {
    pub id: ValuationRequestId,
    pub user_id: Option<UserId>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i64,
    /// Kept as a string: ZIP codes may carry leading zeros.
    pub zip_code: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a valuation request.
#[derive(Debug, Clone)]
pub struct NewValuationRequest {
    pub user_id: Option<UserId>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i64,
    pub zip_code: String,
}

/// The computed valuation for a request, 1:1 via `request_id`.
///
/// Every value is nullable: the provider may supply partial data, and the
/// join to the request is not strictly guaranteed (lookups must handle
/// absence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub id: ValuationResultId,
    pub request_id: Option<ValuationRequestId>,
    pub trade_in_value: Option<Decimal>,
    pub private_party_value: Option<Decimal>,
    pub retail_value: Option<Decimal>,
    pub loan_amount: Option<Decimal>,
    /// Loan-to-value ratio, stored in percent (e.g., 80.00).
    pub ltv_ratio: Option<Decimal>,
    pub estimated_rate: Option<Decimal>,
    pub monthly_payment: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a valuation result.
#[derive(Debug, Clone)]
pub struct NewValuationResult {
    pub request_id: Option<ValuationRequestId>,
    pub trade_in_value: Option<Decimal>,
    pub private_party_value: Option<Decimal>,
    pub retail_value: Option<Decimal>,
    pub loan_amount: Option<Decimal>,
    pub ltv_ratio: Option<Decimal>,
    pub estimated_rate: Option<Decimal>,
    pub monthly_payment: Option<Decimal>,
}
