//! Combined report views: a request joined with its result, plus the display
//! strings the client renders verbatim.
//!
//! A request without a persisted result reads as "not available yet", so the
//! builders return `Option` rather than an error.

use chrono::{DateTime, Utc};
use serde::Serialize;

use assetlens_core::{AssessmentRequestId, ValuationRequestId};

use crate::models::{AssessmentRequest, AssessmentResult, ValuationRequest, ValuationResult};
use crate::store::{Storage, StorageError};

/// Human-readable facts about the vehicle being valued.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleSummary {
    /// e.g. "2019 Honda Civic"
    pub summary: String,
    /// e.g. "42,000 miles"
    pub mileage: String,
    /// e.g. "ZIP 02134"
    pub location: String,
}

/// Human-readable facts about the property being assessed.
#[derive(Debug, Clone, Serialize)]
pub struct PropertySummary {
    pub address: String,
    /// e.g. "Austin, TX"
    pub location: String,
}

/// Report metadata shared by both views.
#[derive(Debug, Clone, Serialize)]
pub struct ReportInfo {
    /// e.g. "Aug 29, 2026"
    pub date: String,
}

/// The full vehicle valuation view.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleReport {
    pub request: ValuationRequest,
    pub result: ValuationResult,
    pub vehicle: VehicleSummary,
    pub report: ReportInfo,
}

/// The full property assessment view.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    pub request: AssessmentRequest,
    pub result: AssessmentResult,
    pub property: PropertySummary,
    pub report: ReportInfo,
}

impl VehicleReport {
    /// Assemble the view from an already-loaded pair.
    #[must_use]
    pub fn assemble(request: ValuationRequest, result: ValuationResult) -> Self {
        let vehicle = VehicleSummary {
            summary: format!("{} {} {}", request.year, request.make, request.model),
            mileage: format!("{} miles", group_thousands(request.mileage)),
            location: format!("ZIP {}", request.zip_code),
        };
        let report = ReportInfo {
            date: format_report_date(result.created_at),
        };
        Self {
            request,
            result,
            vehicle,
            report,
        }
    }
}

impl PropertyReport {
    /// Assemble the view from an already-loaded pair.
    #[must_use]
    pub fn assemble(request: AssessmentRequest, result: AssessmentResult) -> Self {
        let property = PropertySummary {
            address: request.street_address.clone(),
            location: format!("{}, {}", request.city, request.state),
        };
        let report = ReportInfo {
            date: format_report_date(result.created_at),
        };
        Self {
            request,
            result,
            property,
            report,
        }
    }
}

/// Load the combined vehicle view, `None` when the request or its result is
/// missing.
///
/// # Errors
///
/// Propagates storage failures.
pub async fn vehicle_report(
    storage: &dyn Storage,
    id: &ValuationRequestId,
) -> Result<Option<VehicleReport>, StorageError> {
    let Some(request) = storage.get_valuation_request(id).await? else {
        return Ok(None);
    };
    let Some(result) = storage.get_valuation_result(id).await? else {
        return Ok(None);
    };
    Ok(Some(VehicleReport::assemble(request, result)))
}

/// Load the combined property view, `None` when the request or its result is
/// missing.
///
/// # Errors
///
/// Propagates storage failures.
pub async fn property_report(
    storage: &dyn Storage,
    id: &AssessmentRequestId,
) -> Result<Option<PropertyReport>, StorageError> {
    let Some(request) = storage.get_assessment_request(id).await? else {
        return Ok(None);
    };
    let Some(result) = storage.get_assessment_result(id).await? else {
        return Ok(None);
    };
    Ok(Some(PropertyReport::assemble(request, result)))
}

/// Report date, e.g. "Aug 29, 2026".
fn format_report_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// Group an integer with thousands separators, e.g. 42000 -> "42,000".
fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
