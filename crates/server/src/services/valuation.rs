//! Vehicle valuation flow.
//!
//! Persist the request, fetch comparable listings, derive price tiers and the
//! loan analysis, persist the result, assemble the report. The request row is
//! written before the provider call, so a provider failure leaves a request
//! with no result; reads treat that pair state as "unavailable" rather than
//! an error.

use rust_decimal::Decimal;

use assetlens_core::ValuationRequestId;

use crate::config::ValuationPolicy;
use crate::error::{AppError, Result};
use crate::loan;
use crate::models::{NewValuationRequest, NewValuationResult, ValuationRequest};
use crate::normalize::{self, NormalizeError};
use crate::providers::{ProviderError, VehicleMarketClient};
use crate::store::Storage;

use super::reports::VehicleReport;

/// Run the full valuation flow for a submitted vehicle.
///
/// # Errors
///
/// - [`AppError::NoUsableData`] when no comparable listings carry a positive
///   price (including a provider 404 on the search itself);
/// - [`AppError::Provider`] for credential or availability failures;
/// - [`AppError::Storage`] when persistence fails.
#[tracing::instrument(skip_all, fields(make = %new.make, model = %new.model, year = new.year))]
pub async fn run(
    storage: &dyn Storage,
    market: &VehicleMarketClient,
    policy: &ValuationPolicy,
    new: NewValuationRequest,
) -> Result<VehicleReport> {
    let request = storage.create_valuation_request(new).await?;

    let prices = match market
        .comparable_prices(
            &request.make,
            &request.model,
            request.year,
            &request.zip_code,
            request.mileage,
        )
        .await
    {
        Ok(prices) => prices,
        // A search miss means no comparables, which is the user's problem to
        // refine, not an upstream outage.
        Err(ProviderError::NotFound) => Vec::new(),
        Err(err) => return Err(AppError::Provider(err)),
    };

    complete(storage, request, &prices, policy).await
}

/// Derive and persist the result for an already-persisted request.
///
/// When the population yields no tiers, the error propagates before any
/// result row is written: the request stays dangling, and combined views
/// report it as unavailable.
async fn complete(
    storage: &dyn Storage,
    request: ValuationRequest,
    prices: &[Decimal],
    policy: &ValuationPolicy,
) -> Result<VehicleReport> {
    let new_result = build_result(&request.id, prices, policy)?;
    let result = storage.create_valuation_result(new_result).await?;

    tracing::info!(
        request_id = %request.id,
        result_id = %result.id,
        comparables = prices.len(),
        "valuation completed"
    );

    Ok(VehicleReport::assemble(request, result))
}

/// Derive the persisted result fields from a listing population.
///
/// Pure except for the policy input; the service tests exercise this directly.
fn build_result(
    request_id: &ValuationRequestId,
    prices: &[Decimal],
    policy: &ValuationPolicy,
) -> std::result::Result<NewValuationResult, NormalizeError> {
    let tiers = normalize::price_tiers(prices, policy)?;

    let analysis = loan::select_base_value(
        Some(tiers.trade_in),
        Some(tiers.private_party),
        Some(tiers.retail),
    )
    .and_then(|base| loan::compute_loan(base, policy));

    Ok(NewValuationResult {
        request_id: Some(request_id.clone()),
        trade_in_value: Some(tiers.trade_in),
        private_party_value: Some(tiers.private_party),
        retail_value: Some(tiers.retail),
        loan_amount: analysis.as_ref().map(|a| a.loan_amount),
        // Stored in percent for display, matching the estimated rate.
        ltv_ratio: analysis
            .as_ref()
            .map(|_| policy.ltv_ratio * Decimal::ONE_HUNDRED),
        estimated_rate: analysis.as_ref().map(|_| policy.annual_rate_percent),
        monthly_payment: analysis.map(|a| a.monthly_payment),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_build_result_full_pipeline() {
        let id = ValuationRequestId::generate();
        let prices = [dec(10_000), dec(12_000), dec(14_000)];

        let result =
            build_result(&id, &prices, &ValuationPolicy::default()).expect("result");

        assert_eq!(result.trade_in_value, Some(dec(10_200)));
        assert_eq!(result.private_party_value, Some(dec(12_000)));
        assert_eq!(result.retail_value, Some(dec(13_800)));

        // Loan from the trade-in base: 10200 * 0.80.
        assert_eq!(result.loan_amount, Some(dec(8_160)));
        assert_eq!(result.ltv_ratio, Some(dec(80)));
        assert_eq!(result.estimated_rate, Some(Decimal::new(65, 1)));
        assert!(result.monthly_payment.expect("payment") > Decimal::ZERO);
    }

    #[test]
    fn test_build_result_no_comparables() {
        let id = ValuationRequestId::generate();
        let err = build_result(&id, &[], &ValuationPolicy::default()).unwrap_err();
        assert_eq!(err, NormalizeError::NoComparableListings);

        // All-garbage prices are equivalent to an empty population.
        let err = build_result(&id, &[dec(0), dec(-500)], &ValuationPolicy::default())
            .unwrap_err();
        assert_eq!(err, NormalizeError::NoComparableListings);
    }

    #[tokio::test]
    async fn test_empty_population_persists_no_result() {
        let storage = MemoryStorage::new();
        let request = storage
            .create_valuation_request(NewValuationRequest {
                user_id: None,
                make: "Honda".to_owned(),
                model: "Civic".to_owned(),
                year: 2019,
                mileage: 42_000,
                zip_code: "02134".to_owned(),
            })
            .await
            .expect("request");

        let err = complete(&storage, request.clone(), &[], &ValuationPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::NoUsableData(NormalizeError::NoComparableListings)
        ));

        // The request row stays (accepted dangling state); no result exists.
        assert!(
            storage
                .get_valuation_request(&request.id)
                .await
                .expect("lookup")
                .is_some()
        );
        assert!(
            storage
                .get_valuation_result(&request.id)
                .await
                .expect("lookup")
                .is_none()
        );
    }
}
