//! Portfolio dashboard aggregation.
//!
//! Walks the user's saved assets in insertion order and joins each one to its
//! request/result pair. The dashboard must render whatever it can: an asset
//! whose request was never completed (or whose reference dangles) is skipped
//! with a warning, never an error. Vehicle assets are valued at the
//! private-party tier, property assets at the market value.

use rust_decimal::Decimal;
use serde::Serialize;

use assetlens_core::{AssetKind, AssetRef, UserId, format_usd, parse_usd};

use crate::error::Result;
use crate::models::{User, UserAsset};
use crate::store::Storage;

/// One portfolio row, display-ready.
#[derive(Debug, Clone, Serialize)]
pub struct AssetSummary {
    pub id: String,
    pub kind: AssetKind,
    /// Custom name when the user set one, otherwise a derived description.
    pub name: String,
    /// Secondary line, e.g. "42,000 miles" or "Austin, TX".
    pub summary: String,
    /// Formatted USD, e.g. "$12,000".
    pub value: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The aggregated portfolio view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub user: Option<User>,
    pub assets: Vec<AssetSummary>,
    /// Formatted USD total across all listed assets.
    pub total_value: String,
    pub vehicle_count: usize,
    pub property_count: usize,
}

/// Build the dashboard for a user.
///
/// # Errors
///
/// Propagates storage failures only; per-asset problems are logged and the
/// asset skipped.
#[tracing::instrument(skip(storage), fields(user_id = %user_id))]
pub async fn build(storage: &dyn Storage, user_id: &UserId) -> Result<DashboardView> {
    let user = storage.get_user(user_id).await?;
    let assets = storage.list_user_assets(user_id).await?;

    let mut summaries = Vec::with_capacity(assets.len());
    for asset in assets {
        match summarize(storage, &asset).await? {
            Some(summary) => summaries.push(summary),
            None => {
                tracing::warn!(
                    asset_id = %asset.id,
                    kind = asset.asset.kind().as_str(),
                    target = asset.asset.id_str(),
                    "skipping asset with missing or incomplete valuation data"
                );
            }
        }
    }

    let mut total = Decimal::ZERO;
    for summary in &summaries {
        // Values were formatted above, so a parse failure here means the
        // formatting and parsing helpers have drifted apart.
        match parse_usd(&summary.value) {
            Some(value) => total += value,
            None => {
                tracing::warn!(
                    asset_id = %summary.id,
                    value = %summary.value,
                    "unparseable asset value, counting as zero"
                );
            }
        }
    }

    let vehicle_count = summaries
        .iter()
        .filter(|s| s.kind == AssetKind::Vehicle)
        .count();
    let property_count = summaries.len() - vehicle_count;

    Ok(DashboardView {
        user,
        assets: summaries,
        total_value: format_usd(total),
        vehicle_count,
        property_count,
    })
}

/// Join one asset to its valuation data. `Ok(None)` when the referenced
/// request or result is missing, or carries no usable value.
async fn summarize(
    storage: &dyn Storage,
    asset: &UserAsset,
) -> Result<Option<AssetSummary>> {
    let summary = match &asset.asset {
        AssetRef::Vehicle(request_id) => {
            let Some(request) = storage.get_valuation_request(request_id).await? else {
                return Ok(None);
            };
            let Some(result) = storage.get_valuation_result(request_id).await? else {
                return Ok(None);
            };
            let Some(value) = result.private_party_value else {
                return Ok(None);
            };

            let description = format!("{} {} {}", request.year, request.make, request.model);
            AssetSummary {
                id: asset.id.as_str().to_owned(),
                kind: AssetKind::Vehicle,
                name: asset.custom_name.clone().unwrap_or_else(|| description.clone()),
                summary: description,
                value: format_usd(value),
                created_at: asset.created_at,
            }
        }
        AssetRef::Property(request_id) => {
            let Some(request) = storage.get_assessment_request(request_id).await? else {
                return Ok(None);
            };
            let Some(result) = storage.get_assessment_result(request_id).await? else {
                return Ok(None);
            };
            let Some(value) = result.market_value else {
                return Ok(None);
            };

            AssetSummary {
                id: asset.id.as_str().to_owned(),
                kind: AssetKind::Property,
                name: asset
                    .custom_name
                    .clone()
                    .unwrap_or_else(|| request.street_address.clone()),
                summary: format!("{}, {}", request.city, request.state),
                value: format_usd(value),
                created_at: asset.created_at,
            }
        }
    };

    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetlens_core::ValuationRequestId;
    use crate::models::{
        NewAssessmentRequest, NewAssessmentResult, NewUserAsset, NewValuationRequest,
        NewValuationResult,
    };
    use crate::store::MemoryStorage;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    async fn seed_vehicle(
        storage: &MemoryStorage,
        user_id: &UserId,
        private_party: Option<Decimal>,
        custom_name: Option<&str>,
    ) {
        let request = storage
            .create_valuation_request(NewValuationRequest {
                user_id: Some(user_id.clone()),
                make: "Honda".to_owned(),
                model: "Civic".to_owned(),
                year: 2019,
                mileage: 42_000,
                zip_code: "02134".to_owned(),
            })
            .await
            .expect("request");
        storage
            .create_valuation_result(NewValuationResult {
                request_id: Some(request.id.clone()),
                trade_in_value: None,
                private_party_value: private_party,
                retail_value: None,
                loan_amount: None,
                ltv_ratio: None,
                estimated_rate: None,
                monthly_payment: None,
            })
            .await
            .expect("result");
        storage
            .create_user_asset(NewUserAsset {
                user_id: user_id.clone(),
                asset: AssetRef::Vehicle(request.id),
                custom_name: custom_name.map(str::to_owned),
            })
            .await
            .expect("asset");
    }

    async fn seed_property(
        storage: &MemoryStorage,
        user_id: &UserId,
        market_value: Option<Decimal>,
    ) {
        let request = storage
            .create_assessment_request(NewAssessmentRequest {
                user_id: Some(user_id.clone()),
                street_address: "701 Elm Street".to_owned(),
                city: "Austin".to_owned(),
                state: "TX".to_owned(),
                zip_code: Some("78701".to_owned()),
            })
            .await
            .expect("request");
        storage
            .create_assessment_result(NewAssessmentResult {
                request_id: Some(request.id.clone()),
                assessed_value: None,
                market_value,
                land_value: None,
                improvement_value: None,
                property_type: None,
                lot_size_acres: None,
                year_built: None,
                owner_name: None,
                apn: None,
            })
            .await
            .expect("result");
        storage
            .create_user_asset(NewUserAsset {
                user_id: user_id.clone(),
                asset: AssetRef::Property(request.id),
                custom_name: None,
            })
            .await
            .expect("asset");
    }

    #[tokio::test]
    async fn test_totals_and_counts() {
        let storage = MemoryStorage::new();
        let user_id = UserId::temp();

        seed_vehicle(&storage, &user_id, Some(dec(12_000)), Some("Daily driver")).await;
        seed_property(&storage, &user_id, Some(dec(275_000))).await;

        let view = build(&storage, &user_id).await.expect("dashboard");

        assert_eq!(view.assets.len(), 2);
        assert_eq!(view.vehicle_count, 1);
        assert_eq!(view.property_count, 1);
        assert_eq!(view.total_value, "$287,000");

        assert_eq!(view.assets[0].name, "Daily driver");
        assert_eq!(view.assets[0].summary, "2019 Honda Civic");
        assert_eq!(view.assets[0].value, "$12,000");
        assert_eq!(view.assets[1].name, "701 Elm Street");
        assert_eq!(view.assets[1].summary, "Austin, TX");
    }

    #[tokio::test]
    async fn test_dangling_reference_skipped() {
        let storage = MemoryStorage::new();
        let user_id = UserId::temp();

        // Points at a request that was never persisted.
        storage
            .create_user_asset(NewUserAsset {
                user_id: user_id.clone(),
                asset: AssetRef::Vehicle(ValuationRequestId::generate()),
                custom_name: None,
            })
            .await
            .expect("asset");
        seed_vehicle(&storage, &user_id, Some(dec(12_000)), None).await;

        let view = build(&storage, &user_id).await.expect("dashboard");

        // The dangling asset produces no entry and no error.
        assert_eq!(view.assets.len(), 1);
        assert_eq!(view.vehicle_count, 1);
        assert_eq!(view.property_count, 0);
        assert_eq!(view.total_value, "$12,000");
    }

    #[tokio::test]
    async fn test_valueless_result_skipped() {
        let storage = MemoryStorage::new();
        let user_id = UserId::temp();

        seed_vehicle(&storage, &user_id, None, None).await;

        let view = build(&storage, &user_id).await.expect("dashboard");

        assert!(view.assets.is_empty());
        assert_eq!(view.total_value, "$0");
    }

    #[tokio::test]
    async fn test_empty_portfolio() {
        let storage = MemoryStorage::new();
        let view = build(&storage, &UserId::temp()).await.expect("dashboard");

        assert!(view.user.is_none());
        assert!(view.assets.is_empty());
        assert_eq!(view.total_value, "$0");
        assert_eq!(view.vehicle_count, 0);
        assert_eq!(view.property_count, 0);
    }
}
