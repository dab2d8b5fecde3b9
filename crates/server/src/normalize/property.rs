//! Canonical property fields extracted from a raw parcel record.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::config::ValuationPolicy;
use crate::providers::fields;

use super::NormalizeError;

/// Square feet per acre.
const SQFT_PER_ACRE: Decimal = Decimal::from_parts(43_560, 0, 0, false, 0);

/// A parcel record normalized into the result schema's units and semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPropertyFields {
    pub assessed_value: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub land_value: Option<Decimal>,
    pub improvement_value: Option<Decimal>,
    pub property_type: String,
    pub lot_size_acres: Option<Decimal>,
    pub year_built: Option<i32>,
    pub owner_name: Option<String>,
    pub apn: Option<String>,
}

/// Normalize a raw parcel record.
///
/// - Lot size prefers a recorded acreage; otherwise converts square footage
///   (`acres = sqft / 43560`).
/// - Market value is the assessed value with the configured markup applied
///   when assessed > 0; otherwise the sum of land and improvement values.
///   The markup is a deliberate modeling approximation (county assessments
///   trail the market), not provider data.
/// - Property type falls through use description, use code, zoning code, and
///   the top-level zoning field, defaulting to "Unknown".
///
/// # Errors
///
/// Returns [`NormalizeError::NoParcelValues`] when every monetary value is
/// zero or absent - a match with nothing to report is treated the same as no
/// match.
pub fn normalize_parcel(
    record: &Value,
    policy: &ValuationPolicy,
) -> Result<NormalizedPropertyFields, NormalizeError> {
    let assessed_value = fields::resolve_decimal(record, fields::ASSESSED_VALUE);
    let land_value = fields::resolve_decimal(record, fields::LAND_VALUE);
    let improvement_value = fields::resolve_decimal(record, fields::IMPROVEMENT_VALUE);

    let market_value = derive_market_value(assessed_value, land_value, improvement_value, policy);

    if !has_positive_value(&[assessed_value, market_value, land_value, improvement_value]) {
        return Err(NormalizeError::NoParcelValues);
    }

    Ok(NormalizedPropertyFields {
        assessed_value,
        market_value,
        land_value,
        improvement_value,
        property_type: resolve_property_type(record),
        lot_size_acres: resolve_lot_size(record),
        year_built: fields::resolve_i64(record, fields::YEAR_BUILT)
            .and_then(|y| i32::try_from(y).ok()),
        owner_name: fields::resolve_owner(record),
        apn: fields::resolve_string(record, fields::APN),
    })
}

/// Market value: assessed value marked up, or land + improvement fallback.
fn derive_market_value(
    assessed_value: Option<Decimal>,
    land_value: Option<Decimal>,
    improvement_value: Option<Decimal>,
    policy: &ValuationPolicy,
) -> Option<Decimal> {
    if let Some(assessed) = assessed_value
        && assessed > Decimal::ZERO
    {
        return Some(round_dollars(assessed * policy.market_markup));
    }

    match (land_value, improvement_value) {
        (None, None) => None,
        (land, improvement) => {
            Some(land.unwrap_or(Decimal::ZERO) + improvement.unwrap_or(Decimal::ZERO))
        }
    }
}

/// Lot size in acres, converting square footage when no acreage is recorded.
fn resolve_lot_size(record: &Value) -> Option<Decimal> {
    if let Some(acres) = fields::resolve_decimal(record, fields::LOT_ACRES) {
        return Some(acres);
    }

    fields::resolve_decimal(record, fields::LOT_SQFT).map(|sqft| sqft / SQFT_PER_ACRE)
}

/// First non-empty of use description, use code, zoning code, top-level
/// zoning; "Unknown" when none are present.
fn resolve_property_type(record: &Value) -> String {
    fields::resolve_string(record, fields::USE_DESCRIPTION)
        .or_else(|| fields::resolve_string(record, fields::USE_CODE))
        .or_else(|| fields::resolve_string(record, fields::ZONING))
        .unwrap_or_else(|| "Unknown".to_owned())
}

fn has_positive_value(values: &[Option<Decimal>]) -> bool {
    values
        .iter()
        .flatten()
        .any(|v| *v > Decimal::ZERO)
}

/// Round to whole dollars, halves away from zero.
fn round_dollars(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_market_value_markup_over_assessed() {
        let record = json!({
            "parval": 100_000,
            "landval": 1,
            "improvval": 1
        });
        let normalized =
            normalize_parcel(&record, &ValuationPolicy::default()).expect("normalized");

        // Markup applies regardless of land/improvement values.
        assert_eq!(normalized.market_value, Some(dec(110_000)));
        assert_eq!(normalized.assessed_value, Some(dec(100_000)));
    }

    #[test]
    fn test_market_value_fallback_to_components() {
        let record = json!({
            "parval": 0,
            "landval": 50_000,
            "improvval": 20_000
        });
        let normalized =
            normalize_parcel(&record, &ValuationPolicy::default()).expect("normalized");

        assert_eq!(normalized.market_value, Some(dec(70_000)));
    }

    #[test]
    fn test_lot_size_from_square_feet() {
        let record = json!({
            "parval": 100_000,
            "ll_gissqft": 21_780
        });
        let normalized =
            normalize_parcel(&record, &ValuationPolicy::default()).expect("normalized");

        assert_eq!(normalized.lot_size_acres, Some(Decimal::new(5, 1)));
    }

    #[test]
    fn test_lot_size_prefers_recorded_acreage() {
        let record = json!({
            "parval": 100_000,
            "ll_gisacre": 2.5,
            "ll_gissqft": 21_780
        });
        let normalized =
            normalize_parcel(&record, &ValuationPolicy::default()).expect("normalized");

        assert_eq!(normalized.lot_size_acres, Some(Decimal::new(25, 1)));
    }

    #[test]
    fn test_property_type_fallback_chain() {
        let policy = ValuationPolicy::default();

        let with_desc = json!({ "parval": 1000, "usedesc": "Single Family", "zoning": "R1" });
        assert_eq!(
            normalize_parcel(&with_desc, &policy).expect("ok").property_type,
            "Single Family"
        );

        let zoning_only = json!({ "parval": 1000, "zoning": "R1" });
        assert_eq!(
            normalize_parcel(&zoning_only, &policy).expect("ok").property_type,
            "R1"
        );

        let nothing = json!({ "parval": 1000 });
        assert_eq!(
            normalize_parcel(&nothing, &policy).expect("ok").property_type,
            "Unknown"
        );
    }

    #[test]
    fn test_all_values_absent_is_business_error() {
        let record = json!({ "usedesc": "Vacant", "parcelnumb": "42-1" });
        let err = normalize_parcel(&record, &ValuationPolicy::default()).unwrap_err();
        assert_eq!(err, NormalizeError::NoParcelValues);

        let zeros = json!({ "parval": 0, "landval": 0, "improvval": 0 });
        let err = normalize_parcel(&zeros, &ValuationPolicy::default()).unwrap_err();
        assert_eq!(err, NormalizeError::NoParcelValues);
    }

    #[test]
    fn test_nested_fields_record() {
        let record = json!({
            "fields": {
                "assessval": "250000",
                "yearbuilt": 1962,
                "owners": [ { "owner": "DOE JANE" } ]
            }
        });
        let normalized =
            normalize_parcel(&record, &ValuationPolicy::default()).expect("normalized");

        assert_eq!(normalized.assessed_value, Some(dec(250_000)));
        assert_eq!(normalized.market_value, Some(dec(275_000)));
        assert_eq!(normalized.year_built, Some(1962));
        assert_eq!(normalized.owner_name, Some("DOE JANE".to_owned()));
    }
}
