//! Field resolution for heterogeneous parcel payloads.
//!
//! The same logical quantity ("assessed value", "owner name", "parcel
//! number") arrives under different key spellings depending on provider and
//! response version, and some response versions nest everything under a
//! `fields` sub-object while others keep it at the top level. Rather than
//! repeating `a.or(b).or(c)` chains per field, the known spellings live in
//! one declarative alias table consumed by a generic resolver, so the lists
//! stay auditable and testable in isolation.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;

/// Known key spellings for the assessed (tax) value.
pub const ASSESSED_VALUE: &[&str] = &["parval", "assessval", "totval"];

/// Known key spellings for the land portion of the assessed value.
pub const LAND_VALUE: &[&str] = &["landval", "lndval", "landvalue"];

/// Known key spellings for the improvement (building) portion.
pub const IMPROVEMENT_VALUE: &[&str] = &["improvval", "impval", "bldgval"];

/// Known key spellings for lot size in acres.
pub const LOT_ACRES: &[&str] = &["ll_gisacre", "gisacre", "acres", "acreage"];

/// Known key spellings for lot size in square feet.
pub const LOT_SQFT: &[&str] = &["ll_gissqft", "gissqft", "sqft", "lot_sqft"];

/// Known key spellings for the year the structure was built.
pub const YEAR_BUILT: &[&str] = &["yearbuilt", "yrbuilt", "effyearbuilt"];

/// Known key spellings for the assessor parcel number.
pub const APN: &[&str] = &["parcelnumb", "apn", "parcel_id"];

/// Known key spellings for the land-use description.
pub const USE_DESCRIPTION: &[&str] = &["usedesc"];

/// Known key spellings for the land-use code.
pub const USE_CODE: &[&str] = &["usecd", "usecode"];

/// Known key spellings for the zoning designation.
pub const ZONING: &[&str] = &["zoning", "zoning_code"];

/// Known key spellings for the owner name (see also [`resolve_owner`]).
pub const OWNER: &[&str] = &["owner", "ownername"];

/// Look up the first alias that is present on the record.
///
/// Each alias is tried at the top level first, then inside the `fields`
/// sub-object when one exists. Null values and empty/blank strings do not
/// count as present.
fn lookup<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    for alias in aliases {
        if let Some(value) = present(record.get(alias)) {
            return Some(value);
        }
        if let Some(value) = present(record.get("fields").and_then(|f| f.get(alias))) {
            return Some(value);
        }
    }
    None
}

/// Filter out null and empty-string values.
fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Null) | None => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

/// Resolve a numeric field, accepting both JSON numbers and numeric strings.
#[must_use]
pub fn resolve_decimal(record: &Value, aliases: &[&str]) -> Option<Decimal> {
    match lookup(record, aliases)? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolve an integer field, accepting both JSON numbers and numeric strings.
#[must_use]
pub fn resolve_i64(record: &Value, aliases: &[&str]) -> Option<i64> {
    match lookup(record, aliases)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolve a text field. Non-string values are rendered as-is (some response
/// versions ship codes as bare numbers).
#[must_use]
pub fn resolve_string(record: &Value, aliases: &[&str]) -> Option<String> {
    match lookup(record, aliases)? {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve the owner name.
///
/// Falls back to the first entry of a nested `owners` array when the flat
/// spellings are absent (a shape seen in newer parcel responses).
#[must_use]
pub fn resolve_owner(record: &Value) -> Option<String> {
    if let Some(owner) = resolve_string(record, OWNER) {
        return Some(owner);
    }

    lookup(record, &["owners"])
        .and_then(Value::as_array)
        .and_then(|owners| owners.first())
        .and_then(|entry| resolve_string(entry, &["owner", "name"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alias_fallback_order() {
        // `impval` resolves even though the preferred `improvval` is absent.
        let record = json!({ "impval": 5000 });
        assert_eq!(
            resolve_decimal(&record, IMPROVEMENT_VALUE),
            Some(Decimal::from(5000))
        );
    }

    #[test]
    fn test_top_level_preferred_over_nested() {
        let record = json!({
            "parval": 100_000,
            "fields": { "parval": 1 }
        });
        assert_eq!(
            resolve_decimal(&record, ASSESSED_VALUE),
            Some(Decimal::from(100_000))
        );
    }

    #[test]
    fn test_nested_fields_sub_object() {
        let record = json!({
            "fields": { "assessval": "250000" }
        });
        assert_eq!(
            resolve_decimal(&record, ASSESSED_VALUE),
            Some(Decimal::from(250_000))
        );
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let record = json!({ "yearbuilt": "1987" });
        assert_eq!(resolve_i64(&record, YEAR_BUILT), Some(1987));
    }

    #[test]
    fn test_null_and_empty_not_present() {
        let record = json!({
            "parval": null,
            "assessval": "  ",
            "totval": 42
        });
        assert_eq!(
            resolve_decimal(&record, ASSESSED_VALUE),
            Some(Decimal::from(42))
        );
    }

    #[test]
    fn test_missing_everything_is_none() {
        let record = json!({ "unrelated": 1 });
        assert_eq!(resolve_decimal(&record, ASSESSED_VALUE), None);
        assert_eq!(resolve_string(&record, USE_DESCRIPTION), None);
    }

    #[test]
    fn test_owner_flat_spellings() {
        let record = json!({ "ownername": "SMITH JOHN" });
        assert_eq!(resolve_owner(&record), Some("SMITH JOHN".to_owned()));
    }

    #[test]
    fn test_owner_nested_record() {
        let record = json!({
            "fields": {
                "owners": [ { "owner": "DOE JANE" }, { "owner": "DOE JOHN" } ]
            }
        });
        assert_eq!(resolve_owner(&record), Some("DOE JANE".to_owned()));
    }

    #[test]
    fn test_use_code_as_number() {
        let record = json!({ "usecd": 4100 });
        assert_eq!(resolve_string(&record, USE_CODE), Some("4100".to_owned()));
    }
}
