//! Typed asset references for portfolio records.
//!
//! A user asset binds a user to either a vehicle valuation request or a land
//! assessment request. The persisted layout is a `(asset_type, asset_id)`
//! pair with no referential integrity across the two request tables, so the
//! service layer works with a tagged union instead of a bare string id. Which
//! result table to consult is determined by the variant, never by convention.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{AssessmentRequestId, ValuationRequestId};

/// Kind discriminant for a user asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Vehicle,
    Property,
}

impl AssetKind {
    /// The string stored in the `asset_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::Property => "property",
        }
    }
}

/// Error parsing an asset kind from its stored form.
#[derive(Debug, Error)]
#[error("unknown asset kind: {0}")]
pub struct AssetKindParseError(String);

impl std::str::FromStr for AssetKind {
    type Err = AssetKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vehicle" => Ok(Self::Vehicle),
            "property" => Ok(Self::Property),
            other => Err(AssetKindParseError(other.to_owned())),
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed reference from a user asset to its underlying request.
///
/// Replaces the untyped polymorphic foreign key of the persisted layout with
/// a sum type so a vehicle id can never be resolved against the property
/// tables (or vice versa).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AssetRef {
    Vehicle(ValuationRequestId),
    Property(AssessmentRequestId),
}

impl AssetRef {
    /// The kind discriminant of this reference.
    #[must_use]
    pub const fn kind(&self) -> AssetKind {
        match self {
            Self::Vehicle(_) => AssetKind::Vehicle,
            Self::Property(_) => AssetKind::Property,
        }
    }

    /// The raw request id, as stored in the `asset_id` column.
    #[must_use]
    pub fn id_str(&self) -> &str {
        match self {
            Self::Vehicle(id) => id.as_str(),
            Self::Property(id) => id.as_str(),
        }
    }

    /// Reassemble a reference from its stored `(asset_type, asset_id)` pair.
    ///
    /// # Errors
    ///
    /// Returns `AssetKindParseError` if the stored kind is not recognized.
    pub fn from_parts(kind: &str, id: &str) -> Result<Self, AssetKindParseError> {
        let kind: AssetKind = kind.parse()?;
        Ok(match kind {
            AssetKind::Vehicle => Self::Vehicle(ValuationRequestId::from(id)),
            AssetKind::Property => Self::Property(AssessmentRequestId::from(id)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [AssetKind::Vehicle, AssetKind::Property] {
            let parsed: AssetKind = kind.as_str().parse().expect("parse");
            assert_eq!(parsed, kind);
        }
        assert!("boat".parse::<AssetKind>().is_err());
    }

    #[test]
    fn test_asset_ref_from_parts() {
        let vehicle = AssetRef::from_parts("vehicle", "req-1").expect("vehicle ref");
        assert_eq!(vehicle.kind(), AssetKind::Vehicle);
        assert_eq!(vehicle.id_str(), "req-1");

        let property = AssetRef::from_parts("property", "req-2").expect("property ref");
        assert_eq!(property.kind(), AssetKind::Property);
        assert_eq!(property.id_str(), "req-2");

        assert!(AssetRef::from_parts("boat", "req-3").is_err());
    }

    #[test]
    fn test_asset_ref_serde_tagged() {
        let asset = AssetRef::Vehicle(ValuationRequestId::from("req-1"));
        let json = serde_json::to_value(&asset).expect("serialize");
        assert_eq!(json["kind"], "vehicle");
        assert_eq!(json["id"], "req-1");
    }
}
