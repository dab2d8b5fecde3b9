//! Domain entities persisted by the storage layer.
//!
//! All entities are immutable once created (no updates except `User`
//! name/avatar on repeat sign-in). Money values are `rust_decimal::Decimal`
//! and serialize as decimal strings.

pub mod asset;
pub mod assessment;
pub mod user;
pub mod valuation;

pub use asset::{NewUserAsset, UserAsset};
pub use assessment::{
    AssessmentRequest, AssessmentResult, NewAssessmentRequest, NewAssessmentResult,
};
pub use user::{NewUser, User};
pub use valuation::{NewValuationRequest, NewValuationResult, ValuationRequest, ValuationResult};
