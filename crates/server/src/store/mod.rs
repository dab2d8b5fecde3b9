//! Persistence layer: one `Storage` trait, two backends.
//!
//! The trait owns all entity persistence. Creates are append-only with
//! generated UUID ids, so there are no id collisions and no locking beyond
//! what each backend provides internally. `MemoryStorage` backs the test
//! suite; `PgStorage` is the production backend.
//!
//! # Tables
//!
//! - `users` - identity records
//! - `user_assets` - portfolio join records (polymorphic by asset type)
//! - `valuation_requests` / `valuation_results` - vehicle pairs
//! - `land_assessment_requests` / `land_assessment_results` - property pairs
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p assetlens-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use async_trait::async_trait;
use thiserror::Error;

use assetlens_core::{AssessmentRequestId, UserId, ValuationRequestId};

use crate::models::{
    AssessmentRequest, AssessmentResult, NewAssessmentRequest, NewAssessmentResult, NewUser,
    NewUserAsset, NewValuationRequest, NewValuationResult, User, UserAsset, ValuationRequest,
    ValuationResult,
};

/// Storage layer errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row could not be mapped back to a domain value.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Repository abstraction over the persistence backend.
///
/// Every create generates the row id and stamps `created_at`; callers never
/// supply either. Reads are idempotent.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch a user by id.
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError>;

    /// Fetch a user by email.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Create a user on first sign-in, or refresh name/avatar on repeat
    /// sign-in with the same email. The id and email never change.
    async fn upsert_user(&self, new: NewUser) -> Result<User, StorageError>;

    /// Persist a vehicle valuation request.
    async fn create_valuation_request(
        &self,
        new: NewValuationRequest,
    ) -> Result<ValuationRequest, StorageError>;

    /// Persist a vehicle valuation result, linked via `request_id`.
    async fn create_valuation_result(
        &self,
        new: NewValuationResult,
    ) -> Result<ValuationResult, StorageError>;

    /// Fetch a valuation request by id.
    async fn get_valuation_request(
        &self,
        id: &ValuationRequestId,
    ) -> Result<Option<ValuationRequest>, StorageError>;

    /// Fetch the result linked to a valuation request, if one exists yet.
    async fn get_valuation_result(
        &self,
        request_id: &ValuationRequestId,
    ) -> Result<Option<ValuationResult>, StorageError>;

    /// Persist a land assessment request.
    async fn create_assessment_request(
        &self,
        new: NewAssessmentRequest,
    ) -> Result<AssessmentRequest, StorageError>;

    /// Persist a land assessment result, linked via `request_id`.
    async fn create_assessment_result(
        &self,
        new: NewAssessmentResult,
    ) -> Result<AssessmentResult, StorageError>;

    /// Fetch an assessment request by id.
    async fn get_assessment_request(
        &self,
        id: &AssessmentRequestId,
    ) -> Result<Option<AssessmentRequest>, StorageError>;

    /// Fetch the result linked to an assessment request, if one exists yet.
    async fn get_assessment_result(
        &self,
        request_id: &AssessmentRequestId,
    ) -> Result<Option<AssessmentResult>, StorageError>;

    /// Persist a portfolio asset record.
    async fn create_user_asset(&self, new: NewUserAsset) -> Result<UserAsset, StorageError>;

    /// List a user's assets in stable insertion order.
    async fn list_user_assets(&self, user_id: &UserId) -> Result<Vec<UserAsset>, StorageError>;
}
