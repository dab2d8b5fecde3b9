//! `PostgreSQL` storage backend.
//!
//! Runtime-checked sqlx queries against the table layout in
//! `crates/server/migrations/`. Rows are fetched into flat structs and mapped
//! to domain values; a stored `asset_type` that doesn't parse is surfaced as
//! data corruption rather than guessed at.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use assetlens_core::{
    AssessmentRequestId, AssessmentResultId, AssetRef, UserAssetId, UserId, ValuationRequestId,
    ValuationResultId,
};

use crate::models::{
    AssessmentRequest, AssessmentResult, NewAssessmentRequest, NewAssessmentResult, NewUser,
    NewUserAsset, NewValuationRequest, NewValuationResult, User, UserAsset, ValuationRequest,
    ValuationResult,
};

use super::{Storage, StorageError};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// `PostgreSQL`-backed storage.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (health checks, session store).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    avatar_url: Option<String>,
    external_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            name: row.name,
            avatar_url: row.avatar_url,
            external_id: row.external_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ValuationRequestRow {
    id: String,
    user_id: Option<String>,
    make: String,
    model: String,
    year: i32,
    mileage: i64,
    zip_code: String,
    created_at: DateTime<Utc>,
}

impl From<ValuationRequestRow> for ValuationRequest {
    fn from(row: ValuationRequestRow) -> Self {
        Self {
            id: ValuationRequestId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            make: row.make,
            model: row.model,
            year: row.year,
            mileage: row.mileage,
            zip_code: row.zip_code,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ValuationResultRow {
    id: String,
    request_id: Option<String>,
    trade_in_value: Option<Decimal>,
    private_party_value: Option<Decimal>,
    retail_value: Option<Decimal>,
    loan_amount: Option<Decimal>,
    ltv_ratio: Option<Decimal>,
    estimated_rate: Option<Decimal>,
    monthly_payment: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl From<ValuationResultRow> for ValuationResult {
    fn from(row: ValuationResultRow) -> Self {
        Self {
            id: ValuationResultId::new(row.id),
            request_id: row.request_id.map(ValuationRequestId::new),
            trade_in_value: row.trade_in_value,
            private_party_value: row.private_party_value,
            retail_value: row.retail_value,
            loan_amount: row.loan_amount,
            ltv_ratio: row.ltv_ratio,
            estimated_rate: row.estimated_rate,
            monthly_payment: row.monthly_payment,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AssessmentRequestRow {
    id: String,
    user_id: Option<String>,
    street_address: String,
    city: String,
    state: String,
    zip_code: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AssessmentRequestRow> for AssessmentRequest {
    fn from(row: AssessmentRequestRow) -> Self {
        Self {
            id: AssessmentRequestId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            street_address: row.street_address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AssessmentResultRow {
    id: String,
    request_id: Option<String>,
    assessed_value: Option<Decimal>,
    market_value: Option<Decimal>,
    land_value: Option<Decimal>,
    improvement_value: Option<Decimal>,
    property_type: Option<String>,
    lot_size_acres: Option<Decimal>,
    year_built: Option<i32>,
    owner_name: Option<String>,
    apn: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AssessmentResultRow> for AssessmentResult {
    fn from(row: AssessmentResultRow) -> Self {
        Self {
            id: AssessmentResultId::new(row.id),
            request_id: row.request_id.map(AssessmentRequestId::new),
            assessed_value: row.assessed_value,
            market_value: row.market_value,
            land_value: row.land_value,
            improvement_value: row.improvement_value,
            property_type: row.property_type,
            lot_size_acres: row.lot_size_acres,
            year_built: row.year_built,
            owner_name: row.owner_name,
            apn: row.apn,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserAssetRow {
    id: String,
    user_id: String,
    asset_type: String,
    asset_id: String,
    custom_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserAssetRow> for UserAsset {
    type Error = StorageError;

    fn try_from(row: UserAssetRow) -> Result<Self, Self::Error> {
        let asset = AssetRef::from_parts(&row.asset_type, &row.asset_id).map_err(|e| {
            StorageError::DataCorruption(format!("user_asset {}: {e}", row.id))
        })?;

        Ok(Self {
            id: UserAssetId::new(row.id),
            user_id: UserId::new(row.user_id),
            asset,
            custom_name: row.custom_name,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, name, avatar_url, external_id, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, name, avatar_url, external_id, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn upsert_user(&self, new: NewUser) -> Result<User, StorageError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (id, email, name, avatar_url, external_id)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO UPDATE
             SET name = EXCLUDED.name,
                 avatar_url = EXCLUDED.avatar_url,
                 updated_at = now()
             RETURNING id, email, name, avatar_url, external_id, created_at, updated_at",
        )
        .bind(UserId::generate().as_str())
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.avatar_url)
        .bind(&new.external_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(User::from(row))
    }

    async fn create_valuation_request(
        &self,
        new: NewValuationRequest,
    ) -> Result<ValuationRequest, StorageError> {
        let row: ValuationRequestRow = sqlx::query_as(
            "INSERT INTO valuation_requests (id, user_id, make, model, year, mileage, zip_code)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, user_id, make, model, year, mileage, zip_code, created_at",
        )
        .bind(ValuationRequestId::generate().as_str())
        .bind(new.user_id.as_ref().map(UserId::as_str))
        .bind(&new.make)
        .bind(&new.model)
        .bind(new.year)
        .bind(new.mileage)
        .bind(&new.zip_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(ValuationRequest::from(row))
    }

    async fn create_valuation_result(
        &self,
        new: NewValuationResult,
    ) -> Result<ValuationResult, StorageError> {
        let row: ValuationResultRow = sqlx::query_as(
            "INSERT INTO valuation_results
                 (id, request_id, trade_in_value, private_party_value, retail_value,
                  loan_amount, ltv_ratio, estimated_rate, monthly_payment)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, request_id, trade_in_value, private_party_value, retail_value,
                       loan_amount, ltv_ratio, estimated_rate, monthly_payment, created_at",
        )
        .bind(ValuationResultId::generate().as_str())
        .bind(new.request_id.as_ref().map(ValuationRequestId::as_str))
        .bind(new.trade_in_value)
        .bind(new.private_party_value)
        .bind(new.retail_value)
        .bind(new.loan_amount)
        .bind(new.ltv_ratio)
        .bind(new.estimated_rate)
        .bind(new.monthly_payment)
        .fetch_one(&self.pool)
        .await?;

        Ok(ValuationResult::from(row))
    }

    async fn get_valuation_request(
        &self,
        id: &ValuationRequestId,
    ) -> Result<Option<ValuationRequest>, StorageError> {
        let row: Option<ValuationRequestRow> = sqlx::query_as(
            "SELECT id, user_id, make, model, year, mileage, zip_code, created_at
             FROM valuation_requests WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ValuationRequest::from))
    }

    async fn get_valuation_result(
        &self,
        request_id: &ValuationRequestId,
    ) -> Result<Option<ValuationResult>, StorageError> {
        let row: Option<ValuationResultRow> = sqlx::query_as(
            "SELECT id, request_id, trade_in_value, private_party_value, retail_value,
                    loan_amount, ltv_ratio, estimated_rate, monthly_payment, created_at
             FROM valuation_results WHERE request_id = $1
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(request_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ValuationResult::from))
    }

    async fn create_assessment_request(
        &self,
        new: NewAssessmentRequest,
    ) -> Result<AssessmentRequest, StorageError> {
        let row: AssessmentRequestRow = sqlx::query_as(
            "INSERT INTO land_assessment_requests (id, user_id, street_address, city, state, zip_code)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, user_id, street_address, city, state, zip_code, created_at",
        )
        .bind(AssessmentRequestId::generate().as_str())
        .bind(new.user_id.as_ref().map(UserId::as_str))
        .bind(&new.street_address)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.zip_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(AssessmentRequest::from(row))
    }

    async fn create_assessment_result(
        &self,
        new: NewAssessmentResult,
    ) -> Result<AssessmentResult, StorageError> {
        let row: AssessmentResultRow = sqlx::query_as(
            "INSERT INTO land_assessment_results
                 (id, request_id, assessed_value, market_value, land_value, improvement_value,
                  property_type, lot_size_acres, year_built, owner_name, apn)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id, request_id, assessed_value, market_value, land_value,
                       improvement_value, property_type, lot_size_acres, year_built,
                       owner_name, apn, created_at",
        )
        .bind(AssessmentResultId::generate().as_str())
        .bind(new.request_id.as_ref().map(AssessmentRequestId::as_str))
        .bind(new.assessed_value)
        .bind(new.market_value)
        .bind(new.land_value)
        .bind(new.improvement_value)
        .bind(&new.property_type)
        .bind(new.lot_size_acres)
        .bind(new.year_built)
        .bind(&new.owner_name)
        .bind(&new.apn)
        .fetch_one(&self.pool)
        .await?;

        Ok(AssessmentResult::from(row))
    }

    async fn get_assessment_request(
        &self,
        id: &AssessmentRequestId,
    ) -> Result<Option<AssessmentRequest>, StorageError> {
        let row: Option<AssessmentRequestRow> = sqlx::query_as(
            "SELECT id, user_id, street_address, city, state, zip_code, created_at
             FROM land_assessment_requests WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AssessmentRequest::from))
    }

    async fn get_assessment_result(
        &self,
        request_id: &AssessmentRequestId,
    ) -> Result<Option<AssessmentResult>, StorageError> {
        let row: Option<AssessmentResultRow> = sqlx::query_as(
            "SELECT id, request_id, assessed_value, market_value, land_value,
                    improvement_value, property_type, lot_size_acres, year_built,
                    owner_name, apn, created_at
             FROM land_assessment_results WHERE request_id = $1
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(request_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AssessmentResult::from))
    }

    async fn create_user_asset(&self, new: NewUserAsset) -> Result<UserAsset, StorageError> {
        let row: UserAssetRow = sqlx::query_as(
            "INSERT INTO user_assets (id, user_id, asset_type, asset_id, custom_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, asset_type, asset_id, custom_name, created_at",
        )
        .bind(UserAssetId::generate().as_str())
        .bind(new.user_id.as_str())
        .bind(new.asset.kind().as_str())
        .bind(new.asset.id_str())
        .bind(&new.custom_name)
        .fetch_one(&self.pool)
        .await?;

        UserAsset::try_from(row)
    }

    async fn list_user_assets(&self, user_id: &UserId) -> Result<Vec<UserAsset>, StorageError> {
        let rows: Vec<UserAssetRow> = sqlx::query_as(
            "SELECT id, user_id, asset_type, asset_id, custom_name, created_at
             FROM user_assets WHERE user_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserAsset::try_from).collect()
    }
}
