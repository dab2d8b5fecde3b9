//! In-memory storage backend.
//!
//! Backs the test suite and local development without a database. Maps are
//! keyed by id; user assets additionally keep insertion order, which is the
//! order the dashboard lists them in.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use assetlens_core::{
    AssessmentRequestId, AssessmentResultId, UserAssetId, UserId, ValuationRequestId,
    ValuationResultId,
};

use crate::models::{
    AssessmentRequest, AssessmentResult, NewAssessmentRequest, NewAssessmentResult, NewUser,
    NewUserAsset, NewValuationRequest, NewValuationResult, User, UserAsset, ValuationRequest,
    ValuationResult,
};

use super::{Storage, StorageError};

/// Map-backed storage. Cheap to create per test.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    valuation_requests: HashMap<String, ValuationRequest>,
    valuation_results: Vec<ValuationResult>,
    assessment_requests: HashMap<String, AssessmentRequest>,
    assessment_results: Vec<AssessmentResult>,
    user_assets: Vec<UserAsset>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(id.as_str()).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn upsert_user(&self, new: NewUser) -> Result<User, StorageError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();

        if let Some(existing) = inner.users.values_mut().find(|u| u.email == new.email) {
            existing.name = new.name;
            existing.avatar_url = new.avatar_url;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let user = User {
            id: UserId::generate(),
            email: new.email,
            name: new.name,
            avatar_url: new.avatar_url,
            external_id: new.external_id,
            created_at: now,
            updated_at: now,
        };
        inner
            .users
            .insert(user.id.as_str().to_owned(), user.clone());
        Ok(user)
    }

    async fn create_valuation_request(
        &self,
        new: NewValuationRequest,
    ) -> Result<ValuationRequest, StorageError> {
        let mut inner = self.inner.write().await;
        let request = ValuationRequest {
            id: ValuationRequestId::generate(),
            user_id: new.user_id,
            make: new.make,
            model: new.model,
            year: new.year,
            mileage: new.mileage,
            zip_code: new.zip_code,
            created_at: Utc::now(),
        };
        inner
            .valuation_requests
            .insert(request.id.as_str().to_owned(), request.clone());
        Ok(request)
    }

    async fn create_valuation_result(
        &self,
        new: NewValuationResult,
    ) -> Result<ValuationResult, StorageError> {
        let mut inner = self.inner.write().await;
        let result = ValuationResult {
            id: ValuationResultId::generate(),
            request_id: new.request_id,
            trade_in_value: new.trade_in_value,
            private_party_value: new.private_party_value,
            retail_value: new.retail_value,
            loan_amount: new.loan_amount,
            ltv_ratio: new.ltv_ratio,
            estimated_rate: new.estimated_rate,
            monthly_payment: new.monthly_payment,
            created_at: Utc::now(),
        };
        inner.valuation_results.push(result.clone());
        Ok(result)
    }

    async fn get_valuation_request(
        &self,
        id: &ValuationRequestId,
    ) -> Result<Option<ValuationRequest>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.valuation_requests.get(id.as_str()).cloned())
    }

    async fn get_valuation_result(
        &self,
        request_id: &ValuationRequestId,
    ) -> Result<Option<ValuationResult>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .valuation_results
            .iter()
            .find(|r| r.request_id.as_ref() == Some(request_id))
            .cloned())
    }

    async fn create_assessment_request(
        &self,
        new: NewAssessmentRequest,
    ) -> Result<AssessmentRequest, StorageError> {
        let mut inner = self.inner.write().await;
        let request = AssessmentRequest {
            id: AssessmentRequestId::generate(),
            user_id: new.user_id,
            street_address: new.street_address,
            city: new.city,
            state: new.state,
            zip_code: new.zip_code,
            created_at: Utc::now(),
        };
        inner
            .assessment_requests
            .insert(request.id.as_str().to_owned(), request.clone());
        Ok(request)
    }

    async fn create_assessment_result(
        &self,
        new: NewAssessmentResult,
    ) -> Result<AssessmentResult, StorageError> {
        let mut inner = self.inner.write().await;
        let result = AssessmentResult {
            id: AssessmentResultId::generate(),
            request_id: new.request_id,
            assessed_value: new.assessed_value,
            market_value: new.market_value,
            land_value: new.land_value,
            improvement_value: new.improvement_value,
            property_type: new.property_type,
            lot_size_acres: new.lot_size_acres,
            year_built: new.year_built,
            owner_name: new.owner_name,
            apn: new.apn,
            created_at: Utc::now(),
        };
        inner.assessment_results.push(result.clone());
        Ok(result)
    }

    async fn get_assessment_request(
        &self,
        id: &AssessmentRequestId,
    ) -> Result<Option<AssessmentRequest>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.assessment_requests.get(id.as_str()).cloned())
    }

    async fn get_assessment_result(
        &self,
        request_id: &AssessmentRequestId,
    ) -> Result<Option<AssessmentResult>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .assessment_results
            .iter()
            .find(|r| r.request_id.as_ref() == Some(request_id))
            .cloned())
    }

    async fn create_user_asset(&self, new: NewUserAsset) -> Result<UserAsset, StorageError> {
        let mut inner = self.inner.write().await;
        let asset = UserAsset {
            id: UserAssetId::generate(),
            user_id: new.user_id,
            asset: new.asset,
            custom_name: new.custom_name,
            created_at: Utc::now(),
        };
        inner.user_assets.push(asset.clone());
        Ok(asset)
    }

    async fn list_user_assets(&self, user_id: &UserId) -> Result<Vec<UserAsset>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .user_assets
            .iter()
            .filter(|a| &a.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetlens_core::AssetRef;

    fn vehicle_request() -> NewValuationRequest {
        NewValuationRequest {
            user_id: None,
            make: "Honda".to_owned(),
            model: "Civic".to_owned(),
            year: 2019,
            mileage: 42_000,
            zip_code: "02134".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_request_result_round_trip() {
        let store = MemoryStorage::new();
        let request = store
            .create_valuation_request(vehicle_request())
            .await
            .expect("create request");

        // No result yet.
        let missing = store
            .get_valuation_result(&request.id)
            .await
            .expect("lookup");
        assert!(missing.is_none());

        let result = store
            .create_valuation_result(NewValuationResult {
                request_id: Some(request.id.clone()),
                trade_in_value: Some(10_200.into()),
                private_party_value: Some(12_000.into()),
                retail_value: Some(13_800.into()),
                loan_amount: None,
                ltv_ratio: None,
                estimated_rate: None,
                monthly_payment: None,
            })
            .await
            .expect("create result");

        let found = store
            .get_valuation_result(&request.id)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(found.id, result.id);
    }

    #[tokio::test]
    async fn test_upsert_user_refreshes_without_new_id() {
        let store = MemoryStorage::new();
        let first = store
            .upsert_user(NewUser {
                email: "pat@example.com".to_owned(),
                name: "Pat".to_owned(),
                avatar_url: None,
                external_id: Some("ext-1".to_owned()),
            })
            .await
            .expect("create");

        let second = store
            .upsert_user(NewUser {
                email: "pat@example.com".to_owned(),
                name: "Pat Jones".to_owned(),
                avatar_url: Some("https://example.com/a.png".to_owned()),
                external_id: Some("ext-1".to_owned()),
            })
            .await
            .expect("update");

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Pat Jones");
        assert_eq!(second.avatar_url.as_deref(), Some("https://example.com/a.png"));
    }

    #[tokio::test]
    async fn test_assets_keep_insertion_order() {
        let store = MemoryStorage::new();
        let user_id = UserId::generate();

        for n in 0..3 {
            store
                .create_user_asset(NewUserAsset {
                    user_id: user_id.clone(),
                    asset: AssetRef::Vehicle(ValuationRequestId::from(format!("req-{n}").as_str())),
                    custom_name: None,
                })
                .await
                .expect("create asset");
        }

        let assets = store.list_user_assets(&user_id).await.expect("list");
        let ids: Vec<&str> = assets.iter().map(|a| a.asset.id_str()).collect();
        assert_eq!(ids, vec!["req-0", "req-1", "req-2"]);
    }
}
