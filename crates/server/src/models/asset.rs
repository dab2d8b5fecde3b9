//! User portfolio asset records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assetlens_core::{AssetRef, UserAssetId, UserId};

/// A join record binding a user to one request for portfolio display.
///
/// The reference is typed (`AssetRef`) in memory; the persisted form is the
/// `(asset_type, asset_id)` pair. The target request may have been deleted or
/// never completed - aggregation must tolerate that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAsset {
    pub id: UserAssetId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub asset: AssetRef,
    pub custom_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a user asset.
#[derive(Debug, Clone)]
pub struct NewUserAsset {
    pub user_id: UserId,
    pub asset: AssetRef,
    pub custom_name: Option<String>,
}
