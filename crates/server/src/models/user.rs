//! User identity records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assetlens_core::UserId;

/// A user identity record.
///
/// Created on first successful external sign-in or first anonymous
/// submission; name and avatar may be refreshed on repeat sign-in. Never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    /// Identity id assigned by the external sign-in provider.
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating or refreshing a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub external_id: Option<String>,
}
