//! Session middleware configuration and the current-user extractor.
//!
//! Sessions are `PostgreSQL`-backed via tower-sessions. The session's only
//! job is to carry a stable user id per visitor: the first request from an
//! anonymous visitor mints a `temp_`-prefixed id into the session, so repeat
//! submissions land under the same portfolio without an account.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use assetlens_core::UserId;

use crate::config::AppConfig;
use crate::error::AppError;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "al_session";

/// Session key carrying the visitor's user id.
const SESSION_USER_KEY: &str = "user_id";

/// Schema and table the session store reads and writes. Must match the
/// sessions table created in `migrations/`; the store's own default is
/// `tower_sessions.session`, which no migration creates.
const SESSION_SCHEMA_NAME: &str = "public";
const SESSION_TABLE_NAME: &str = "sessions";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The sessions table must exist already (created via migration).
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AppConfig,
) -> SessionManagerLayer<PostgresStore> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA_NAME)
        .expect("valid session schema name")
        .with_table_name(SESSION_TABLE_NAME)
        .expect("valid session table name");

    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The user id bound to the current session.
///
/// Extraction never rejects for lack of an account: an anonymous visitor gets
/// a fresh temp id written into their session on first contact.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::Session(message.to_owned()))?;

        if let Some(id) = session
            .get::<String>(SESSION_USER_KEY)
            .await
            .map_err(|e| AppError::Session(e.to_string()))?
        {
            return Ok(Self(UserId::new(id)));
        }

        let user_id = UserId::temp();
        session
            .insert(SESSION_USER_KEY, user_id.as_str())
            .await
            .map_err(|e| AppError::Session(e.to_string()))?;

        tracing::debug!(user_id = %user_id, "minted temp user id for new session");
        Ok(Self(user_id))
    }
}
