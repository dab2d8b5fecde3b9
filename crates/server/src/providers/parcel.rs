//! Parcel data provider client.
//!
//! Looks up a county tax record by free-text address. The provider matches
//! loosely and returns zero or more parcel records; we take the first. When
//! the full address misses, exactly one alternate query with abbreviated
//! street suffixes is tried before giving up - county records frequently
//! store "701 Elm St" where the user typed "701 Elm Street".
//!
//! Successful lookups are cached per query string: parcel records change on
//! the county's schedule, not ours, and repeat lookups of the same address
//! are common from the dashboard.

use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::config::ParcelProviderConfig;

use super::ProviderError;

/// Cached parcel entries live this long.
const CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Maximum cached queries.
const CACHE_CAPACITY: u64 = 1_000;

/// Street suffix abbreviations applied when building the alternate query.
const SUFFIX_ABBREVIATIONS: &[(&str, &str)] = &[
    ("street", "St"),
    ("avenue", "Ave"),
    ("boulevard", "Blvd"),
    ("drive", "Dr"),
    ("road", "Rd"),
    ("lane", "Ln"),
    ("court", "Ct"),
    ("place", "Pl"),
    ("terrace", "Ter"),
    ("parkway", "Pkwy"),
    ("highway", "Hwy"),
];

/// Client for the parcel data API.
#[derive(Clone)]
pub struct ParcelClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    cache: Cache<String, Value>,
}

impl ParcelClient {
    /// Create a new client.
    #[must_use]
    pub fn new(config: &ParcelProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_token: config.api_token.expose_secret().to_owned(),
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Look up the parcel record for an address.
    ///
    /// Issues the primary query and, when it matches nothing, one alternate
    /// query with abbreviated street suffixes. No further retries.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotFound` when both queries miss,
    /// `ProviderError::Credential` on 401/403, and
    /// `ProviderError::Unavailable` for other unexpected statuses.
    pub async fn find_parcel(
        &self,
        street_address: &str,
        city: &str,
        state: &str,
        zip_code: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let primary = build_query(street_address, city, state, zip_code);

        if let Some(hit) = self.cache.get(&primary).await {
            tracing::debug!(query = %primary, "parcel cache hit");
            return Ok(hit);
        }

        if let Some(record) = self.search(&primary).await? {
            self.cache.insert(primary, record.clone()).await;
            return Ok(record);
        }

        // One-shot fallback with abbreviated suffixes; skipped when it would
        // just repeat the primary query.
        let alternate = build_query(&abbreviate_street(street_address), city, state, zip_code);
        if alternate != primary {
            tracing::debug!(query = %alternate, "parcel primary query missed, trying alternate");
            if let Some(record) = self.search(&alternate).await? {
                self.cache.insert(alternate, record.clone()).await;
                return Ok(record);
            }
        }

        Err(ProviderError::NotFound)
    }

    /// Run one search query, returning the first parcel record if any.
    async fn search(&self, query: &str) -> Result<Option<Value>, ProviderError> {
        let url = format!("{}/search.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("limit", "1"),
                ("token", self.api_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "parcel provider error response");
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Credential,
                404 => return Ok(None),
                other => ProviderError::Unavailable { status: other },
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(first_record(&body))
    }
}

/// Assemble the free-text query string the provider expects.
fn build_query(street_address: &str, city: &str, state: &str, zip_code: Option<&str>) -> String {
    let mut query = format!("{}, {city}, {state}", street_address.trim());
    if let Some(zip) = zip_code {
        let zip = zip.trim();
        if !zip.is_empty() {
            query.push(' ');
            query.push_str(zip);
        }
    }
    query
}

/// Abbreviate common street suffixes ("Street" -> "St").
fn abbreviate_street(street_address: &str) -> String {
    street_address
        .split_whitespace()
        .map(|word| {
            let stripped = word.trim_end_matches(&['.', ','][..]);
            SUFFIX_ABBREVIATIONS
                .iter()
                .find(|(long, _)| stripped.eq_ignore_ascii_case(long))
                .map_or_else(|| word.to_owned(), |(_, short)| (*short).to_owned())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pull the first parcel record out of a search response.
///
/// Response versions differ: some wrap matches in `results`, others in
/// `parcels`, and single-match responses have been seen bare.
fn first_record(body: &Value) -> Option<Value> {
    for key in ["results", "parcels"] {
        if let Some(items) = body.get(key).and_then(Value::as_array) {
            return items.first().cloned();
        }
    }

    if body.is_object() && (body.get("fields").is_some() || body.get("parcelnumb").is_some()) {
        return Some(body.clone());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_query_with_and_without_zip() {
        assert_eq!(
            build_query("701 Elm Street", "Dallas", "TX", None),
            "701 Elm Street, Dallas, TX"
        );
        assert_eq!(
            build_query("701 Elm Street", "Dallas", "TX", Some("75202")),
            "701 Elm Street, Dallas, TX 75202"
        );
        assert_eq!(
            build_query("701 Elm Street", "Dallas", "TX", Some("  ")),
            "701 Elm Street, Dallas, TX"
        );
    }

    #[test]
    fn test_abbreviate_street_suffixes() {
        assert_eq!(abbreviate_street("701 Elm Street"), "701 Elm St");
        assert_eq!(abbreviate_street("12 Ocean Avenue"), "12 Ocean Ave");
        assert_eq!(abbreviate_street("9 Grand Boulevard."), "9 Grand Blvd");
        // Already abbreviated: unchanged, so the alternate query is skipped.
        assert_eq!(abbreviate_street("701 Elm St"), "701 Elm St");
    }

    #[test]
    fn test_first_record_shapes() {
        let wrapped = json!({ "results": [ { "parcelnumb": "123" } ] });
        assert_eq!(
            first_record(&wrapped),
            Some(json!({ "parcelnumb": "123" }))
        );

        let parcels = json!({ "parcels": [] });
        assert_eq!(first_record(&parcels), None);

        let bare = json!({ "fields": { "parval": 1 } });
        assert_eq!(first_record(&bare), Some(bare.clone()));

        assert_eq!(first_record(&json!({ "message": "ok" })), None);
    }
}
