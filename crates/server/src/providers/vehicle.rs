//! Vehicle market-data provider client.
//!
//! Queries comparable active listings by make/model/year near a ZIP code and
//! returns their asking prices. The valuation tiers are derived from this
//! population downstream; this client only fetches and filters the raw
//! prices.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;

use crate::config::VehicleProviderConfig;

use super::ProviderError;

/// Listings to request per query. Enough for a stable mean without paging.
const LISTING_ROWS: u32 = 50;

/// Mileage search window around the requested odometer reading.
const MILEAGE_WINDOW: i64 = 15_000;

/// Client for the vehicle market-data API.
#[derive(Clone)]
pub struct VehicleMarketClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Top-level search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    listings: Vec<Listing>,
}

/// A single comparable listing. The price arrives as a number in current
/// responses but has been observed as a string in older ones.
#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    price: Value,
}

impl VehicleMarketClient {
    /// Create a new client.
    #[must_use]
    pub fn new(config: &VehicleProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.expose_secret().to_owned(),
        }
    }

    /// Fetch asking prices of comparable listings.
    ///
    /// Non-positive and unparseable prices are dropped here; an empty
    /// population is returned as an empty vec and treated as a business
    /// error by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Credential` on 401/403,
    /// `ProviderError::NotFound` on 404, and `ProviderError::Unavailable`
    /// for any other non-success status.
    pub async fn comparable_prices(
        &self,
        make: &str,
        model: &str,
        year: i32,
        zip_code: &str,
        mileage: i64,
    ) -> Result<Vec<Decimal>, ProviderError> {
        let url = format!("{}/search/car/active", self.base_url);

        let (mileage_min, mileage_max) = mileage_bounds(mileage);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("make", make),
                ("model", model),
                ("year", &year.to_string()),
                ("zip", zip_code),
                ("miles_range", &format!("{mileage_min}-{mileage_max}")),
                ("rows", &LISTING_ROWS.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "vehicle provider error response");
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Credential,
                404 => ProviderError::NotFound,
                other => ProviderError::Unavailable { status: other },
            });
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let prices: Vec<Decimal> = search
            .listings
            .iter()
            .filter_map(|listing| parse_price(&listing.price))
            .filter(|price| price.is_sign_positive() && !price.is_zero())
            .collect();

        tracing::debug!(
            listings = search.listings.len(),
            usable = prices.len(),
            "vehicle provider listings fetched"
        );

        Ok(prices)
    }
}

/// The search window around the requested odometer reading, clamped to
/// non-negative and saturating at the top so huge inputs cannot overflow.
fn mileage_bounds(mileage: i64) -> (i64, i64) {
    (
        mileage.saturating_sub(MILEAGE_WINDOW).max(0),
        mileage.saturating_add(MILEAGE_WINDOW),
    )
}

/// Parse a listing price that may arrive as a JSON number or string.
fn parse_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                use rust_decimal::prelude::FromPrimitive;
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_price_shapes() {
        assert_eq!(parse_price(&json!(12000)), Some(Decimal::from(12_000)));
        assert_eq!(parse_price(&json!("12500")), Some(Decimal::from(12_500)));
        assert_eq!(
            parse_price(&json!(9999.5)),
            Some(Decimal::from_f64_retain(9999.5).expect("decimal"))
        );
        assert_eq!(parse_price(&json!(null)), None);
        assert_eq!(parse_price(&json!("call for price")), None);
    }

    #[test]
    fn test_mileage_bounds_clamped_and_saturating() {
        assert_eq!(mileage_bounds(42_000), (27_000, 57_000));
        assert_eq!(mileage_bounds(5_000), (0, 20_000));
        assert_eq!(mileage_bounds(0), (0, 15_000));
        assert_eq!(
            mileage_bounds(i64::MAX),
            (i64::MAX - MILEAGE_WINDOW, i64::MAX)
        );
    }

    #[test]
    fn test_search_response_tolerates_missing_fields() {
        let parsed: SearchResponse = serde_json::from_value(json!({
            "num_found": 2,
            "listings": [ { "price": 10000 }, { "vin": "abc" } ]
        }))
        .expect("parse");
        assert_eq!(parsed.listings.len(), 2);
        assert_eq!(parse_price(&parsed.listings[1].price), None);
    }
}
