//! Third-party data provider clients.
//!
//! Two outbound integrations: a vehicle market-data provider (comparable
//! listings with prices) and a parcel data provider (county tax records by
//! address). Both are plain REST APIs queried with `reqwest`; responses are
//! normalized downstream by the [`crate::normalize`] module.
//!
//! Provider failures never escape raw: they are folded into
//! [`ProviderError`] here and translated to user-facing errors at the route
//! boundary. Raw status codes and bodies are logged, not returned.

pub mod fields;
pub mod parcel;
pub mod vehicle;

pub use parcel::ParcelClient;
pub use vehicle::VehicleMarketClient;

use thiserror::Error;

/// Errors from a provider round trip.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential rejected by the provider (or missing entirely).
    #[error("provider credential rejected")]
    Credential,

    /// The provider could not match the query (HTTP 404 or equivalent).
    #[error("provider found no match for the query")]
    NotFound,

    /// Provider returned an unexpected status.
    #[error("provider unavailable (status {status})")]
    Unavailable { status: u16 },

    /// Transport-level failure.
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match any known shape.
    #[error("provider response could not be parsed: {0}")]
    Parse(String),
}
