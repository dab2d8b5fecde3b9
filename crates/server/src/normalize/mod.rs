//! Normalization of raw provider data into canonical result fields.
//!
//! This is the seam between the inconsistently-shaped provider payloads and
//! the stable result schema: unit conversion (square feet to acres), derived
//! values (market value from assessed value), and the vehicle price tiers
//! computed from a listing population. Pure functions, no I/O.

pub mod property;
pub mod vehicle;

pub use property::{NormalizedPropertyFields, normalize_parcel};
pub use vehicle::{VehicleTiers, price_tiers};

use thiserror::Error;

/// Business-level failures: the providers answered, but there is nothing to
/// value. Distinct from transport errors so the caller can tell the user to
/// check their input rather than try again later.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// No comparable listings with a positive price.
    #[error("no comparable listings found")]
    NoComparableListings,

    /// A parcel matched, but every value field was zero or absent.
    #[error("parcel record carries no usable values")]
    NoParcelValues,
}
