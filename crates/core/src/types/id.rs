//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. All entity rows are
//! keyed by generated opaque strings (UUID v4), so the wrappers are backed by
//! `String` rather than a database serial.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `generate()` producing a fresh UUID v4 id
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use assetlens_core::define_id;
/// define_id!(UserId);
/// define_id!(ValuationRequestId);
///
/// let user_id = UserId::generate();
/// let request_id = ValuationRequestId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: UserId = request_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id value.
            #[must_use]
            pub const fn new(id: String) -> Self {
                Self(id)
            }

            /// Generate a fresh random id.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper, returning the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ValuationRequestId);
define_id!(ValuationResultId);
define_id!(AssessmentRequestId);
define_id!(AssessmentResultId);
define_id!(UserAssetId);

impl UserId {
    /// Prefix carried by anonymous session-scoped user ids.
    pub const TEMP_PREFIX: &'static str = "temp_";

    /// Mint an anonymous user id for a visitor without an account.
    ///
    /// Anonymous ids live in the session cookie so repeat submissions from
    /// the same visitor land under one portfolio.
    #[must_use]
    pub fn temp() -> Self {
        Self(format!("{}{}", Self::TEMP_PREFIX, uuid::Uuid::new_v4()))
    }

    /// Whether this id belongs to an anonymous session user.
    #[must_use]
    pub fn is_temp(&self) -> bool {
        self.0.starts_with(Self::TEMP_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = ValuationRequestId::generate();
        let b = ValuationRequestId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_temp_user_id() {
        let id = UserId::temp();
        assert!(id.is_temp());
        assert!(id.as_str().starts_with("temp_"));

        let regular = UserId::generate();
        assert!(!regular.is_temp());
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserAssetId::new("abc-123".to_owned());
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"abc-123\"");

        let back: UserAssetId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
