//! Core types for AssetLens.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod asset;
pub mod id;
pub mod money;

pub use asset::{AssetKind, AssetKindParseError, AssetRef};
pub use id::*;
pub use money::{format_usd, parse_usd};
