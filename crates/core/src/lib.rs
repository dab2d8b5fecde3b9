//! AssetLens Core - Shared types library.
//!
//! This crate provides common types used across all AssetLens components:
//! - `server` - Web application serving the valuation and assessment APIs
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, asset references, and
//!   currency display helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
