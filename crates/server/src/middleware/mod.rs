//! HTTP middleware: session layer and the current-user extractor.

pub mod session;

pub use session::{CurrentUser, create_session_layer};
