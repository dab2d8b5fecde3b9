//! Application services: the orchestration layer between routes and the
//! providers/storage beneath them.
//!
//! Each service owns one flow end to end. Handlers stay thin; everything
//! testable lives here and runs against `MemoryStorage` in tests.

pub mod assessment;
pub mod dashboard;
pub mod reports;
pub mod valuation;
