//! # API Shared
//!
//! Shared definitions for the cardio HTTP surfaces.
//!
//! Contains:
//! - Request/response types (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the `cardio-run` binary.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
