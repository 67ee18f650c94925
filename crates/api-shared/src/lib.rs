//! # API Shared
//!
//! Shared definitions for the file store APIs.
//!
//! Contains:
//! - Request/response bodies (`models` module), serialisable and documented for OpenAPI
//! - The storage `HealthService`
//!
//! Used by `api-rest` and the `filestore` CLI.

pub mod health;
pub mod models;

pub use health::HealthService;
pub use models::*;
