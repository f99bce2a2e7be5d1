//! HTTP server for the casino simulator and predictor.
//!
//! Exposes [`api::create_router`] so the binary and the integration tests
//! build the same router.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
