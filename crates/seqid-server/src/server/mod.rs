//! HTTP surface over [`seqid`].
//!
//! - [`config`] - CLI/env configuration.
//! - [`routes`] - axum router and handlers.
//! - [`error`] - error to response mapping.
//! - [`state`] - shared handler state.
//! - [`telemetry`] - logging and optional OpenTelemetry export.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
