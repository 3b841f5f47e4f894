//! HTTP seam to the gesture-recognition server
//!
//! Every component talks to the server through [`ControlApi`], so the
//! settings, snapshot and status flows can be exercised against an
//! in-memory server in tests.

mod client;
mod types;

#[cfg(test)]
pub mod testing;

pub use client::HttpControlApi;
pub use types::{Settings, SnapshotRequest, SnapshotResult, StatusSnapshot};

use std::future::Future;
use thiserror::Error;

/// Errors returned by the control endpoints
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or body transfer failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),

    /// Response body was not the expected JSON
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The three endpoints consumed by the control surface
pub trait ControlApi: Send + Sync + 'static {
    /// `POST /update_settings` with the full settings object
    fn update_settings(
        &self,
        settings: &Settings,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `POST /snapshot` with an encoded frame
    fn snapshot(
        &self,
        request: &SnapshotRequest,
    ) -> impl Future<Output = Result<SnapshotResult, ApiError>> + Send;

    /// `GET /status`
    fn status(&self) -> impl Future<Output = Result<StatusSnapshot, ApiError>> + Send;
}
