//! Snapshot requester - captures the displayed frame and asks the server to
//! persist it
//!
//! A snapshot is always operator-initiated, so every attempt that reaches the
//! server ends in exactly one notification. When nothing has been displayed
//! yet the action is a silent no-op: no request, no notification.

mod capture;

pub use capture::{capture, encode_data_url};

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::{ControlApi, SnapshotRequest, SnapshotResult};
use crate::frame::FrameSlot;
use crate::ui::{ControlSurface, Notification};

/// How a snapshot attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// No frame to capture; nothing was sent
    Unavailable,
    /// Server saved the frame
    Saved { filename: Option<String> },
    /// Server answered without saving
    Rejected,
    /// Encoding, transport or response parsing failed
    Error,
}

impl SnapshotOutcome {
    fn notification(&self) -> Option<Notification> {
        match self {
            SnapshotOutcome::Unavailable => None,
            SnapshotOutcome::Saved { filename } => Some(Notification::SnapshotSaved {
                filename: filename.clone(),
            }),
            SnapshotOutcome::Rejected => Some(Notification::SnapshotFailed),
            SnapshotOutcome::Error => Some(Notification::SnapshotError),
        }
    }
}

pub struct SnapshotRequester<A> {
    api: Arc<A>,
    frames: FrameSlot,
    surface: Arc<dyn ControlSurface>,
}

impl<A> Clone for SnapshotRequester<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            frames: self.frames.clone(),
            surface: self.surface.clone(),
        }
    }
}

impl<A: ControlApi> SnapshotRequester<A> {
    pub fn new(api: Arc<A>, frames: FrameSlot, surface: Arc<dyn ControlSurface>) -> Self {
        Self {
            api,
            frames,
            surface,
        }
    }

    /// Capture, upload and report one snapshot
    pub async fn request(&self) -> SnapshotOutcome {
        let outcome = self.capture_and_upload().await;
        if let Some(notification) = outcome.notification() {
            self.surface.notify(&notification);
        }
        outcome
    }

    async fn capture_and_upload(&self) -> SnapshotOutcome {
        // Capture synchronously, before any await, so the pixels are the
        // ones on screen when the action fired
        let Some(bitmap) = self.frames.with_current(|frame| frame.and_then(capture)) else {
            debug!("Snapshot skipped: no frame displayed yet");
            return SnapshotOutcome::Unavailable;
        };

        let image = match encode_data_url(&bitmap) {
            Ok(url) => url,
            Err(e) => {
                error!("{:#}", e);
                return SnapshotOutcome::Error;
            }
        };

        debug!(
            "Uploading {}x{} snapshot ({} bytes encoded)",
            bitmap.width(),
            bitmap.height(),
            image.len()
        );

        match self.api.snapshot(&SnapshotRequest { image }).await {
            Ok(result) => Self::outcome_for(result),
            Err(e) => {
                error!("Snapshot upload failed: {}", e);
                SnapshotOutcome::Error
            }
        }
    }

    fn outcome_for(result: SnapshotResult) -> SnapshotOutcome {
        if result.is_saved() {
            info!("Snapshot saved: {:?}", result.filename);
            SnapshotOutcome::Saved {
                filename: result.filename,
            }
        } else {
            warn!("Snapshot not saved (status {:?})", result.status);
            SnapshotOutcome::Rejected
        }
    }
}
