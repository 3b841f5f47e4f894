//! Status poller - mirrors server status into the surface
//!
//! Runs forever from start-up. Each cycle fetches `/status` once and applies
//! whichever fields are present; failures are skipped without a trace on
//! screen. The next cycle starts a fixed delay after the previous one
//! finished, so a slow server stretches the cadence instead of queueing
//! requests.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::{ControlApi, StatusSnapshot};
use crate::ui::ControlSurface;

pub struct StatusPoller<A> {
    api: Arc<A>,
    surface: Arc<dyn ControlSurface>,
    interval: Duration,
}

impl<A: ControlApi> StatusPoller<A> {
    pub fn new(api: Arc<A>, surface: Arc<dyn ControlSurface>, interval: Duration) -> Self {
        Self {
            api,
            surface,
            interval,
        }
    }

    /// Start the polling loop. The first poll is issued immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        info!("Status polling every {:?}", self.interval);
        loop {
            self.poll_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One poll cycle; returns whether the surface was updated from a response
    pub async fn poll_once(&self) -> bool {
        match self.api.status().await {
            Ok(status) => {
                apply_status(self.surface.as_ref(), &status);
                true
            }
            Err(e) => {
                debug!("Status poll skipped: {}", e);
                false
            }
        }
    }
}

/// Apply the fields present in `status`, leaving the rest of the surface as is
pub fn apply_status(surface: &dyn ControlSurface, status: &StatusSnapshot) {
    if let Some(gesture) = status.last_gesture.as_deref().filter(|g| !g.is_empty()) {
        surface.set_gesture_text(gesture);
    }
    if let Some(frames) = status.frames_processed {
        surface.set_frames_processed(frames);
    }
    if let Some(confidence) = status.last_confidence {
        surface.set_last_confidence(confidence);
    }
}
