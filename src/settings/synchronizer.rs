//! Settings synchronizer
//!
//! Owns the two confidence sliders and the two overlay toggles. Every change
//! updates the on-screen label right away and re-arms a debounced push of the
//! full settings object.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::controls::{ControlError, RangeControl};
use super::debounce::Debouncer;
use crate::api::{ControlApi, Settings};
use crate::config::SettingsConfig;
use crate::ui::ControlSurface;

pub struct SettingsSynchronizer {
    detection: RangeControl,
    tracking: RangeControl,
    show_landmarks: bool,
    show_fps: bool,
    surface: Arc<dyn ControlSurface>,
    debouncer: Debouncer<Settings>,
}

impl SettingsSynchronizer {
    /// Build the controls from config, render their labels and start the
    /// debouncer. Nothing is pushed until the first change.
    pub fn new<A: ControlApi>(
        api: Arc<A>,
        surface: Arc<dyn ControlSurface>,
        initial: &SettingsConfig,
    ) -> Self {
        let detection = RangeControl::unit(initial.slider_step, initial.min_detection_confidence);
        let tracking = RangeControl::unit(initial.slider_step, initial.min_tracking_confidence);

        surface.set_detection_label(&detection.label());
        surface.set_tracking_label(&tracking.label());

        let debouncer = Debouncer::new(initial.debounce(), move |settings: Settings| {
            let api = api.clone();
            async move { push_settings(api.as_ref(), &settings).await }
        });

        Self {
            detection,
            tracking,
            show_landmarks: initial.show_landmarks,
            show_fps: initial.show_fps,
            surface,
            debouncer,
        }
    }

    /// Settings built from the current control values
    pub fn current(&self) -> Settings {
        Settings {
            min_detection_confidence: self.detection.value(),
            min_tracking_confidence: self.tracking.value(),
            show_landmarks: self.show_landmarks,
            show_fps: self.show_fps,
        }
    }

    pub fn set_detection_confidence(&mut self, raw: &str) -> Result<f64, ControlError> {
        let value = self.detection.set_raw(raw)?;
        self.surface.set_detection_label(&self.detection.label());
        self.schedule_push();
        Ok(value)
    }

    pub fn set_tracking_confidence(&mut self, raw: &str) -> Result<f64, ControlError> {
        let value = self.tracking.set_raw(raw)?;
        self.surface.set_tracking_label(&self.tracking.label());
        self.schedule_push();
        Ok(value)
    }

    pub fn set_show_landmarks(&mut self, show: bool) {
        self.show_landmarks = show;
        self.schedule_push();
    }

    pub fn set_show_fps(&mut self, show: bool) {
        self.show_fps = show;
        self.schedule_push();
    }

    fn schedule_push(&self) {
        self.debouncer.trigger(self.current());
    }
}

/// Send one settings object; failures are logged and dropped.
///
/// The next change re-arms the debouncer, which is the only recovery path.
pub async fn push_settings<A: ControlApi>(api: &A, settings: &Settings) {
    debug!("Pushing settings: {:?}", settings);
    match api.update_settings(settings).await {
        Ok(()) => info!(
            "Settings updated (detection {:.2}, tracking {:.2}, landmarks {}, fps {})",
            settings.min_detection_confidence,
            settings.min_tracking_confidence,
            settings.show_landmarks,
            settings.show_fps
        ),
        Err(e) => warn!("Settings update failed: {}", e),
    }
}
