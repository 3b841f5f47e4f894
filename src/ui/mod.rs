//! Operator-facing surface: labels, status readouts and notifications

pub mod notifications;
mod terminal;

pub use notifications::Notification;
pub use terminal::TerminalSurface;

/// Everything the control logic is allowed to change on screen.
///
/// Implementations are called from the runtime thread and must not block.
pub trait ControlSurface: Send + Sync {
    /// Live value label next to the detection confidence slider
    fn set_detection_label(&self, text: &str);

    /// Live value label next to the tracking confidence slider
    fn set_tracking_label(&self, text: &str);

    /// Last recognized gesture
    fn set_gesture_text(&self, text: &str);

    /// Frames processed by the server so far
    fn set_frames_processed(&self, count: u64);

    /// Confidence of the last recognized gesture
    fn set_last_confidence(&self, confidence: f64);

    /// One-shot message for the operator
    fn notify(&self, notification: &Notification);
}

#[cfg(test)]
pub mod testing {
    //! Surface that records every call, for assertions in tests

    use super::{ControlSurface, Notification};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceEvent {
        DetectionLabel(String),
        TrackingLabel(String),
        Gesture(String),
        Frames(u64),
        Confidence(f64),
        Notice(Notification),
    }

    #[derive(Default)]
    pub struct RecordingSurface {
        events: Mutex<Vec<SurfaceEvent>>,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<SurfaceEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn notifications(&self) -> Vec<Notification> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    SurfaceEvent::Notice(notification) => Some(notification),
                    _ => None,
                })
                .collect()
        }

        pub fn clear(&self) {
            self.events.lock().unwrap().clear();
        }

        fn record(&self, event: SurfaceEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl ControlSurface for RecordingSurface {
        fn set_detection_label(&self, text: &str) {
            self.record(SurfaceEvent::DetectionLabel(text.to_string()));
        }

        fn set_tracking_label(&self, text: &str) {
            self.record(SurfaceEvent::TrackingLabel(text.to_string()));
        }

        fn set_gesture_text(&self, text: &str) {
            self.record(SurfaceEvent::Gesture(text.to_string()));
        }

        fn set_frames_processed(&self, count: u64) {
            self.record(SurfaceEvent::Frames(count));
        }

        fn set_last_confidence(&self, confidence: f64) {
            self.record(SurfaceEvent::Confidence(confidence));
        }

        fn notify(&self, notification: &Notification) {
            self.record(SurfaceEvent::Notice(notification.clone()));
        }
    }
}
