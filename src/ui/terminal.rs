//! Line-oriented terminal rendition of the control surface

use chrono::Local;
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

use super::{ControlSurface, Notification};

/// Current readouts, kept so the console can show them on request
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Readouts {
    pub detection_label: String,
    pub tracking_label: String,
    pub gesture: Option<String>,
    pub frames_processed: Option<u64>,
    pub last_confidence: Option<f64>,
}

struct Inner<W> {
    out: W,
    readouts: Readouts,
}

/// Control surface that prints to a terminal.
///
/// Labels and notifications are printed as they happen; the gesture line
/// only when it changes. Frame count and confidence change every poll and
/// are kept silent until [`TerminalSurface::print_readouts`].
pub struct TerminalSurface<W = std::io::Stdout> {
    inner: Mutex<Inner<W>>,
}

impl TerminalSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            inner: Mutex::new(Inner {
                out,
                readouts: Readouts::default(),
            }),
        }
    }

    /// Snapshot of the current readouts
    pub fn readouts(&self) -> Readouts {
        match self.inner.lock() {
            Ok(inner) => inner.readouts.clone(),
            Err(poisoned) => poisoned.into_inner().readouts.clone(),
        }
    }

    /// Print every readout on one line
    pub fn print_readouts(&self) {
        let readouts = self.readouts();
        let gesture = readouts.gesture.as_deref().unwrap_or("-");
        let frames = readouts
            .frames_processed
            .map(|count| count.to_string())
            .unwrap_or_else(|| "-".to_string());
        let confidence = readouts
            .last_confidence
            .map(|confidence| format!("{:.2}", confidence))
            .unwrap_or_else(|| "-".to_string());

        self.print(&format!(
            "detection {} | tracking {} | gesture {} | frames {} | confidence {}",
            readouts.detection_label, readouts.tracking_label, gesture, frames, confidence
        ));
    }

    /// Print one timestamped line
    pub fn print(&self, line: &str) {
        self.with_inner(|inner| write_line(&mut inner.out, line));
    }

    fn with_inner(&self, f: impl FnOnce(&mut Inner<W>)) {
        match self.inner.lock() {
            Ok(mut inner) => f(&mut inner),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

fn write_line<W: Write>(out: &mut W, line: &str) {
    let stamp = Local::now().format("%H:%M:%S");
    if let Err(e) = writeln!(out, "[{}] {}", stamp, line).and_then(|_| out.flush()) {
        warn!("Failed to write to terminal: {}", e);
    }
}

impl<W: Write + Send> ControlSurface for TerminalSurface<W> {
    fn set_detection_label(&self, text: &str) {
        self.with_inner(|inner| {
            inner.readouts.detection_label = text.to_string();
            write_line(&mut inner.out, &format!("detection confidence: {}", text));
        });
    }

    fn set_tracking_label(&self, text: &str) {
        self.with_inner(|inner| {
            inner.readouts.tracking_label = text.to_string();
            write_line(&mut inner.out, &format!("tracking confidence: {}", text));
        });
    }

    fn set_gesture_text(&self, text: &str) {
        self.with_inner(|inner| {
            if inner.readouts.gesture.as_deref() == Some(text) {
                return;
            }
            inner.readouts.gesture = Some(text.to_string());
            write_line(&mut inner.out, &format!("gesture: {}", text));
        });
    }

    fn set_frames_processed(&self, count: u64) {
        self.with_inner(|inner| inner.readouts.frames_processed = Some(count));
    }

    fn set_last_confidence(&self, confidence: f64) {
        self.with_inner(|inner| inner.readouts.last_confidence = Some(confidence));
    }

    fn notify(&self, notification: &Notification) {
        let marker = if notification.is_failure() { "!!" } else { "**" };
        self.with_inner(|inner| {
            write_line(&mut inner.out, &format!("{} {}", marker, notification))
        });
    }
}
