//! Wire types for the control endpoints

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status value the server reports for a persisted snapshot
pub const SNAPSHOT_SAVED: &str = "saved";

/// Detection and overlay settings pushed to the server
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Minimum hand detection confidence, in [0, 1]
    pub min_detection_confidence: f64,

    /// Minimum landmark tracking confidence, in [0, 1]
    pub min_tracking_confidence: f64,

    /// Draw hand landmarks on the video feed
    pub show_landmarks: bool,

    /// Draw the FPS counter on the video feed
    pub show_fps: bool,
}

/// Body of `POST /snapshot`
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotRequest {
    /// `data:image/png;base64,...` encoding of the captured frame
    pub image: String,
}

/// Response of `POST /snapshot`
///
/// Error responses (`{"error": "..."}`) carry no status and are read as a
/// failed save rather than a decode error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SnapshotResult {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,
}

impl SnapshotResult {
    pub fn is_saved(&self) -> bool {
        self.status.as_deref() == Some(SNAPSHOT_SAVED)
    }
}

/// Response of `GET /status`
///
/// Every field is optional; a missing or `null` field means "leave the
/// corresponding readout alone". A field of the wrong type is treated the
/// same way, so one odd value never drops the rest of the poll.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_gesture: Option<String>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub frames_processed: Option<u64>,

    #[serde(default, deserialize_with = "lenient_float")]
    pub last_confidence: Option<f64>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Accepts whole-valued floats such as `42.0` as well as integers
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    })
}

fn lenient_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        _ => None,
    })
}
