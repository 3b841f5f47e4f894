//! The live image currently on screen
//!
//! The feed viewer replaces the frame as new JPEGs arrive; the snapshot
//! requester reads whatever is displayed at the moment of capture.

use image::RgbaImage;
use std::sync::{Arc, RwLock};

/// A decoded frame plus the size it is displayed at
#[derive(Debug, Clone)]
pub struct DisplayedFrame {
    /// Pixels at native resolution
    pub image: RgbaImage,
    /// Displayed width
    pub display_width: u32,
    /// Displayed height
    pub display_height: u32,
}

impl DisplayedFrame {
    pub fn new(image: RgbaImage, display_width: u32, display_height: u32) -> Self {
        Self {
            image,
            display_width,
            display_height,
        }
    }

    /// Native size of the image, `(0, 0)` when it has no pixels
    pub fn natural_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Shared slot holding the displayed frame, if any
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    inner: Arc<RwLock<Option<DisplayedFrame>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed frame
    pub fn show(&self, frame: DisplayedFrame) {
        match self.inner.write() {
            Ok(mut slot) => *slot = Some(frame),
            Err(poisoned) => *poisoned.into_inner() = Some(frame),
        }
    }

    /// Run `f` against the displayed frame without cloning its pixels
    pub fn with_current<R>(&self, f: impl FnOnce(Option<&DisplayedFrame>) -> R) -> R {
        match self.inner.read() {
            Ok(slot) => f(slot.as_ref()),
            Err(poisoned) => f(poisoned.into_inner().as_ref()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.with_current(|frame| frame.is_some())
    }
}
