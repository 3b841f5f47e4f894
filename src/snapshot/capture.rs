//! Offscreen capture of the displayed frame and PNG data-URL encoding

use anyhow::{Context, Result};
use base64::Engine;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::frame::DisplayedFrame;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Size of the capture bitmap: native size per axis, falling back to the
/// displayed size where the native size is zero
pub fn capture_size(frame: &DisplayedFrame) -> (u32, u32) {
    let (natural_width, natural_height) = frame.natural_size();
    let width = if natural_width > 0 {
        natural_width
    } else {
        frame.display_width
    };
    let height = if natural_height > 0 {
        natural_height
    } else {
        frame.display_height
    };
    (width, height)
}

/// Draw the frame into a fresh bitmap. `None` when the bitmap would be empty.
pub fn capture(frame: &DisplayedFrame) -> Option<RgbaImage> {
    let (width, height) = capture_size(frame);
    if width == 0 || height == 0 {
        return None;
    }

    let mut canvas = RgbaImage::new(width, height);
    let source = &frame.image;

    if source.dimensions() == (width, height) {
        imageops::replace(&mut canvas, source, 0, 0);
    } else if source.width() > 0 && source.height() > 0 {
        let scaled = imageops::resize(source, width, height, FilterType::Triangle);
        imageops::replace(&mut canvas, &scaled, 0, 0);
    }

    Some(canvas)
}

/// Encode a bitmap as a `data:image/png;base64,...` URL
pub fn encode_data_url(image: &RgbaImage) -> Result<String> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("Failed to encode snapshot as PNG")?;

    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    base64::engine::general_purpose::STANDARD.encode_string(&png, &mut url);
    Ok(url)
}
