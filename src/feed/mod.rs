//! Live MJPEG feed viewer
//!
//! Follows the server's `/video_feed` stream and keeps the latest decoded
//! frame in the shared [`FrameSlot`], which is what the operator "sees" and
//! what snapshots capture.

mod mjpeg;

pub use mjpeg::JpegSplitter;

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::frame::{DisplayedFrame, FrameSlot};

pub const VIDEO_FEED_PATH: &str = "video_feed";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct FeedViewer {
    client: Client,
    url: String,
    frames: FrameSlot,
    display_size: (u32, u32),
    reconnect_delay: Duration,
}

impl FeedViewer {
    pub fn new(url: String, frames: FrameSlot, config: &FeedConfig) -> Result<Self> {
        // No overall timeout: the stream is meant to stay open
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to build feed HTTP client")?;

        Ok(Self {
            client,
            url,
            frames,
            display_size: (config.display_width, config.display_height),
            reconnect_delay: config.reconnect_delay(),
        })
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        loop {
            match self.follow_stream().await {
                Ok(frames) => info!("Video feed ended after {} frames", frames),
                Err(e) => warn!("Video feed error: {:#}", e),
            }
            tokio::time::sleep(self.reconnect_delay).await;
            debug!("Reconnecting to video feed at {}", self.url);
        }
    }

    /// Read one connection until it ends, returning the number of frames shown
    async fn follow_stream(&self) -> Result<u64> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to connect to video feed")?
            .error_for_status()
            .context("Video feed returned error status")?;

        info!("Connected to video feed at {}", self.url);

        let mut stream = response.bytes_stream();
        let mut splitter = JpegSplitter::new();
        let mut shown: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Video feed read failed")?;
            splitter.push(&chunk);

            while let Some(jpeg) = splitter.next_frame() {
                if self.show_jpeg(&jpeg) {
                    shown += 1;
                }
            }
        }

        debug!("Feed closed with {} unparsed bytes", splitter.buffered());
        Ok(shown)
    }

    fn show_jpeg(&self, jpeg: &[u8]) -> bool {
        match decode_frame(jpeg, self.display_size) {
            Ok(frame) => {
                self.frames.show(frame);
                true
            }
            Err(e) => {
                debug!("Skipping undecodable frame: {:#}", e);
                false
            }
        }
    }
}

/// Decode one JPEG into a displayable frame
pub fn decode_frame(jpeg: &[u8], display_size: (u32, u32)) -> Result<DisplayedFrame> {
    let image = image::load_from_memory_with_format(jpeg, image::ImageFormat::Jpeg)
        .context("Failed to decode JPEG frame")?
        .to_rgba8();
    Ok(DisplayedFrame::new(image, display_size.0, display_size.1))
}
