//! `reqwest` implementation of the control endpoints

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{ApiError, ControlApi, Settings, SnapshotRequest, SnapshotResult, StatusSnapshot};
use crate::config::ServerConfig;

const UPDATE_SETTINGS_PATH: &str = "update_settings";
const SNAPSHOT_PATH: &str = "snapshot";
const STATUS_PATH: &str = "status";

/// HTTP client for a single gesture-recognition server
#[derive(Clone)]
pub struct HttpControlApi {
    client: Client,
    base_url: String,
}

impl HttpControlApi {
    /// Create a client for the configured server
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Absolute URL of an endpoint on this server
    pub fn endpoint(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }
}

/// Join a base URL and an endpoint path with exactly one slash
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl ControlApi for HttpControlApi {
    async fn update_settings(&self, settings: &Settings) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(UPDATE_SETTINGS_PATH))
            .json(settings)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        debug!("Settings accepted by server ({})", status);
        Ok(())
    }

    async fn snapshot(&self, request: &SnapshotRequest) -> Result<SnapshotResult, ApiError> {
        // The server reports rejections as JSON bodies on 4xx responses, so
        // the body is parsed whatever the status code.
        let body = self
            .client
            .post(self.endpoint(SNAPSHOT_PATH))
            .json(request)
            .send()
            .await?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn status(&self) -> Result<StatusSnapshot, ApiError> {
        let response = self.client.get(self.endpoint(STATUS_PATH)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{DisplayedFrame, FrameSlot};
    use crate::snapshot::{SnapshotOutcome, SnapshotRequester};
    use crate::ui::testing::RecordingSurface;
    use crate::ui::Notification;
    use image::{Rgba, RgbaImage};
    use reqwest::StatusCode;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answer exactly one request with a canned response. The handle yields
    /// the raw request that was received.
    async fn serve_once(
        status_line: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> (HttpControlApi, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        // Bypass any proxy from the environment; the server is local
        let api = HttpControlApi {
            client: Client::builder().no_proxy().build().unwrap(),
            base_url: format!("http://{}", listener.local_addr().unwrap()),
        };

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                content_type,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (api, server)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let Some(header_end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    fn settings() -> Settings {
        Settings {
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
            show_landmarks: true,
            show_fps: false,
        }
    }

    fn snapshot_request() -> SnapshotRequest {
        SnapshotRequest {
            image: "data:image/png;base64,AAAA".to_string(),
        }
    }

    fn loaded_frames() -> FrameSlot {
        let frames = FrameSlot::new();
        frames.show(DisplayedFrame::new(
            RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])),
            4,
            4,
        ));
        frames
    }

    #[test]
    fn test_endpoint_url_slashes() {
        assert_eq!(
            endpoint_url("http://127.0.0.1:5000", "status"),
            "http://127.0.0.1:5000/status"
        );
        assert_eq!(
            endpoint_url("http://127.0.0.1:5000/", "/snapshot"),
            "http://127.0.0.1:5000/snapshot"
        );
        assert_eq!(
            endpoint_url("http://host/panel/", "update_settings"),
            "http://host/panel/update_settings"
        );
    }

    #[test]
    fn test_client_uses_configured_base() {
        let config = ServerConfig {
            base_url: "http://gestures.local:8080/".to_string(),
            request_timeout_ms: 1000,
        };
        let api = HttpControlApi::new(&config).unwrap();
        assert_eq!(api.endpoint("video_feed"), "http://gestures.local:8080/video_feed");
    }

    #[tokio::test]
    async fn test_settings_push_posts_json() {
        let (api, server) = serve_once("200 OK", "application/json", r#"{"status":"ok"}"#).await;

        api.update_settings(&settings()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /update_settings "));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["min_detection_confidence"], 0.7);
        assert_eq!(json["show_fps"], false);
    }

    #[tokio::test]
    async fn test_settings_push_rejects_error_status() {
        let (api, _server) =
            serve_once("500 Internal Server Error", "text/html", "<h1>boom</h1>").await;

        let err = api.update_settings(&settings()).await.unwrap_err();
        assert!(matches!(err, ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
    }

    #[tokio::test]
    async fn test_snapshot_saved() {
        let (api, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"status":"saved","filename":"a.png"}"#,
        )
        .await;

        let result = api.snapshot(&snapshot_request()).await.unwrap();
        assert!(result.is_saved());
        assert_eq!(result.filename.as_deref(), Some("a.png"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /snapshot "));
        assert!(request.contains(r#""image":"data:image/png;base64,AAAA""#));
    }

    #[tokio::test]
    async fn test_snapshot_error_body_reads_as_not_saved() {
        let (api, _server) = serve_once(
            "400 Bad Request",
            "application/json",
            r#"{"error":"no image provided"}"#,
        )
        .await;

        let result = api.snapshot(&snapshot_request()).await.unwrap();
        assert!(!result.is_saved());
        assert_eq!(result.status, None);
    }

    #[tokio::test]
    async fn test_snapshot_non_json_body_is_decode_error() {
        let (api, _server) =
            serve_once("500 Internal Server Error", "text/html", "<h1>boom</h1>").await;

        let err = api.snapshot(&snapshot_request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_snapshot_replies_map_to_notifications() {
        let (api, _server) = serve_once(
            "400 Bad Request",
            "application/json",
            r#"{"error":"no image provided"}"#,
        )
        .await;
        let surface = Arc::new(RecordingSurface::new());
        let requester = SnapshotRequester::new(Arc::new(api), loaded_frames(), surface.clone());
        assert_eq!(requester.request().await, SnapshotOutcome::Rejected);
        assert_eq!(surface.notifications(), vec![Notification::SnapshotFailed]);

        let (api, _server) = serve_once("502 Bad Gateway", "text/html", "<h1>down</h1>").await;
        let surface = Arc::new(RecordingSurface::new());
        let requester = SnapshotRequester::new(Arc::new(api), loaded_frames(), surface.clone());
        assert_eq!(requester.request().await, SnapshotOutcome::Error);
        assert_eq!(surface.notifications(), vec![Notification::SnapshotError]);
    }

    #[tokio::test]
    async fn test_status_partial_body() {
        let (api, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"frames_processed": 42.0, "last_gesture": "Fist"}"#,
        )
        .await;

        let status = api.status().await.unwrap();
        assert_eq!(status.frames_processed, Some(42));
        assert_eq!(status.last_gesture.as_deref(), Some("Fist"));
        assert_eq!(status.last_confidence, None);

        assert!(server.await.unwrap().starts_with("GET /status "));
    }

    #[tokio::test]
    async fn test_status_rejects_error_status() {
        let (api, _server) = serve_once(
            "503 Service Unavailable",
            "application/json",
            r#"{"frames_processed": 1}"#,
        )
        .await;

        let err = api.status().await.unwrap_err();
        assert!(matches!(err, ApiError::Status(StatusCode::SERVICE_UNAVAILABLE)));
    }
}
