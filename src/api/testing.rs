//! In-memory server for component tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use super::{ApiError, ControlApi, Settings, SnapshotRequest, SnapshotResult, StatusSnapshot};

/// Scripted reply for one request
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail,
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, ApiError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Fail => Err(ApiError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            )),
        }
    }
}

#[derive(Default)]
struct State {
    pushes: Vec<(Instant, Settings)>,
    completed_pushes: Vec<(Instant, Settings)>,
    fail_pushes: bool,
    push_latency: Duration,
    snapshot_requests: Vec<SnapshotRequest>,
    snapshot_reply: Option<Reply<SnapshotResult>>,
    status_replies: VecDeque<Reply<StatusSnapshot>>,
    status_calls: Vec<Instant>,
    status_latency: Duration,
}

/// Records every request and answers from a script.
///
/// Status polls beyond the script fail; snapshots without a scripted reply
/// fail.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<State>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_pushes(&self, fail: bool) {
        self.state.lock().unwrap().fail_pushes = fail;
    }

    pub fn pushes(&self) -> Vec<Settings> {
        self.state
            .lock()
            .unwrap()
            .pushes
            .iter()
            .map(|(_, settings)| *settings)
            .collect()
    }

    /// Make every settings push take `latency` before answering
    pub fn push_latency(&self, latency: Duration) {
        self.state.lock().unwrap().push_latency = latency;
    }

    /// Pushes that ran to completion, with the time each one finished
    pub fn completed_pushes(&self) -> Vec<(Instant, Settings)> {
        self.state.lock().unwrap().completed_pushes.clone()
    }

    pub fn reply_snapshot(&self, reply: Reply<SnapshotResult>) {
        self.state.lock().unwrap().snapshot_reply = Some(reply);
    }

    pub fn snapshot_requests(&self) -> Vec<SnapshotRequest> {
        self.state.lock().unwrap().snapshot_requests.clone()
    }

    pub fn queue_status(&self, reply: Reply<StatusSnapshot>) {
        self.state.lock().unwrap().status_replies.push_back(reply);
    }

    /// Make every status request take `latency` before answering
    pub fn status_latency(&self, latency: Duration) {
        self.state.lock().unwrap().status_latency = latency;
    }

    pub fn status_calls(&self) -> Vec<Instant> {
        self.state.lock().unwrap().status_calls.clone()
    }
}

impl ControlApi for MockApi {
    async fn update_settings(&self, settings: &Settings) -> Result<(), ApiError> {
        let latency = {
            let mut state = self.state.lock().unwrap();
            state.pushes.push((Instant::now(), *settings));
            state.push_latency
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock().unwrap();
        state.completed_pushes.push((Instant::now(), *settings));
        if state.fail_pushes {
            Reply::Fail.into_result()
        } else {
            Ok(())
        }
    }

    async fn snapshot(&self, request: &SnapshotRequest) -> Result<SnapshotResult, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.snapshot_requests.push(request.clone());
        state.snapshot_reply.clone().unwrap_or(Reply::Fail).into_result()
    }

    async fn status(&self) -> Result<StatusSnapshot, ApiError> {
        let latency = {
            let mut state = self.state.lock().unwrap();
            state.status_calls.push(Instant::now());
            state.status_latency
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock().unwrap();
        state
            .status_replies
            .pop_front()
            .unwrap_or(Reply::Fail)
            .into_result()
    }
}
