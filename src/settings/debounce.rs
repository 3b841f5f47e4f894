//! Trailing-edge debouncer
//!
//! A single background task owns the pending value and its timer. Every
//! trigger replaces the pending value and pushes the deadline out by the
//! full window; when the window elapses undisturbed the action runs once
//! with the latest value. Actions are spawned, so a slow action never holds
//! back the next window and is never cancelled by it.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start the debouncer task. Must be called inside a tokio runtime.
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            let timer = sleep(delay);
            tokio::pin!(timer);

            loop {
                tokio::select! {
                    msg = rx.recv() => match msg {
                        Some(value) => {
                            if pending.replace(value).is_some() {
                                debug!("Debounce window re-armed");
                            }
                            timer.as_mut().reset(Instant::now() + delay);
                        }
                        None => break,
                    },

                    _ = &mut timer, if pending.is_some() => {
                        if let Some(value) = pending.take() {
                            tokio::spawn(action(value));
                        }
                    }
                }
            }
        });

        Self { tx, task }
    }

    /// Schedule `value`, cancelling whatever was pending
    pub fn trigger(&self, value: T) {
        if self.tx.send(value).is_err() {
            warn!("Debouncer task is gone, dropping update");
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
