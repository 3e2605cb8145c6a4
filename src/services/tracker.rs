// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Background location tracker.
//!
//! One dedicated task walks every registered user, refreshes their
//! location and recomputes their rewards, then sleeps for the polling
//! interval. The stop signal is checked before every user and interrupts
//! the sleep, so stopping never waits out a full interval.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::services::TourGuideService;

/// Lifecycle of a [`Tracker`]. There is no way back from `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Not started yet
    Idle,
    Running,
    /// Stop requested, worker still finishing its current user
    Stopping,
    Stopped,
}

/// Handle to the background tracking task.
pub struct Tracker {
    shutdown_tx: watch::Sender<bool>,
    state: Arc<Mutex<TrackerState>>,
    completed_passes: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl Tracker {
    /// Spawn the tracking task. Must be called from within a tokio runtime.
    pub fn start(service: Arc<TourGuideService>, poll_interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let state = Arc::new(Mutex::new(TrackerState::Idle));
        let completed_passes = Arc::new(AtomicU64::new(0));

        let worker = TrackerWorker {
            service,
            poll_interval,
            shutdown_rx,
            state: state.clone(),
            completed_passes: completed_passes.clone(),
        };
        *state.lock() = TrackerState::Running;
        let handle = tokio::spawn(worker.run());

        Self {
            shutdown_tx,
            state,
            completed_passes,
            handle: Some(handle),
        }
    }

    pub fn state(&self) -> TrackerState {
        *self.state.lock()
    }

    /// Number of full passes over the user list completed so far.
    pub fn completed_passes(&self) -> u64 {
        self.completed_passes.load(Ordering::Acquire)
    }

    /// Ask the worker to exit. Idempotent.
    pub fn stop_tracking(&self) {
        {
            let mut state = self.state.lock();
            if *state != TrackerState::Running {
                return;
            }
            *state = TrackerState::Stopping;
        }
        info!("Tracker stop requested");
        self.shutdown_tx.send_replace(true);
    }

    /// Stop the worker and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.stop_tracking();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "Tracker task ended abnormally");
                *self.state.lock() = TrackerState::Stopped;
            }
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.stop_tracking();
    }
}

struct TrackerWorker {
    service: Arc<TourGuideService>,
    poll_interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
    state: Arc<Mutex<TrackerState>>,
    completed_passes: Arc<AtomicU64>,
}

impl TrackerWorker {
    async fn run(mut self) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Tracker started"
        );

        while !self.stop_requested() {
            if !self.track_all_users().await {
                break;
            }

            debug!("Tracker sleeping");
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() {
                        // Handle dropped without a stop signal
                        break;
                    }
                }
            }
        }

        *self.state.lock() = TrackerState::Stopped;
        info!("Tracker stopped");
    }

    fn stop_requested(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// One pass over all users. Returns `false` if stopped part way.
    async fn track_all_users(&self) -> bool {
        let users = self.service.all_users();
        debug!(users = users.len(), "Begin tracker pass");
        let started = Instant::now();
        let mut tracked = 0usize;
        let mut failed = 0usize;

        for user in users {
            if self.stop_requested() {
                info!(tracked, failed, "Tracker pass interrupted");
                return false;
            }

            let service = self.service.clone();
            let user_id = user.id;
            match tokio::task::spawn_blocking(move || service.track_user_location(&user)).await {
                Ok(Ok(_)) => tracked += 1,
                Ok(Err(e)) if e.is_per_user_fault() => {
                    warn!(user_id = %user_id, error = %e, "Failed to track user");
                    failed += 1;
                }
                Ok(Err(e)) => {
                    error!(user_id = %user_id, error = %e, "Tracking failed");
                    failed += 1;
                }
                Err(e) => {
                    error!(user_id = %user_id, error = %e, "Tracking task panicked");
                    failed += 1;
                }
            }
        }

        self.completed_passes.fetch_add(1, Ordering::AcqRel);
        info!(
            tracked,
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tracker pass finished"
        );
        true
    }
}
