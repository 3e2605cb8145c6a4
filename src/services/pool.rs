// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed-width worker pool for blocking per-user work.
//!
//! Each submitted closure waits for a slot, then runs on tokio's blocking
//! thread pool while holding it. Closures that arrive while all slots are
//! busy queue up instead of being rejected.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};

/// Name and width of a worker pool.
pub struct WorkerPool {
    name: &'static str,
    width: usize,
    slots: Arc<Semaphore>,
    closed: AtomicBool,
    outstanding: Arc<Outstanding>,
}

/// Count of submitted closures that have not finished yet.
#[derive(Default)]
struct Outstanding {
    count: AtomicUsize,
    idle: Notify,
}

/// Decrements the outstanding count when the task ends, however it ends.
struct OutstandingGuard(Arc<Outstanding>);

impl Drop for OutstandingGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Handle to a task submitted to a [`WorkerPool`].
pub type PoolHandle<T> = JoinHandle<Result<T>>;

impl WorkerPool {
    /// Create a pool running at most `width` closures at a time.
    pub fn new(name: &'static str, width: usize) -> Result<Self> {
        if width == 0 || width > Semaphore::MAX_PERMITS {
            return Err(AppError::InvalidPoolSize(name));
        }
        tracing::debug!(pool = name, width, "Worker pool created");
        Ok(Self {
            name,
            width,
            slots: Arc::new(Semaphore::new(width)),
            closed: AtomicBool::new(false),
            outstanding: Arc::new(Outstanding::default()),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Queue `work` on the pool.
    ///
    /// Fails with [`AppError::PoolClosed`] once the pool has been closed.
    /// A panic inside `work` resolves the handle to [`AppError::TaskFailed`]
    /// and leaves the pool usable. Must be called from within a tokio runtime.
    pub fn spawn<F, T>(&self, work: F) -> Result<PoolHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.is_closed() {
            return Err(AppError::PoolClosed(self.name));
        }

        let name = self.name;
        let slots = self.slots.clone();
        self.outstanding.count.fetch_add(1, Ordering::AcqRel);
        let guard = OutstandingGuard(self.outstanding.clone());
        Ok(tokio::spawn(async move {
            let _guard = guard;
            let permit = slots
                .acquire_owned()
                .await
                .map_err(|_| AppError::PoolClosed(name))?;

            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                work()
            })
            .await
            .map_err(|e| AppError::TaskFailed(format!("{} pool task: {}", name, e)))
        }))
    }

    /// Stop accepting new work. Already submitted work still runs.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::info!(pool = self.name, "Worker pool closed");
        }
    }

    /// Number of submitted closures that are queued or running.
    pub fn outstanding(&self) -> usize {
        self.outstanding.count.load(Ordering::Acquire)
    }

    /// Close the pool and wait until every submitted closure has finished.
    pub async fn shutdown(&self) {
        self.close();
        loop {
            // Register interest before checking so a wakeup can't slip by.
            let idle = self.outstanding.idle.notified();
            if self.outstanding() == 0 {
                break;
            }
            idle.await;
        }
        tracing::info!(pool = self.name, "Worker pool drained");
    }
}
