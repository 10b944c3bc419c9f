//! Job gatekeeper
//!
//! One [`JobController`] is created at service start and shared by every
//! handler. It owns the exclusive section a job runs in and the cooperative
//! cancellation flag the running job samples before each message. Once
//! closed for shutdown, every job, running or queued, reads as cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard};

/// Process-wide exclusivity and cancellation for index jobs
#[derive(Debug, Default)]
pub struct JobController {
    gate: Mutex<()>,
    active: AtomicBool,
    cancel_requested: AtomicBool,
    closed: AtomicBool,
}

/// Held for the whole of one job; releasing it ends the exclusive section
#[derive(Debug)]
pub struct JobGuard<'a> {
    controller: &'a JobController,
    _permit: MutexGuard<'a, ()>,
}

impl JobController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the exclusive section, queueing behind a running job
    pub async fn begin(&self) -> JobGuard<'_> {
        if self.is_active() {
            log::info!("Index job already running; waiting for it to finish");
        }
        let permit = self.gate.lock().await;
        self.enter(permit)
    }

    /// Enter the exclusive section only if no job is running
    pub fn try_begin(&self) -> Option<JobGuard<'_>> {
        self.gate.try_lock().ok().map(|permit| self.enter(permit))
    }

    fn enter<'a>(&'a self, permit: MutexGuard<'a, ()>) -> JobGuard<'a> {
        // A cancel aimed at an earlier job must not stop this one
        self.cancel_requested.store(false, Ordering::Release);
        self.active.store(true, Ordering::Release);
        JobGuard {
            controller: self,
            _permit: permit,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Ask the running job to stop; returns false (no-op) when nothing runs
    pub fn request_cancel(&self) -> bool {
        if !self.is_active() {
            log::debug!("Cancel requested with no active index job");
            return false;
        }
        self.cancel_requested.store(true, Ordering::Release);
        true
    }

    /// Observe and clear the cancellation flag; always true once closed
    pub fn take_cancel(&self) -> bool {
        self.cancel_requested.swap(false, Ordering::AcqRel) || self.is_closed()
    }

    /// Stop accepting work: the running job is cancelled and queued jobs
    /// end as soon as they enter
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.request_cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Wait until no job holds the exclusive section
    pub async fn wait_idle(&self) {
        drop(self.gate.lock().await);
    }
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        self.controller.active.store(false, Ordering::Release);
        self.controller.cancel_requested.store(false, Ordering::Release);
    }
}
