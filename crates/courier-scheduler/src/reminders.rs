// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delayed jobs keyed by event, cancellable as a group.
//!
//! This is the seam for an external calendar service. That service owns the
//! [`ReminderScheduler`] and must call [`ReminderScheduler::shutdown`] when it
//! stops. The gateway never schedules reminders, so `courier serve` does not
//! construct one.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::task::AbortHandle;
use tracing::debug;

type Pending = DashMap<String, HashMap<u64, AbortHandle>>;

/// One tokio task per reminder. Finished tasks remove their own handle.
#[derive(Default)]
pub struct ReminderScheduler {
    pending: Arc<Pending>,
    next_id: AtomicU64,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` at `fire_at` (immediately if already past). Returns the reminder id.
    pub fn schedule<F>(&self, event_id: &str, fire_at: DateTime<Utc>, job: F) -> u64
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let delay = (fire_at - Utc::now()).to_std().unwrap_or_default();
        let pending = Arc::clone(&self.pending);
        let event = event_id.to_string();

        // The entry guard is held across spawn so the task cannot remove its
        // handle before it has been inserted.
        let mut jobs = self.pending.entry(event_id.to_string()).or_default();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
            forget(&pending, &event, id);
        });
        jobs.insert(id, handle.abort_handle());
        drop(jobs);

        debug!(event_id, reminder_id = id, delay_ms = delay.as_millis() as u64, "reminder scheduled");
        id
    }

    /// Abort every pending reminder for `event_id`. Returns how many were aborted.
    pub fn cancel_event(&self, event_id: &str) -> usize {
        let Some((_, jobs)) = self.pending.remove(event_id) else {
            return 0;
        };
        for handle in jobs.values() {
            handle.abort();
        }
        debug!(event_id, cancelled = jobs.len(), "event reminders cancelled");
        jobs.len()
    }

    pub fn pending_count(&self, event_id: &str) -> usize {
        self.pending.get(event_id).map_or(0, |jobs| jobs.len())
    }

    /// Abort everything.
    pub fn shutdown(&self) {
        self.pending.retain(|_, jobs| {
            for handle in jobs.values() {
                handle.abort();
            }
            false
        });
    }
}

fn forget(pending: &Pending, event_id: &str, id: u64) {
    if let Some(mut jobs) = pending.get_mut(event_id) {
        jobs.remove(&id);
    }
    pending.remove_if(event_id, |_, jobs| jobs.is_empty());
}
