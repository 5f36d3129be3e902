//! # Copy Feedback Controller
//!
//! Copies sample text to a [`Clipboard`] and drives the per-instance
//! "copied" indicator. Each mounted instance owns at most one reversion
//! timer: a tokio task whose abort handle is stored next to the instance's
//! state. A new copy aborts the old task before scheduling a fresh one, and
//! unmounting aborts whatever is pending.
//!
//! Timer tasks hold a weak reference to the instance table, so a dropped
//! controller never keeps state alive through its timers.
//!
//! Clipboard writes are awaited, so two copies on one instance can finish
//! out of order. Every call reserves a sequence number before writing; a
//! write that completes after a newer call started is discarded and the
//! newer call alone sets the status and deadline.

use crate::clipboard::BoxedClipboard;
use crate::error::{WidgetError, WidgetResult};
use crate::feedback::{CopyFeedback, CopyStatus, FeedbackToken, COPY_FEEDBACK_WINDOW};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

#[derive(Debug)]
struct Slot {
    /// Distinguishes this mount from an earlier mount under the same id
    epoch: u64,
    /// Sequence number of the most recent `copy` call
    calls: u64,
    feedback: CopyFeedback,
    deadline: Option<Instant>,
    timer: Option<AbortHandle>,
}

impl Slot {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.deadline = None;
    }
}

type Slots = Mutex<HashMap<String, Slot>>;

fn lock(slots: &Slots) -> MutexGuard<'_, HashMap<String, Slot>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-page copy feedback, keyed by block instance id
pub struct CopyFeedbackController {
    clipboard: BoxedClipboard,
    window: Duration,
    slots: Arc<Slots>,
    epochs: AtomicU64,
}

impl CopyFeedbackController {
    /// Create a controller with the default 2000 ms window
    pub fn new(clipboard: BoxedClipboard) -> Self {
        Self {
            clipboard,
            window: COPY_FEEDBACK_WINDOW,
            slots: Arc::new(Mutex::new(HashMap::new())),
            epochs: AtomicU64::new(0),
        }
    }

    /// Builder: override how long feedback stays visible
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Backend name of the underlying clipboard
    pub fn clipboard_backend(&self) -> &'static str {
        self.clipboard.backend_name()
    }

    /// Register an instance. Mounting an already mounted id is a no-op.
    pub fn mount(&self, instance_id: impl Into<String>) {
        let epoch = self.epochs.fetch_add(1, Ordering::Relaxed);
        lock(&self.slots)
            .entry(instance_id.into())
            .or_insert_with(|| Slot {
                epoch,
                calls: 0,
                feedback: CopyFeedback::new(),
                deadline: None,
                timer: None,
            });
    }

    /// Remove an instance, cancelling its pending reversion.
    ///
    /// Returns false if the instance was not mounted.
    pub fn unmount(&self, instance_id: &str) -> bool {
        match lock(&self.slots).remove(instance_id) {
            Some(mut slot) => {
                slot.cancel_timer();
                debug!("Unmounted copy feedback for {}", instance_id);
                true
            }
            None => false,
        }
    }

    /// Remove every instance, cancelling all pending reversions
    pub fn unmount_all(&self) {
        for (_, mut slot) in lock(&self.slots).drain() {
            slot.cancel_timer();
        }
    }

    pub fn is_mounted(&self, instance_id: &str) -> bool {
        lock(&self.slots).contains_key(instance_id)
    }

    /// Copy `text` for `instance_id` and (re)start its feedback window.
    ///
    /// The clipboard write is awaited: the instance shows `Copied` only when
    /// the write succeeded and `Failed` otherwise. Both revert to `Idle` once
    /// the window elapses after the most recent call.
    ///
    /// If a newer call for the same instance starts while this write is in
    /// flight, this call's outcome is dropped and the status left by the
    /// newer call is returned.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn copy(&self, instance_id: &str, text: &str) -> WidgetResult<CopyStatus> {
        let (epoch, call) = {
            let mut slots = lock(&self.slots);
            let slot = slots
                .get_mut(instance_id)
                .ok_or_else(|| unknown_instance(instance_id))?;
            slot.calls += 1;
            (slot.epoch, slot.calls)
        };

        let result = self.clipboard.write_text(text).await;

        let mut slots = lock(&self.slots);
        // The instance may have been unmounted (or remounted) while the
        // write was in flight
        let slot = slots
            .get_mut(instance_id)
            .filter(|slot| slot.epoch == epoch)
            .ok_or_else(|| unknown_instance(instance_id))?;

        if slot.calls != call {
            let status = slot.feedback.status();
            debug!(
                "Copy {} for {} superseded by call {}",
                call, instance_id, slot.calls
            );
            return result.map(|()| status);
        }

        let token = match &result {
            Ok(()) => slot.feedback.confirm(),
            Err(e) => {
                warn!(
                    "Clipboard write via {} failed for {}: {}",
                    self.clipboard.backend_name(),
                    instance_id,
                    e
                );
                slot.feedback.fail()
            }
        };

        slot.cancel_timer();
        slot.deadline = Some(Instant::now() + self.window);
        slot.timer = Some(spawn_reversion(
            Arc::downgrade(&self.slots),
            instance_id.to_string(),
            slot.epoch,
            token,
            self.window,
        ));
        let status = slot.feedback.status();
        drop(slots);

        debug!("Copy feedback for {} is {}", instance_id, status);
        result.map(|()| status)
    }

    /// Current status, or `None` if the instance is not mounted
    pub fn status(&self, instance_id: &str) -> Option<CopyStatus> {
        lock(&self.slots)
            .get(instance_id)
            .map(|slot| slot.feedback.status())
    }

    /// True while `instance_id` is showing the "copied" confirmation
    pub fn is_active(&self, instance_id: &str) -> bool {
        self.status(instance_id) == Some(CopyStatus::Copied)
    }

    /// When the pending reversion of `instance_id` fires
    pub fn deadline(&self, instance_id: &str) -> Option<Instant> {
        lock(&self.slots)
            .get(instance_id)
            .and_then(|slot| slot.deadline)
    }

    /// Mounted instance ids (unordered)
    pub fn instance_ids(&self) -> Vec<String> {
        lock(&self.slots).keys().cloned().collect()
    }
}

impl Drop for CopyFeedbackController {
    fn drop(&mut self) {
        self.unmount_all();
    }
}

fn unknown_instance(instance_id: &str) -> WidgetError {
    WidgetError::UnknownInstance {
        instance_id: instance_id.to_string(),
    }
}

fn spawn_reversion(
    slots: Weak<Slots>,
    instance_id: String,
    epoch: u64,
    token: FeedbackToken,
    window: Duration,
) -> AbortHandle {
    tokio::spawn(async move {
        tokio::time::sleep(window).await;

        let Some(slots) = slots.upgrade() else {
            return;
        };
        let mut slots = lock(&slots);
        if let Some(slot) = slots.get_mut(&instance_id) {
            if slot.epoch == epoch && slot.feedback.revert(token) {
                slot.timer = None;
                slot.deadline = None;
                debug!("Copy feedback for {} reverted", instance_id);
            }
        }
    })
    .abort_handle()
}
