//! Single-slot cancellable timer.
//!
//! Both delayed actions in this crate — the history refresh debounce and
//! the acquisition retry/restart delay — share the same shape: at most one
//! pending timer per purpose, where arming a new one replaces whatever was
//! pending. [`SingleSlotTimer`] formalizes that shape instead of scattering
//! ad hoc handle juggling across call sites.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A timer slot holding at most one pending delayed action.
///
/// [`schedule`](Self::schedule) aborts any pending action before arming the
/// new one, which makes trailing-edge debouncing a one-liner: every call
/// re-arms, and only a call followed by a full quiet window fires.
///
/// Dropping the timer aborts whatever is pending.
#[derive(Debug, Default)]
pub struct SingleSlotTimer {
    slot: Mutex<Option<JoinHandle<()>>>,
}

impl SingleSlotTimer {
    /// Creates an empty timer slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer: after `delay`, run `action`.
    ///
    /// Any previously scheduled action that has not yet fired is cancelled
    /// and replaced. Must be called from within a tokio runtime.
    ///
    /// An action may re-arm its own slot: the new handle is stored before
    /// the old one is aborted, and a finishing action has no further
    /// suspension points, so the self-abort cannot kill the replacement.
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });

        let previous = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(handle);

        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Cancels the pending action, if any.
    pub fn cancel(&self) {
        let previous = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Returns `true` if an action is scheduled and has not yet finished.
    pub fn is_armed(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SingleSlotTimer {
    fn drop(&mut self) {
        if let Some(handle) = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            handle.abort();
        }
    }
}
