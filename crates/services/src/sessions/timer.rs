use tokio::time::{Duration, Instant, sleep_until};

/// Handle to a scheduled auto-advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    id: u64,
    deadline: Instant,
}

impl TimerHandle {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Resolves once the deadline has passed.
    ///
    /// Waiting does not fire the timer; hand the handle back to
    /// `AdvanceTimer::claim` (or `QuizEngine::fire`) afterwards.
    pub async fn elapsed(self) {
        sleep_until(self.deadline).await;
    }
}

/// Cancelable one-shot timer with at most one live handle.
///
/// Scheduling replaces any pending handle; a replaced or canceled handle can
/// never be claimed.
#[derive(Debug, Default)]
pub struct AdvanceTimer {
    pending: Option<TimerHandle>,
    next_id: u64,
}

impl AdvanceTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a fire `delay` from now, canceling any pending handle.
    pub fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.schedule_at(Instant::now() + delay)
    }

    pub fn schedule_at(&mut self, deadline: Instant) -> TimerHandle {
        if let Some(previous) = self.cancel() {
            tracing::debug!(id = previous.id, "replacing pending auto-advance");
        }
        self.next_id += 1;
        let handle = TimerHandle {
            id: self.next_id,
            deadline,
        };
        self.pending = Some(handle);
        handle
    }

    /// Cancel the pending handle. No-op when nothing is pending.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.pending.take()
    }

    #[must_use]
    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume `handle` if it is still the live one and its deadline passed.
    pub fn claim(&mut self, handle: TimerHandle) -> bool {
        if self.pending != Some(handle) || Instant::now() < handle.deadline {
            return false;
        }
        self.pending = None;
        true
    }
}
