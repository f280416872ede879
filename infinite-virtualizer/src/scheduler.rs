use crate::{Direction, LoadState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Debouncing { direction: Direction, due_ms: u64 },
    Loading { direction: Direction, due_ms: u64 },
    // The shift happened; waiting for the host to paint it so the offset can be rewritten.
    Settling { direction: Direction },
}

/// What a scheduler transition asks the controller to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// The debounce fired for an edge with nothing behind it; back to idle.
    Suppressed,
    /// A load episode started: capture the scroll anchor now.
    Started,
    /// The loading delay elapsed: shift the window now.
    Shift(Direction),
}

/// Debounce + single-flight state machine: `Idle → Debouncing → Loading → Idle`.
///
/// Time only moves when the controller passes `now_ms`; the scheduler never reads a clock.
#[derive(Clone, Debug)]
pub(crate) struct LoadScheduler {
    phase: Phase,
    debounce_delay_ms: u64,
    loading_delay_ms: u64,
}

impl LoadScheduler {
    pub(crate) fn new(debounce_delay_ms: u64, loading_delay_ms: u64) -> Self {
        Self {
            phase: Phase::Idle,
            debounce_delay_ms,
            loading_delay_ms,
        }
    }

    pub(crate) fn state(&self) -> LoadState {
        match self.phase {
            Phase::Idle => LoadState::Idle,
            Phase::Debouncing { .. } => LoadState::Debouncing,
            Phase::Loading { .. } | Phase::Settling { .. } => LoadState::Loading,
        }
    }

    /// Direction of the pending debounce or the in-flight episode.
    pub(crate) fn direction(&self) -> Option<Direction> {
        match self.phase {
            Phase::Idle => None,
            Phase::Debouncing { direction, .. }
            | Phase::Loading { direction, .. }
            | Phase::Settling { direction } => Some(direction),
        }
    }

    pub(crate) fn is_settling(&self) -> bool {
        matches!(self.phase, Phase::Settling { .. })
    }

    /// Earliest `now_ms` at which `poll` can make progress.
    pub(crate) fn next_deadline_ms(&self) -> Option<u64> {
        match self.phase {
            Phase::Debouncing { due_ms, .. } | Phase::Loading { due_ms, .. } => Some(due_ms),
            Phase::Idle | Phase::Settling { .. } => None,
        }
    }

    /// Feeds an edge event. Returns `false` when it was dropped because a load is in flight.
    ///
    /// A pending debounce is replaced: the timer restarts and the latest direction wins.
    pub(crate) fn on_edge(&mut self, direction: Direction, now_ms: u64) -> bool {
        match self.phase {
            Phase::Loading { .. } | Phase::Settling { .. } => {
                vtrace!(%direction, now_ms, "edge dropped: load in flight");
                false
            }
            Phase::Idle | Phase::Debouncing { .. } => {
                let due_ms = now_ms.saturating_add(self.debounce_delay_ms);
                vtrace!(%direction, now_ms, due_ms, "debounce armed");
                self.phase = Phase::Debouncing { direction, due_ms };
                true
            }
        }
    }

    /// Advances at most one transition whose deadline has passed.
    ///
    /// `start_index` is the window start at the time the debounce fires; an upward load from
    /// index 0 is suppressed.
    pub(crate) fn poll(&mut self, now_ms: u64, start_index: usize) -> Option<Step> {
        match self.phase {
            Phase::Debouncing { direction, due_ms } if now_ms >= due_ms => {
                if direction == Direction::Up && start_index == 0 {
                    vtrace!(now_ms, "debounce fired at index 0: nothing above, suppressed");
                    self.phase = Phase::Idle;
                    return Some(Step::Suppressed);
                }
                // The loading timer is armed when the debounce timer was due, not when we were
                // polled, so one late poll runs both timers.
                let due_ms = due_ms.saturating_add(self.loading_delay_ms);
                vtrace!(%direction, now_ms, due_ms, "load started");
                self.phase = Phase::Loading { direction, due_ms };
                Some(Step::Started)
            }
            Phase::Loading { direction, due_ms } if now_ms >= due_ms => {
                self.phase = Phase::Settling { direction };
                Some(Step::Shift(direction))
            }
            _ => None,
        }
    }

    /// Ends the in-flight episode.
    pub(crate) fn settle(&mut self) {
        debug_assert!(
            self.is_settling(),
            "settle called outside of a load episode ({:?})",
            self.phase
        );
        self.phase = Phase::Idle;
    }
}
