use alloc::collections::VecDeque;

use crate::{Direction, EdgeMarkers};

/// Anything that can report "the rendered top/bottom boundary is near the viewport".
///
/// A host satisfies this with whatever visibility mechanism it already has (DOM intersection
/// observers, a terminal redraw hook, a game-engine camera test...). Events are hints: the
/// controller drops them freely, e.g. while a load is in flight.
///
/// See `infinite-virtualizer-adapter` for a geometric implementation.
pub trait EdgeSignalSource {
    /// (Re-)attaches observation to the given marker set.
    ///
    /// Called whenever the set of rendered markers changes, e.g. when the top marker appears for
    /// the first time after the window leaves index 0.
    fn observe(&mut self, markers: EdgeMarkers);

    /// Emits the edge events gathered since the last call, oldest first.
    fn drain(&mut self, emit: &mut dyn FnMut(Direction));
}

/// A push-based [`EdgeSignalSource`] for hosts that detect proximity themselves.
///
/// Events for markers that are not currently observed are dropped on `push`.
#[derive(Clone, Debug)]
pub struct QueuedEdgeSource {
    markers: EdgeMarkers,
    pending: VecDeque<Direction>,
}

impl Default for QueuedEdgeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QueuedEdgeSource {
    pub fn new() -> Self {
        Self {
            markers: EdgeMarkers::NONE,
            pending: VecDeque::new(),
        }
    }

    pub fn markers(&self) -> EdgeMarkers {
        self.markers
    }

    /// Queues an event. Returns `false` if the corresponding marker isn't observed.
    pub fn push(&mut self, direction: Direction) -> bool {
        if !self.markers.observes(direction) {
            vtrace!(%direction, "QueuedEdgeSource: unobserved marker, dropped");
            return false;
        }
        self.pending.push_back(direction);
        true
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl EdgeSignalSource for QueuedEdgeSource {
    fn observe(&mut self, markers: EdgeMarkers) {
        self.markers = markers;
        self.pending.retain(|d| markers.observes(*d));
    }

    fn drain(&mut self, emit: &mut dyn FnMut(Direction)) {
        while let Some(direction) = self.pending.pop_front() {
            emit(direction);
        }
    }
}
