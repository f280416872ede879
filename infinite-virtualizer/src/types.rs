/// Which edge of the materialized window triggered a load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// The top edge: older/lower indexes are needed.
    Up,
    /// The bottom edge: newer/higher indexes are needed.
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The contiguous index range currently materialized.
///
/// Both ends are inclusive: a window of size 30 starting at 10 is `(10, 39)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub start_index: usize,
    pub end_index: usize, // inclusive
}

impl Window {
    pub(crate) fn starting_at(start_index: usize, window_size: usize) -> Self {
        Self {
            start_index,
            end_index: start_index.saturating_add(window_size.saturating_sub(1)),
        }
    }

    /// Number of indexes in the window.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end_index < self.start_index
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }

    /// Iterates the window's indexes in ascending order.
    pub fn indexes(&self) -> core::ops::RangeInclusive<usize> {
        self.start_index..=self.end_index
    }
}

/// Scheduler state. Exactly one is active per instance, regardless of direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadState {
    #[default]
    Idle,
    Debouncing,
    Loading,
}

/// Scroll offset captured when a load episode starts.
///
/// Consumed exactly once: either applied by the compensator after the shift has been painted, or
/// discarded when an imperative call moves the viewport first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub pre_shift_offset: u64,
}

/// Which boundary markers the host must render and observe.
///
/// The bottom marker is always present. The top marker only exists once the window has moved off
/// index 0, because there is nothing to load above the first item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeMarkers {
    pub top: bool,
    pub bottom: bool,
}

impl EdgeMarkers {
    pub const NONE: Self = Self {
        top: false,
        bottom: false,
    };

    pub(crate) fn for_window(window: Window) -> Self {
        Self {
            top: window.start_index > 0,
            bottom: true,
        }
    }

    /// Whether events coming from the marker for `direction` are currently meaningful.
    pub fn observes(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.top,
            Direction::Down => self.bottom,
        }
    }
}

/// A completed window shift, as reported to the range-changed observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeChange {
    pub direction: Direction,
    pub start_index: usize,
    pub end_index: usize,
}

/// One produced, renderable item for an index inside the window.
///
/// `id` must be stable for a given index; `content` may change between render passes without the
/// controller being told.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterializedItem<Id, C> {
    pub id: Id,
    pub content: C,
}

impl<Id, C> MaterializedItem<Id, C> {
    pub fn new(id: Id, content: C) -> Self {
        Self { id, content }
    }
}
