use alloc::collections::VecDeque;

use infinite_virtualizer::{Direction, EdgeMarkers, EdgeSignalSource};

/// Viewport and content geometry, in the scroll axis.
///
/// `content_size` is the height of the rendered window; the top marker sits at offset 0 and the
/// bottom marker at `content_size`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub scroll_offset: u64,
    pub viewport_size: u32,
    pub content_size: u64,
}

impl Geometry {
    pub fn marker_offset(&self, direction: Direction) -> u64 {
        match direction {
            Direction::Up => 0,
            Direction::Down => self.content_size,
        }
    }
}

/// Whether a zero-height marker at `marker_offset` lies within the viewport grown by
/// `root_margin` on both sides.
pub fn marker_intersects(marker_offset: u64, geometry: Geometry, root_margin: u32) -> bool {
    let margin = root_margin as u64;
    let lo = geometry.scroll_offset.saturating_sub(margin);
    let hi = geometry
        .scroll_offset
        .saturating_add(geometry.viewport_size as u64)
        .saturating_add(margin);
    marker_offset >= lo && marker_offset <= hi
}

/// An [`EdgeSignalSource`] that mimics a viewport intersection observer.
///
/// Feed it geometry with [`Self::update`]. An event is queued when an observed marker goes from
/// outside to inside the (margin-extended) viewport, and when a marker is already inside at the
/// moment it gets attached, matching an intersection observer's initial callback.
#[derive(Clone, Debug)]
pub struct IntersectionEdgeSource {
    root_margin: u32,
    markers: EdgeMarkers,
    geometry: Option<Geometry>,
    // `None`: not observed, or attached and not evaluated yet.
    top: Option<bool>,
    bottom: Option<bool>,
    pending: VecDeque<Direction>,
}

impl Default for IntersectionEdgeSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT_MARGIN)
    }
}

impl IntersectionEdgeSource {
    pub const DEFAULT_ROOT_MARGIN: u32 = 200;

    pub fn new(root_margin: u32) -> Self {
        Self {
            root_margin,
            markers: EdgeMarkers::NONE,
            geometry: None,
            top: None,
            bottom: None,
            pending: VecDeque::new(),
        }
    }

    pub fn root_margin(&self) -> u32 {
        self.root_margin
    }

    pub fn markers(&self) -> EdgeMarkers {
        self.markers
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Last evaluated intersection state of the marker for `direction`.
    pub fn is_intersecting(&self, direction: Direction) -> bool {
        let state = match direction {
            Direction::Up => self.top,
            Direction::Down => self.bottom,
        };
        state.unwrap_or(false)
    }

    /// Reports new geometry (scroll, resize, re-layout) and queues any resulting edge events.
    pub fn update(&mut self, geometry: Geometry) {
        if self.geometry == Some(geometry) {
            return;
        }
        self.geometry = Some(geometry);
        self.evaluate();
    }

    fn evaluate(&mut self) {
        let Some(geometry) = self.geometry else {
            return;
        };
        for direction in [Direction::Up, Direction::Down] {
            if !self.markers.observes(direction) {
                continue;
            }
            let now = marker_intersects(
                geometry.marker_offset(direction),
                geometry,
                self.root_margin,
            );
            let state = match direction {
                Direction::Up => &mut self.top,
                Direction::Down => &mut self.bottom,
            };
            let entered = now && *state != Some(true);
            *state = Some(now);
            if entered {
                self.pending.push_back(direction);
            }
        }
    }
}

impl EdgeSignalSource for IntersectionEdgeSource {
    fn observe(&mut self, markers: EdgeMarkers) {
        self.markers = markers;
        self.top = None;
        self.bottom = None;
        // Re-attaching drops undelivered records; the fresh evaluation reports current state.
        self.pending.clear();
        self.evaluate();
    }

    fn drain(&mut self, emit: &mut dyn FnMut(Direction)) {
        while let Some(direction) = self.pending.pop_front() {
            emit(direction);
        }
    }
}
