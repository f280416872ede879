use infinite_virtualizer::{
    ConfigError, InfiniteVirtualizer, InfiniteVirtualizerOptions, RangeChange, Window,
};

use crate::{Geometry, IntersectionEdgeSource};

/// A framework-neutral controller that wraps an `InfiniteVirtualizer` together with an
/// [`IntersectionEdgeSource`], so the host only forwards raw UI events.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport_size` / `on_scroll` when UI events occur
/// - `tick(now_ms)` when `next_deadline_ms()` is reached (or each frame)
/// - `on_paint(now_ms)` after re-rendering the window
///
/// Methods that move the viewport return the offset the host must write into its scroll
/// container.
#[derive(Clone, Debug)]
pub struct Controller {
    v: InfiniteVirtualizer,
    edges: IntersectionEdgeSource,
    viewport_size: u32,
}

impl Controller {
    pub fn new(
        options: InfiniteVirtualizerOptions,
        root_margin: u32,
    ) -> Result<Self, ConfigError> {
        let v = InfiniteVirtualizer::new(options)?;
        Ok(Self::from_virtualizer(v, root_margin))
    }

    pub fn from_virtualizer(v: InfiniteVirtualizer, root_margin: u32) -> Self {
        Self {
            v,
            edges: IntersectionEdgeSource::new(root_margin),
            viewport_size: 0,
        }
    }

    pub fn virtualizer(&self) -> &InfiniteVirtualizer {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut InfiniteVirtualizer {
        &mut self.v
    }

    pub fn into_virtualizer(self) -> InfiniteVirtualizer {
        self.v
    }

    pub fn edge_source(&self) -> &IntersectionEdgeSource {
        &self.edges
    }

    pub fn current_range(&self) -> Window {
        self.v.current_range()
    }

    pub fn scroll_offset(&self) -> u64 {
        self.v.scroll_offset()
    }

    pub fn viewport_size(&self) -> u32 {
        self.viewport_size
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.v.next_deadline_ms()
    }

    pub fn on_viewport_size(&mut self, viewport_size: u32, now_ms: u64) {
        self.viewport_size = viewport_size;
        self.sync_edges(now_ms);
    }

    /// Call this when the UI reports a scroll offset change (e.g. user wheel/drag).
    pub fn on_scroll(&mut self, scroll_offset: u64, now_ms: u64) {
        self.v.on_scroll(scroll_offset);
        self.sync_edges(now_ms);
    }

    /// Advances the debounce/loading timers.
    ///
    /// Returns the window change when a load episode shifted the window; re-render, then call
    /// [`Self::on_paint`].
    pub fn tick(&mut self, now_ms: u64) -> Option<RangeChange> {
        self.v.tick(now_ms)
    }

    /// Call after painting the current window.
    ///
    /// Returns the compensated scroll offset to apply, if a shift was just painted. The edge
    /// source is re-attached when the marker set changed.
    pub fn on_paint(&mut self, now_ms: u64) -> Option<u64> {
        let offset = self.v.on_paint();
        self.sync_edges(now_ms);
        offset
    }

    /// Jumps to `index` immediately (no debounce, no loading). Returns the offset to apply.
    pub fn scroll_to_index(&mut self, index: i64, now_ms: u64) -> u64 {
        let offset = self.v.scroll_to_index(index);
        self.sync_edges(now_ms);
        offset
    }

    /// Returns to the initial window at offset 0. Returns the offset to apply.
    pub fn reset(&mut self, now_ms: u64) -> u64 {
        let offset = self.v.reset();
        self.sync_edges(now_ms);
        offset
    }

    fn geometry(&self) -> Geometry {
        Geometry {
            scroll_offset: self.v.scroll_offset(),
            viewport_size: self.viewport_size,
            content_size: self.v.content_size(),
        }
    }

    fn sync_edges(&mut self, now_ms: u64) {
        let geometry = self.geometry();
        self.edges.update(geometry);
        self.v.pump_edges(&mut self.edges, now_ms);
    }
}
