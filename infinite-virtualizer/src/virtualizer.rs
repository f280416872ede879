use alloc::vec::Vec;

use crate::compensator::ScrollCompensator;
use crate::scheduler::{LoadScheduler, Step};
use crate::window::WindowState;
use crate::{
    ConfigError, Direction, EdgeMarkers, EdgeSignalSource, InfiniteVirtualizerOptions,
    ItemProducer, LoadState, PlacedItem, RangeChange, ScrollAnchor, Window,
};

/// A headless, bidirectional windowed list controller.
///
/// Keeps exactly `window_size` indexes materialized out of an open-ended index space and slides
/// that window by `batch_size` whenever the host reports that the user got near the top or bottom
/// boundary of the rendered content.
///
/// Like the rest of this crate it is UI-agnostic and clock-free. The host drives it:
/// - `on_scroll` whenever the viewport's scroll offset changes
/// - `on_edge` / `pump_edges` when a boundary marker comes into view
/// - `tick(now_ms)` when `next_deadline_ms()` is reached (or on every frame)
/// - `on_paint` after it re-rendered the window, writing back the returned offset
#[derive(Clone, Debug)]
pub struct InfiniteVirtualizer {
    options: InfiniteVirtualizerOptions,
    window: WindowState,
    scheduler: LoadScheduler,
    compensator: ScrollCompensator,
    scroll_offset: u64,
    observed_markers: Option<EdgeMarkers>,
}

impl InfiniteVirtualizer {
    /// Creates a controller, rejecting invalid configurations.
    pub fn new(options: InfiniteVirtualizerOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let window = WindowState::new(options.initial_start_index, options.window_size)?;
        vdebug!(
            window_size = options.window_size,
            batch_size = options.batch_size,
            initial_start_index = options.initial_start_index,
            "InfiniteVirtualizer::new"
        );
        Ok(Self {
            window,
            scheduler: LoadScheduler::new(options.debounce_delay_ms, options.loading_delay_ms),
            compensator: ScrollCompensator::new(
                !options.disable_scroll_management,
                options.item_height,
            ),
            scroll_offset: 0,
            observed_markers: None,
            options,
        })
    }

    pub fn options(&self) -> &InfiniteVirtualizerOptions {
        &self.options
    }

    pub fn set_on_range_changed(
        &mut self,
        on_range_changed: Option<impl Fn(Direction, usize, usize) + Send + Sync + 'static>,
    ) {
        self.options.on_range_changed = on_range_changed.map(|f| alloc::sync::Arc::new(f) as _);
    }

    /// The live window, verbatim. Read-only.
    pub fn current_range(&self) -> Window {
        self.window.current()
    }

    pub fn window_state(&self) -> &WindowState {
        &self.window
    }

    pub fn window_size(&self) -> usize {
        self.window.window_size()
    }

    pub fn item_height(&self) -> u32 {
        self.options.item_height
    }

    pub fn load_state(&self) -> LoadState {
        self.scheduler.state()
    }

    pub fn is_loading(&self) -> bool {
        self.scheduler.state() == LoadState::Loading
    }

    /// Direction of the pending debounce or in-flight load, if any.
    pub fn pending_direction(&self) -> Option<Direction> {
        self.scheduler.direction()
    }

    /// The anchor captured by the in-flight load episode, if it hasn't been consumed yet.
    pub fn scroll_anchor(&self) -> Option<ScrollAnchor> {
        self.compensator.anchor()
    }

    pub fn scroll_management_enabled(&self) -> bool {
        self.compensator.enabled()
    }

    /// The rewrite `on_paint` will apply, if a shift is waiting to be painted.
    pub fn pending_scroll_offset(&self) -> Option<u64> {
        self.compensator.pending_offset()
    }

    /// Whether a shift has been applied and its scroll rewrite is waiting for `on_paint`.
    pub fn is_awaiting_paint(&self) -> bool {
        self.scheduler.is_settling()
    }

    /// When the host should call `tick` next. `None` means no timer is armed.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.scheduler.next_deadline_ms()
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Reports the viewport's current scroll offset (user scroll, host clamping, ...).
    pub fn on_scroll(&mut self, scroll_offset: u64) {
        self.scroll_offset = scroll_offset;
    }

    /// Boundary markers the host should render and observe for the current window.
    pub fn edge_markers(&self) -> EdgeMarkers {
        EdgeMarkers::for_window(self.window.current())
    }

    /// Feeds one edge-proximity event.
    ///
    /// Returns `false` when the event was dropped because a load is in flight. Events are never
    /// queued behind a running load.
    pub fn on_edge(&mut self, direction: Direction, now_ms: u64) -> bool {
        self.scheduler.on_edge(direction, now_ms)
    }

    /// Re-attaches `source` if the marker set changed, then drains its events into `on_edge`.
    ///
    /// Events for markers that aren't part of the current set are ignored. Returns the number of
    /// accepted events.
    pub fn pump_edges<S: EdgeSignalSource + ?Sized>(
        &mut self,
        source: &mut S,
        now_ms: u64,
    ) -> usize {
        let markers = self.edge_markers();
        if self.observed_markers != Some(markers) {
            vdebug!(top = markers.top, bottom = markers.bottom, "edge markers re-attached");
            source.observe(markers);
            self.observed_markers = Some(markers);
        }

        let mut accepted = 0usize;
        source.drain(&mut |direction| {
            if !markers.observes(direction) {
                vtrace!(%direction, "edge from unobserved marker ignored");
                return;
            }
            if self.on_edge(direction, now_ms) {
                accepted += 1;
            }
        });
        accepted
    }

    /// Fires every timer due at `now_ms`.
    ///
    /// Returns the window change when a load episode shifted the window during this call. The
    /// host should re-render the window and then call [`Self::on_paint`].
    pub fn tick(&mut self, now_ms: u64) -> Option<RangeChange> {
        let mut change = None;
        while let Some(step) = self.scheduler.poll(now_ms, self.window.current().start_index) {
            match step {
                Step::Suppressed => {}
                Step::Started => self.compensator.capture(self.scroll_offset),
                Step::Shift(direction) => change = Some(self.complete_shift(direction)),
            }
        }
        change
    }

    /// Call after the host painted the current window.
    ///
    /// Returns the compensated scroll offset to write into the viewport when a shift was just
    /// painted. The in-flight episode ends here.
    pub fn on_paint(&mut self) -> Option<u64> {
        if !self.scheduler.is_settling() {
            return None;
        }
        let offset = self.compensator.apply();
        if let Some(offset) = offset {
            vtrace!(offset, "scroll compensation applied");
            self.scroll_offset = offset;
        }
        self.scheduler.settle();
        offset
    }

    /// Jumps straight to `index`, bypassing debounce and loading.
    ///
    /// The window is centered on `index`; the viewport offset becomes `index * item_height`.
    /// Negative indexes are clamped to 0. Returns the offset to write into the viewport.
    pub fn scroll_to_index(&mut self, index: i64) -> u64 {
        let index = if index < 0 {
            0
        } else {
            usize::try_from(index).unwrap_or(usize::MAX)
        };
        let offset = (index as u64).saturating_mul(self.options.item_height as u64);
        self.window.jump_to(index);
        self.scroll_offset = offset;
        self.supersede_episode();
        vdebug!(
            index,
            offset,
            start_index = self.window.current().start_index,
            "scroll_to_index"
        );
        offset
    }

    /// Returns to `initial_start_index` with the viewport at the top. Returns the offset (0).
    pub fn reset(&mut self) -> u64 {
        self.window.reset();
        self.scroll_offset = 0;
        self.supersede_episode();
        vdebug!(start_index = self.window.current().start_index, "reset");
        0
    }

    /// Height of the rendered content: `window_size` rows of `item_height`.
    pub fn content_size(&self) -> u64 {
        (self.window.window_size() as u64).saturating_mul(self.options.item_height as u64)
    }

    /// Offset of `index`'s row from the top of the rendered content, if it is materialized.
    pub fn item_offset(&self, index: usize) -> Option<u64> {
        let slot = self.window.position_of(index)?;
        Some((slot as u64).saturating_mul(self.options.item_height as u64))
    }

    pub fn for_each_index(&self, f: impl FnMut(usize)) {
        self.window.for_each_index(f);
    }

    /// Produces every materialized item, in index order.
    pub fn for_each_item<P: ItemProducer + ?Sized>(
        &self,
        producer: &P,
        mut f: impl FnMut(PlacedItem<P::Id, P::Content>),
    ) {
        let start_index = self.window.current().start_index;
        let height = self.options.item_height as u64;
        self.window.for_each_index(|index| {
            f(PlacedItem {
                index,
                offset: ((index - start_index) as u64).saturating_mul(height),
                item: producer.produce(index),
            });
        });
    }

    /// Collects every materialized item into `out` (clears `out` first).
    pub fn collect_items<P: ItemProducer + ?Sized>(
        &self,
        producer: &P,
        out: &mut Vec<PlacedItem<P::Id, P::Content>>,
    ) {
        out.clear();
        out.reserve(self.window.window_size());
        self.for_each_item(producer, |it| out.push(it));
    }

    fn complete_shift(&mut self, direction: Direction) -> RangeChange {
        let batch_size = self.options.batch_size;
        let shifted = match direction {
            Direction::Down => self.window.shift_down(batch_size),
            Direction::Up => self.window.shift_up(batch_size),
        };
        let window = self.window.current();
        if shifted < batch_size {
            vtrace!(%direction, shifted, batch_size, "window shift clamped");
        }
        vdebug!(
            %direction,
            start_index = window.start_index,
            end_index = window.end_index,
            "load episode shifted window"
        );

        if let Some(cb) = &self.options.on_range_changed {
            cb(direction, window.start_index, window.end_index);
        }

        if !self.compensator.prepare(direction, batch_size) {
            self.scheduler.settle();
        }

        RangeChange {
            direction,
            start_index: window.start_index,
            end_index: window.end_index,
        }
    }

    // An imperative jump owns the viewport offset now; a stale anchor must not overwrite it.
    fn supersede_episode(&mut self) {
        self.compensator.discard();
        if self.scheduler.is_settling() {
            self.scheduler.settle();
        }
    }
}
