use alloc::sync::Arc;

use crate::{ConfigError, Direction};

/// A callback fired once per completed load episode.
///
/// Arguments are `(direction, new_start_index, new_end_index)`.
pub type OnRangeChangedCallback = Arc<dyn Fn(Direction, usize, usize) + Send + Sync>;

/// Configuration for [`crate::InfiniteVirtualizer`].
///
/// All fields have defaults (see [`Default`]). The configuration is fixed for the lifetime of an
/// instance; in particular `window_size` never changes once the controller exists.
pub struct InfiniteVirtualizerOptions {
    /// Uniform height of every materialized item, in pixels. Only used for offset arithmetic.
    pub item_height: u32,
    /// Number of indexes materialized at once.
    pub window_size: usize,
    /// Indexes added on one edge (and dropped on the other) per load episode.
    pub batch_size: usize,
    /// Coalescing window for edge signals.
    pub debounce_delay_ms: u64,
    /// Delay between the start of a load episode and the window shift.
    ///
    /// This models fetch latency; real fetches are the producer's business and are not awaited.
    pub loading_delay_ms: u64,
    pub initial_start_index: usize,
    /// Skips scroll compensation entirely (hosts that can't write the scroll offset, or tests).
    pub disable_scroll_management: bool,

    pub on_range_changed: Option<OnRangeChangedCallback>,
}

impl Default for InfiniteVirtualizerOptions {
    fn default() -> Self {
        Self {
            item_height: 50,
            window_size: 30,
            batch_size: 10,
            debounce_delay_ms: 150,
            loading_delay_ms: 50,
            initial_start_index: 0,
            disable_scroll_management: false,
            on_range_changed: None,
        }
    }
}

impl Clone for InfiniteVirtualizerOptions {
    fn clone(&self) -> Self {
        Self {
            item_height: self.item_height,
            window_size: self.window_size,
            batch_size: self.batch_size,
            debounce_delay_ms: self.debounce_delay_ms,
            loading_delay_ms: self.loading_delay_ms,
            initial_start_index: self.initial_start_index,
            disable_scroll_management: self.disable_scroll_management,
            on_range_changed: self.on_range_changed.clone(),
        }
    }
}

impl InfiniteVirtualizerOptions {
    /// Creates options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the configuration without building a controller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::EmptyBatch);
        }
        if self.item_height == 0 {
            return Err(ConfigError::ZeroItemHeight);
        }
        Ok(())
    }

    pub fn with_item_height(mut self, item_height: u32) -> Self {
        self.item_height = item_height;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_debounce_delay_ms(mut self, delay_ms: u64) -> Self {
        self.debounce_delay_ms = delay_ms;
        self
    }

    pub fn with_loading_delay_ms(mut self, delay_ms: u64) -> Self {
        self.loading_delay_ms = delay_ms;
        self
    }

    pub fn with_initial_start_index(mut self, initial_start_index: usize) -> Self {
        self.initial_start_index = initial_start_index;
        self
    }

    pub fn with_disable_scroll_management(mut self, disable: bool) -> Self {
        self.disable_scroll_management = disable;
        self
    }

    pub fn with_on_range_changed(
        mut self,
        on_range_changed: Option<impl Fn(Direction, usize, usize) + Send + Sync + 'static>,
    ) -> Self {
        self.on_range_changed = on_range_changed.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for InfiniteVirtualizerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InfiniteVirtualizerOptions")
            .field("item_height", &self.item_height)
            .field("window_size", &self.window_size)
            .field("batch_size", &self.batch_size)
            .field("debounce_delay_ms", &self.debounce_delay_ms)
            .field("loading_delay_ms", &self.loading_delay_ms)
            .field("initial_start_index", &self.initial_start_index)
            .field("disable_scroll_management", &self.disable_scroll_management)
            .finish_non_exhaustive()
    }
}
