use crate::{ConfigError, Window};

/// Owns the live index window and is the only place it changes.
///
/// Every mutation replaces `(start_index, end_index)` in one step, so observers never see a
/// half-updated window.
#[derive(Clone, Debug)]
pub struct WindowState {
    window: Window,
    window_size: usize,
    initial_start_index: usize,
}

impl WindowState {
    pub fn new(initial_start_index: usize, window_size: usize) -> Result<Self, ConfigError> {
        if window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        let mut state = Self {
            window: Window::starting_at(0, window_size),
            window_size,
            initial_start_index,
        };
        state.reset();
        Ok(state)
    }

    pub fn current(&self) -> Window {
        self.window
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn initial_start_index(&self) -> usize {
        self.initial_start_index
    }

    /// Moves the window `batch_size` indexes towards higher indexes.
    ///
    /// There is no upper bound: rendering an "end of data" state past the last real item is the
    /// producer's job. Returns how far the window moved.
    pub fn shift_down(&mut self, batch_size: usize) -> usize {
        let start = self.window.start_index;
        let next = start.saturating_add(batch_size);
        self.set_start(next);
        self.window.start_index - start
    }

    /// Moves the window `batch_size` indexes towards index 0, stopping at 0.
    ///
    /// Returns how far the window moved, which is less than `batch_size` near the start.
    pub fn shift_up(&mut self, batch_size: usize) -> usize {
        let start = self.window.start_index;
        let next = start.saturating_sub(batch_size);
        self.set_start(next);
        start - self.window.start_index
    }

    /// Centers the window on `index` (clamped at 0).
    pub fn jump_to(&mut self, index: usize) {
        let next = index.saturating_sub(self.window_size / 2);
        self.set_start(next);
    }

    pub fn reset(&mut self) {
        self.set_start(self.initial_start_index);
    }

    /// Slot of `index` inside the window, if it is materialized.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.window
            .contains(index)
            .then(|| index - self.window.start_index)
    }

    pub fn for_each_index(&self, f: impl FnMut(usize)) {
        self.window.indexes().for_each(f);
    }

    fn set_start(&mut self, start_index: usize) {
        // Keep the width intact even at the top of the index space.
        let max_start = usize::MAX - (self.window_size - 1);
        if start_index > max_start {
            vwarn!(start_index, max_start, "window start clamped at the end of the index space");
        }
        let start_index = start_index.min(max_start);
        self.window = Window::starting_at(start_index, self.window_size);
        debug_assert_eq!(
            self.window.end_index - self.window.start_index + 1,
            self.window_size,
            "window width invariant violated"
        );
    }
}
