//! A headless, bidirectional windowed list controller.
//!
//! For adapter-level utilities (geometric edge detection, an event-driven controller), see the
//! `infinite-virtualizer-adapter` crate.
//!
//! The controller presents an unbounded, index-addressable list while keeping a constant number
//! of items materialized. It solves three coupled problems:
//! - which contiguous index window is live ([`WindowState`])
//! - when the user approaches either edge of that window ([`EdgeSignalSource`] + a debounced,
//!   single-flight load scheduler)
//! - how to slide the window and rewrite the scroll offset so the shift is invisible (scroll
//!   compensation, applied after the next paint)
//!
//! It is UI-agnostic and never reads a clock. A TUI/GUI layer is expected to provide:
//! - the viewport's scroll offset
//! - edge-proximity events for the rendered boundary markers
//! - `now_ms` timestamps and a "painted" notification
//! - an [`ItemProducer`] that turns an index into content
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod compensator;
mod edge;
mod error;
mod materialize;
mod options;
mod scheduler;
mod types;
mod virtualizer;
mod window;

#[cfg(test)]
mod tests;

pub use compensator::compensated_offset;
pub use edge::{EdgeSignalSource, QueuedEdgeSource};
pub use error::ConfigError;
pub use materialize::{ItemProducer, PlacedItem};
pub use options::{InfiniteVirtualizerOptions, OnRangeChangedCallback};
pub use types::{
    Direction, EdgeMarkers, LoadState, MaterializedItem, RangeChange, ScrollAnchor, Window,
};
pub use virtualizer::InfiniteVirtualizer;
pub use window::WindowState;
