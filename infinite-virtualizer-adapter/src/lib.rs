//! Adapter utilities for the `infinite-virtualizer` crate.
//!
//! The `infinite-virtualizer` crate is UI-agnostic and only consumes edge-proximity events. This
//! crate provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - A geometric edge signal source that behaves like a viewport intersection observer
//! - A controller that wires scroll/paint/timer events to the core and the edge source
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod controller;
mod intersection;


pub use controller::Controller;
pub use intersection::{Geometry, IntersectionEdgeSource, marker_intersects};
