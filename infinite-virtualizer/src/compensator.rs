use crate::{Direction, ScrollAnchor};

/// Offset that keeps the anchored item visually still after a window shift of `batch_size`.
///
/// - `Down`: items were dropped above the viewport, so content moved up by `batch_size` rows.
/// - `Up`: items were inserted above the viewport, so content moved down by `batch_size` rows.
///
/// The rewrite always uses the full batch, even when an upward shift was clamped at index 0.
pub fn compensated_offset(
    anchor: ScrollAnchor,
    direction: Direction,
    batch_size: usize,
    item_height: u32,
) -> u64 {
    let delta = (batch_size as u64).saturating_mul(item_height as u64);
    match direction {
        Direction::Down => anchor.pre_shift_offset.saturating_sub(delta),
        Direction::Up => anchor.pre_shift_offset.saturating_add(delta),
    }
}

/// Holds the scroll anchor of the in-flight episode and the rewrite waiting for the next paint.
#[derive(Clone, Debug)]
pub(crate) struct ScrollCompensator {
    enabled: bool,
    item_height: u32,
    anchor: Option<ScrollAnchor>,
    pending: Option<u64>,
}

impl ScrollCompensator {
    pub(crate) fn new(enabled: bool, item_height: u32) -> Self {
        Self {
            enabled,
            item_height,
            anchor: None,
            pending: None,
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn anchor(&self) -> Option<ScrollAnchor> {
        self.anchor
    }

    pub(crate) fn pending_offset(&self) -> Option<u64> {
        self.pending
    }

    pub(crate) fn capture(&mut self, pre_shift_offset: u64) {
        if !self.enabled {
            return;
        }
        debug_assert!(
            self.anchor.is_none() && self.pending.is_none(),
            "scroll anchor captured twice in one episode"
        );
        self.anchor = Some(ScrollAnchor { pre_shift_offset });
    }

    /// Drops the anchor and any pending rewrite. Returns whether anything was dropped.
    pub(crate) fn discard(&mut self) -> bool {
        let had = self.anchor.take().is_some() | self.pending.take().is_some();
        if had {
            vdebug!("scroll anchor discarded");
        }
        had
    }

    /// Consumes the anchor and computes the rewrite to apply on the next paint.
    ///
    /// Returns `false` when there is nothing to apply (disabled, or the anchor was discarded).
    pub(crate) fn prepare(&mut self, direction: Direction, batch_size: usize) -> bool {
        let Some(anchor) = self.anchor.take() else {
            return false;
        };
        let target = compensated_offset(anchor, direction, batch_size, self.item_height);
        vtrace!(
            pre_shift_offset = anchor.pre_shift_offset,
            target,
            batch_size,
            "scroll compensation prepared"
        );
        self.pending = Some(target);
        true
    }

    /// Takes the rewrite prepared by [`Self::prepare`], if any.
    pub(crate) fn apply(&mut self) -> Option<u64> {
        self.pending.take()
    }
}
