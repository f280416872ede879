use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

type Calls = Arc<Mutex<Vec<(Direction, usize, usize)>>>;

fn recording(options: InfiniteVirtualizerOptions) -> (InfiniteVirtualizer, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let options = options.with_on_range_changed(Some(move |d, s, e| {
        sink.lock().unwrap().push((d, s, e));
    }));
    (InfiniteVirtualizer::new(options).unwrap(), calls)
}

fn call_count(calls: &Calls) -> usize {
    calls.lock().unwrap().len()
}

fn window(start_index: usize, end_index: usize) -> Window {
    Window {
        start_index,
        end_index,
    }
}

#[test]
fn defaults_match_documented_values() {
    let opts = InfiniteVirtualizerOptions::default();
    assert_eq!(opts.item_height, 50);
    assert_eq!(opts.window_size, 30);
    assert_eq!(opts.batch_size, 10);
    assert_eq!(opts.debounce_delay_ms, 150);
    assert_eq!(opts.loading_delay_ms, 50);
    assert_eq!(opts.initial_start_index, 0);
    assert!(!opts.disable_scroll_management);
    assert!(opts.on_range_changed.is_none());

    let v = InfiniteVirtualizer::new(opts).unwrap();
    assert_eq!(v.current_range(), window(0, 29));
    assert_eq!(v.load_state(), LoadState::Idle);
    assert_eq!(v.scroll_offset(), 0);
    assert!(v.scroll_management_enabled());
}

#[test]
fn invalid_configurations_fail_fast() {
    let err = InfiniteVirtualizer::new(InfiniteVirtualizerOptions::new().with_window_size(0))
        .unwrap_err();
    assert_eq!(err, ConfigError::EmptyWindow);

    let err = InfiniteVirtualizer::new(InfiniteVirtualizerOptions::new().with_batch_size(0))
        .unwrap_err();
    assert_eq!(err, ConfigError::EmptyBatch);

    let err = InfiniteVirtualizer::new(InfiniteVirtualizerOptions::new().with_item_height(0))
        .unwrap_err();
    assert_eq!(err, ConfigError::ZeroItemHeight);

    assert_eq!(WindowState::new(0, 0).unwrap_err(), ConfigError::EmptyWindow);
}

#[test]
fn config_error_messages_name_the_field() {
    assert_eq!(
        std::format!("{}", ConfigError::EmptyBatch),
        "batch_size must be at least 1"
    );
    assert_eq!(
        std::format!("{}", ConfigError::ZeroItemHeight),
        "item_height must be at least 1"
    );
    assert_eq!(
        std::format!("{}", ConfigError::EmptyWindow),
        "window_size must be at least 1"
    );
}

#[test]
fn window_state_shifts_and_clamps_at_zero() {
    let mut w = WindowState::new(0, 30).unwrap();
    assert_eq!(w.current(), window(0, 29));

    assert_eq!(w.shift_down(10), 10);
    assert_eq!(w.current(), window(10, 39));

    assert_eq!(w.shift_up(4), 4);
    assert_eq!(w.current(), window(6, 35));

    // Only 6 indexes left above: the shift is clamped.
    assert_eq!(w.shift_up(10), 6);
    assert_eq!(w.current(), window(0, 29));
    assert_eq!(w.shift_up(10), 0);
    assert_eq!(w.current(), window(0, 29));
}

#[test]
fn jump_to_centers_the_window() {
    let mut w = WindowState::new(0, 30).unwrap();
    w.jump_to(105);
    assert_eq!(w.current(), window(90, 119));

    w.jump_to(7);
    assert_eq!(w.current(), window(0, 29));

    let mut odd = WindowState::new(0, 5).unwrap();
    odd.jump_to(10);
    assert_eq!(odd.current(), window(8, 12));
}

#[test]
fn reset_is_idempotent() {
    let mut w = WindowState::new(40, 30).unwrap();
    w.shift_down(10);
    w.reset();
    let once = w.current();
    w.reset();
    assert_eq!(w.current(), once);
    assert_eq!(once, window(40, 69));
}

#[test]
fn window_start_is_clamped_at_the_end_of_the_index_space() {
    let mut w = WindowState::new(usize::MAX - 5, 10).unwrap();
    assert_eq!(w.current().end_index, usize::MAX);
    assert_eq!(w.current().len(), 10);
    assert_eq!(w.shift_down(10), 0);
    assert_eq!(w.current().len(), 10);
}

#[test]
fn position_of_maps_indexes_to_slots() {
    let mut w = WindowState::new(0, 30).unwrap();
    w.shift_down(10);
    assert_eq!(w.position_of(9), None);
    assert_eq!(w.position_of(10), Some(0));
    assert_eq!(w.position_of(39), Some(29));
    assert_eq!(w.position_of(40), None);

    let mut seen = Vec::new();
    w.for_each_index(|i| seen.push(i));
    assert_eq!(seen.len(), 30);
    assert_eq!(seen.first(), Some(&10));
    assert_eq!(seen.last(), Some(&39));
}

#[test]
fn bottom_edge_shifts_window_down_after_debounce_and_loading_delay() {
    let (mut v, calls) = recording(InfiniteVirtualizerOptions::new());

    assert!(v.on_edge(Direction::Down, 0));
    assert_eq!(v.load_state(), LoadState::Debouncing);
    assert_eq!(v.next_deadline_ms(), Some(150));

    assert_eq!(v.tick(149), None);
    assert_eq!(v.load_state(), LoadState::Debouncing);

    assert_eq!(v.tick(150), None);
    assert_eq!(v.load_state(), LoadState::Loading);
    assert_eq!(v.next_deadline_ms(), Some(200));
    assert_eq!(v.current_range(), window(0, 29));

    assert_eq!(v.tick(199), None);
    let change = v.tick(200).unwrap();
    assert_eq!(
        change,
        RangeChange {
            direction: Direction::Down,
            start_index: 10,
            end_index: 39
        }
    );
    assert_eq!(v.current_range(), window(10, 39));
    assert_eq!(*calls.lock().unwrap(), [(Direction::Down, 10, 39)]);

    // Offset 0 can't go lower.
    assert_eq!(v.on_paint(), Some(0));
    assert_eq!(v.load_state(), LoadState::Idle);
    assert_eq!(call_count(&calls), 1);
}

#[test]
fn top_edge_shifts_window_up_and_pushes_offset_down() {
    let (mut v, calls) =
        recording(InfiniteVirtualizerOptions::new().with_initial_start_index(10));
    assert_eq!(v.current_range(), window(10, 39));
    v.on_scroll(300);

    v.on_edge(Direction::Up, 0);
    let change = v.tick(200).unwrap();
    assert_eq!(change.direction, Direction::Up);
    assert_eq!(v.current_range(), window(0, 29));
    assert_eq!(*calls.lock().unwrap(), [(Direction::Up, 0, 29)]);

    // Rewrite is deferred until the new window has been painted.
    assert!(v.is_awaiting_paint());
    assert_eq!(v.scroll_offset(), 300);
    assert_eq!(v.pending_scroll_offset(), Some(800));

    assert_eq!(v.on_paint(), Some(300 + 10 * 50));
    assert_eq!(v.scroll_offset(), 800);
    assert_eq!(v.load_state(), LoadState::Idle);
    assert_eq!(v.on_paint(), None);
}

#[test]
fn top_edge_at_index_zero_is_a_no_op() {
    let (mut v, calls) = recording(InfiniteVirtualizerOptions::new());

    assert!(v.on_edge(Direction::Up, 0));
    assert_eq!(v.tick(1_000), None);
    assert_eq!(v.load_state(), LoadState::Idle);
    assert_eq!(v.current_range(), window(0, 29));
    assert_eq!(v.scroll_anchor(), None);
    assert_eq!(call_count(&calls), 0);
}

#[test]
fn scroll_to_index_is_synchronous() {
    let (mut v, calls) = recording(InfiniteVirtualizerOptions::new());

    assert_eq!(v.scroll_to_index(105), 105 * 50);
    assert_eq!(v.current_range(), window(90, 119));
    assert_eq!(v.scroll_offset(), 5_250);
    assert_eq!(v.load_state(), LoadState::Idle);
    assert_eq!(v.next_deadline_ms(), None);
    assert_eq!(call_count(&calls), 0);
}

#[test]
fn scroll_to_negative_index_clamps_to_zero() {
    let mut v = InfiniteVirtualizer::new(InfiniteVirtualizerOptions::new()).unwrap();
    v.scroll_to_index(500);
    assert_eq!(v.scroll_to_index(-3), 0);
    assert_eq!(v.current_range(), window(0, 29));
}

#[test]
fn close_bottom_edges_coalesce_into_one_shift() {
    let (mut v, calls) = recording(InfiniteVirtualizerOptions::new());

    v.on_edge(Direction::Down, 0);
    v.on_edge(Direction::Down, 10);
    // The second event restarted the timer.
    assert_eq!(v.next_deadline_ms(), Some(160));
    assert_eq!(v.tick(150), None);
    assert_eq!(v.load_state(), LoadState::Debouncing);

    v.tick(10_000);
    v.on_paint();
    assert_eq!(v.current_range(), window(10, 39));
    assert_eq!(call_count(&calls), 1);
}

#[test]
fn many_edges_within_the_debounce_window_produce_one_episode() {
    let (mut v, calls) = recording(InfiniteVirtualizerOptions::new());
    for i in 0..20u64 {
        v.on_edge(Direction::Down, i * 100);
    }
    assert_eq!(v.next_deadline_ms(), Some(1_900 + 150));
    v.tick(5_000);
    v.on_paint();
    assert_eq!(call_count(&calls), 1);
    assert_eq!(v.current_range(), window(10, 39));
}

#[test]
fn both_edges_in_one_debounce_window_load_at_most_once() {
    let (mut v, calls) =
        recording(InfiniteVirtualizerOptions::new().with_initial_start_index(20));

    v.on_edge(Direction::Down, 0);
    v.on_edge(Direction::Up, 20);
    assert_eq!(v.pending_direction(), Some(Direction::Up));

    v.tick(10_000);
    v.on_paint();
    v.tick(20_000);
    assert_eq!(*calls.lock().unwrap(), [(Direction::Up, 10, 39)]);
}

#[test]
fn late_tick_runs_both_timers() {
    let (mut v, calls) = recording(InfiniteVirtualizerOptions::new());
    v.on_edge(Direction::Down, 1_000);
    assert!(v.tick(60_000).is_some());
    assert_eq!(call_count(&calls), 1);
}

#[test]
fn zero_delays_still_wait_for_a_tick() {
    let (mut v, calls) = recording(
        InfiniteVirtualizerOptions::new()
            .with_debounce_delay_ms(0)
            .with_loading_delay_ms(0),
    );
    v.on_edge(Direction::Down, 5);
    assert_eq!(call_count(&calls), 0);
    assert!(v.tick(5).is_some());
    assert_eq!(call_count(&calls), 1);
}

#[test]
fn edges_during_a_load_are_dropped_not_queued() {
    let (mut v, calls) = recording(InfiniteVirtualizerOptions::new());

    v.on_edge(Direction::Down, 0);
    v.tick(150);
    assert!(v.is_loading());
    assert!(!v.on_edge(Direction::Down, 160));
    assert!(!v.on_edge(Direction::Up, 170));

    v.tick(200);
    // Still loading until the shift has been painted.
    assert!(v.is_loading());
    assert!(!v.on_edge(Direction::Down, 210));

    v.on_paint();
    assert!(!v.is_loading());
    assert_eq!(v.tick(10_000), None);
    assert_eq!(call_count(&calls), 1);

    assert!(v.on_edge(Direction::Down, 10_000));
}

#[test]
fn anchor_is_captured_when_the_load_starts() {
    let mut v = InfiniteVirtualizer::new(InfiniteVirtualizerOptions::new()).unwrap();
    v.on_scroll(900);
    v.on_edge(Direction::Down, 0);
    assert_eq!(v.scroll_anchor(), None);

    v.tick(150);
    assert_eq!(
        v.scroll_anchor(),
        Some(ScrollAnchor {
            pre_shift_offset: 900
        })
    );

    // The user keeps scrolling during the loading delay; the anchor doesn't move.
    v.on_scroll(950);
    v.tick(200);
    assert_eq!(v.scroll_anchor(), None);
    assert_eq!(v.on_paint(), Some(900 - 500));
}

#[test]
fn disabled_scroll_management_leaves_offset_alone() {
    let (mut v, calls) = recording(
        InfiniteVirtualizerOptions::new()
            .with_initial_start_index(10)
            .with_disable_scroll_management(true),
    );
    v.on_scroll(700);

    v.on_edge(Direction::Up, 0);
    v.tick(150);
    assert_eq!(v.scroll_anchor(), None);
    v.tick(200);
    assert_eq!(v.current_range(), window(0, 29));
    assert_eq!(v.load_state(), LoadState::Idle);
    assert!(!v.is_awaiting_paint());
    assert_eq!(v.on_paint(), None);
    assert_eq!(v.scroll_offset(), 700);
    assert_eq!(call_count(&calls), 1);
}

#[test]
fn clamped_upward_shift_still_compensates_by_the_full_batch() {
    let mut v = InfiniteVirtualizer::new(
        InfiniteVirtualizerOptions::new().with_initial_start_index(4),
    )
    .unwrap();
    v.on_scroll(100);
    v.on_edge(Direction::Up, 0);
    v.tick(200);
    assert_eq!(v.current_range(), window(0, 29));
    assert_eq!(v.pending_scroll_offset(), Some(100 + 10 * 50));
    assert_eq!(v.on_paint(), Some(100 + 10 * 50));
}

#[test]
fn batch_larger_than_window_is_accepted_and_shifts_by_the_full_batch() {
    let (mut v, calls) = recording(
        InfiniteVirtualizerOptions::new()
            .with_window_size(5)
            .with_batch_size(10),
    );
    assert_eq!(v.current_range(), window(0, 4));

    v.on_scroll(200);
    v.on_edge(Direction::Down, 0);
    assert!(v.tick(200).is_some());
    assert_eq!(v.current_range(), window(10, 14));
    // 200 - 10 * 50, saturating.
    assert_eq!(v.on_paint(), Some(0));

    v.on_scroll(150);
    v.on_edge(Direction::Up, 1_000);
    assert!(v.tick(1_200).is_some());
    assert_eq!(v.current_range(), window(0, 4));
    assert_eq!(v.on_paint(), Some(150 + 10 * 50));
    assert_eq!(
        *calls.lock().unwrap(),
        [(Direction::Down, 10, 14), (Direction::Up, 0, 4)]
    );
}

#[test]
fn reset_during_a_load_discards_the_stale_anchor() {
    let (mut v, calls) = recording(InfiniteVirtualizerOptions::new());
    v.on_scroll(1_000);
    v.on_edge(Direction::Down, 0);
    v.tick(150);
    assert!(v.scroll_anchor().is_some());

    assert_eq!(v.reset(), 0);
    assert_eq!(v.scroll_anchor(), None);
    // The episode itself still runs to completion.
    assert!(v.is_loading());

    v.tick(200);
    assert_eq!(v.current_range(), window(10, 39));
    assert_eq!(call_count(&calls), 1);
    assert_eq!(v.on_paint(), None);
    assert_eq!(v.scroll_offset(), 0);
    assert_eq!(v.load_state(), LoadState::Idle);
}

#[test]
fn scroll_to_index_before_paint_ends_the_episode() {
    let mut v = InfiniteVirtualizer::new(InfiniteVirtualizerOptions::new()).unwrap();
    v.on_scroll(1_000);
    v.on_edge(Direction::Down, 0);
    v.tick(200);
    assert!(v.is_awaiting_paint());

    v.scroll_to_index(300);
    assert!(!v.is_awaiting_paint());
    assert_eq!(v.load_state(), LoadState::Idle);
    assert_eq!(v.on_paint(), None);
    assert_eq!(v.scroll_offset(), 300 * 50);
}

#[test]
fn reset_twice_matches_reset_once() {
    let mut v = InfiniteVirtualizer::new(
        InfiniteVirtualizerOptions::new().with_initial_start_index(50),
    )
    .unwrap();
    v.scroll_to_index(1_000);
    v.reset();
    let once = (v.current_range(), v.scroll_offset());
    v.reset();
    assert_eq!((v.current_range(), v.scroll_offset()), once);
    assert_eq!(once, (window(50, 79), 0));
}

#[test]
fn edge_markers_follow_the_window_start() {
    let mut v = InfiniteVirtualizer::new(InfiniteVirtualizerOptions::new()).unwrap();
    assert_eq!(
        v.edge_markers(),
        EdgeMarkers {
            top: false,
            bottom: true
        }
    );
    v.scroll_to_index(100);
    assert!(v.edge_markers().top);
    v.reset();
    assert!(!v.edge_markers().top);
}

#[test]
fn pump_edges_reattaches_when_markers_change() {
    let (mut v, calls) = recording(InfiniteVirtualizerOptions::new());
    let mut source = QueuedEdgeSource::new();
    assert_eq!(source.markers(), EdgeMarkers::NONE);

    // First pump attaches the source to the bottom marker only.
    assert_eq!(v.pump_edges(&mut source, 0), 0);
    assert_eq!(source.markers(), v.edge_markers());
    assert!(!source.push(Direction::Up));
    assert!(source.push(Direction::Down));
    assert!(source.push(Direction::Down));

    assert_eq!(v.pump_edges(&mut source, 10), 2);
    assert_eq!(source.pending_len(), 0);
    v.tick(1_000);
    v.on_paint();
    assert_eq!(v.current_range(), window(10, 39));

    // The top marker now exists; the next pump re-attaches.
    assert!(!source.markers().top);
    v.pump_edges(&mut source, 1_000);
    assert!(source.markers().top);
    assert!(source.push(Direction::Up));
    assert_eq!(v.pump_edges(&mut source, 1_000), 1);
    v.tick(2_000);
    v.on_paint();
    assert_eq!(v.current_range(), window(0, 29));
    assert_eq!(
        *calls.lock().unwrap(),
        [(Direction::Down, 10, 39), (Direction::Up, 0, 29)]
    );
}

#[test]
fn queued_source_drops_events_for_markers_that_disappear() {
    let mut source = QueuedEdgeSource::new();
    source.observe(EdgeMarkers {
        top: true,
        bottom: true,
    });
    source.push(Direction::Up);
    source.push(Direction::Down);
    source.observe(EdgeMarkers {
        top: false,
        bottom: true,
    });

    let mut out = Vec::new();
    source.drain(&mut |d| out.push(d));
    assert_eq!(out, [Direction::Down]);
}

#[test]
fn collect_items_produces_each_index_once_with_offsets() {
    let mut v = InfiniteVirtualizer::new(
        InfiniteVirtualizerOptions::new()
            .with_window_size(5)
            .with_batch_size(2)
            .with_item_height(20),
    )
    .unwrap();
    v.scroll_to_index(12);
    assert_eq!(v.current_range(), window(10, 14));

    let produced = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&produced);
    let producer = move |i: usize| {
        *counter.lock().unwrap() += 1;
        MaterializedItem::new(std::format!("row-{i}"), i * 2)
    };

    let mut out = Vec::new();
    v.collect_items(&producer, &mut out);
    assert_eq!(*produced.lock().unwrap(), 5);
    assert_eq!(out.len(), 5);
    assert_eq!(out[0].index, 10);
    assert_eq!(out[0].offset, 0);
    assert_eq!(out[0].item.id, "row-10");
    assert_eq!(out[4].index, 14);
    assert_eq!(out[4].offset, 80);
    assert_eq!(out[4].item.content, 28);

    assert_eq!(v.item_offset(12), Some(40));
    assert_eq!(v.item_offset(15), None);
    assert_eq!(v.content_size(), 100);
}

#[test]
fn compensated_offset_matches_direction() {
    let anchor = ScrollAnchor {
        pre_shift_offset: 1_200,
    };
    assert_eq!(compensated_offset(anchor, Direction::Down, 10, 50), 700);
    assert_eq!(compensated_offset(anchor, Direction::Up, 10, 50), 1_700);
    assert_eq!(compensated_offset(anchor, Direction::Down, 100, 50), 0);
    assert_eq!(compensated_offset(anchor, Direction::Up, 0, 50), 1_200);
}

#[test]
fn property_random_driving_preserves_window_invariants() {
    for seed in 0..32u64 {
        let mut rng = Lcg::new(seed);
        let window_size = rng.gen_range_u64(1, 60) as usize;
        let batch_size = rng.gen_range_u64(1, 2 * window_size as u64 + 1) as usize;
        let (mut v, calls) = recording(
            InfiniteVirtualizerOptions::new()
                .with_window_size(window_size)
                .with_batch_size(batch_size)
                .with_initial_start_index(rng.gen_range_u64(0, 200) as usize)
                .with_disable_scroll_management(rng.gen_bool()),
        );

        let mut now_ms = 0u64;
        let mut episodes = 0usize;
        for _ in 0..400 {
            now_ms += rng.gen_range_u64(0, 120);
            match rng.gen_range_u64(0, 7) {
                0 | 1 => {
                    let d = if rng.gen_bool() {
                        Direction::Up
                    } else {
                        Direction::Down
                    };
                    let loading = v.is_loading();
                    let accepted = v.on_edge(d, now_ms);
                    assert_eq!(accepted, !loading);
                }
                2 | 3 => {
                    let before = call_count(&calls);
                    if v.tick(now_ms).is_some() {
                        episodes += 1;
                    }
                    assert!(call_count(&calls) - before <= 1);
                }
                4 => {
                    v.on_paint();
                }
                5 => {
                    v.on_scroll(rng.gen_range_u64(0, 10_000));
                }
                _ => {
                    if rng.gen_bool() {
                        v.scroll_to_index(rng.gen_range_u64(0, 5_000) as i64 - 100);
                    } else {
                        v.reset();
                    }
                }
            }

            let w = v.current_range();
            assert_eq!(w.end_index - w.start_index + 1, window_size);
            assert_eq!(w.len(), window_size);
            if v.is_awaiting_paint() {
                assert_eq!(v.load_state(), LoadState::Loading);
            }
        }
        assert_eq!(call_count(&calls), episodes);
    }
}
