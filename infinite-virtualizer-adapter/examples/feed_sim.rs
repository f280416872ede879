use infinite_virtualizer::InfiniteVirtualizerOptions;
use infinite_virtualizer_adapter::{Controller, IntersectionEdgeSource};

fn main() {
    // Example: a simulated feed where the user flings down, then back up.
    //
    // An adapter would:
    // - forward scroll/resize events with on_scroll / on_viewport_size
    // - call tick(now_ms) every frame (or when next_deadline_ms is reached)
    // - re-render when tick returns a change, then call on_paint and apply its offset
    let options = InfiniteVirtualizerOptions::new()
        .with_debounce_delay_ms(100)
        .with_loading_delay_ms(30);
    let mut c = match Controller::new(options, IntersectionEdgeSource::DEFAULT_ROOT_MARGIN) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("invalid options: {err}");
            return;
        }
    };
    c.on_viewport_size(600, 0);

    let mut now_ms = 0u64;
    let mut offset = 0u64;
    let mut velocity = 40i64;
    for frame in 0..240 {
        now_ms += 16;
        if frame == 120 {
            velocity = -40;
        }

        let max = c.virtualizer().content_size().saturating_sub(600);
        offset = offset.saturating_add_signed(velocity).min(max);
        c.on_scroll(offset, now_ms);

        if let Some(change) = c.tick(now_ms) {
            // Re-render here, then let the controller compensate.
            if let Some(compensated) = c.on_paint(now_ms) {
                offset = compensated;
            }
            println!(
                "t={now_ms} {} -> [{}, {}] offset={offset}",
                change.direction, change.start_index, change.end_index
            );
        }
    }

    println!(
        "done: range={:?} offset={}",
        c.current_range(),
        c.scroll_offset()
    );
}
