// Example: drive one downward load episode by hand, then jump and reset.
use infinite_virtualizer::{
    Direction, InfiniteVirtualizer, InfiniteVirtualizerOptions, MaterializedItem,
    QueuedEdgeSource,
};

fn main() {
    let options = InfiniteVirtualizerOptions::new().with_on_range_changed(Some(
        |direction: Direction, start: usize, end: usize| {
            println!("range changed: {direction} [{start}, {end}]");
        },
    ));
    let mut v = match InfiniteVirtualizer::new(options) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("invalid options: {err}");
            return;
        }
    };
    let mut edges = QueuedEdgeSource::new();

    // Attach the source to the initial markers (bottom only: nothing above index 0).
    v.pump_edges(&mut edges, 0);
    println!("markers={:?}", v.edge_markers());

    // The user scrolled near the bottom of the rendered content.
    v.on_scroll(1_000);
    edges.push(Direction::Down);
    v.pump_edges(&mut edges, 0);

    let mut now_ms = 0u64;
    while let Some(due) = v.next_deadline_ms() {
        now_ms = due;
        if let Some(change) = v.tick(now_ms) {
            println!("t={now_ms} shifted: {change:?}");
        }
    }
    if let Some(offset) = v.on_paint() {
        println!("after paint: offset={offset}");
    }

    let producer = |index: usize| MaterializedItem::new(index, format!("row #{index}"));
    let mut items = Vec::new();
    v.collect_items(&producer, &mut items);
    println!(
        "materialized={} first={:?} last={:?}",
        items.len(),
        items.first(),
        items.last()
    );

    let offset = v.scroll_to_index(500);
    println!("scroll_to_index(500): offset={offset} range={:?}", v.current_range());

    let offset = v.reset();
    println!("reset: offset={offset} range={:?}", v.current_range());
}
