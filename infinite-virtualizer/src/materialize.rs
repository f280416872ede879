use crate::MaterializedItem;

/// Produces the visual content for an index.
///
/// Called once per materialized index per render pass. For a given index the returned `id` must
/// be stable; `content` may change over time (e.g. placeholder → loaded).
///
/// Any `Fn(usize) -> MaterializedItem<Id, C>` closure is a producer.
pub trait ItemProducer {
    type Id;
    type Content;

    fn produce(&self, index: usize) -> MaterializedItem<Self::Id, Self::Content>;
}

impl<F, Id, C> ItemProducer for F
where
    F: Fn(usize) -> MaterializedItem<Id, C>,
{
    type Id = Id;
    type Content = C;

    fn produce(&self, index: usize) -> MaterializedItem<Id, C> {
        self(index)
    }
}

/// A materialized item plus where it sits in the rendered content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedItem<Id, C> {
    pub index: usize,
    /// Offset of the item's top edge from the top of the rendered content.
    pub offset: u64,
    pub item: MaterializedItem<Id, C>,
}
