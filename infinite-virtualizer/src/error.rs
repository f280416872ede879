use thiserror::Error;

/// Rejected [`crate::InfiniteVirtualizerOptions`].
///
/// The controller never clamps a bad configuration into a degenerate window; it refuses to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("window_size must be at least 1")]
    EmptyWindow,

    #[error("batch_size must be at least 1")]
    EmptyBatch,

    #[error("item_height must be at least 1")]
    ZeroItemHeight,
}
