//! The operator's live message list: sorting, counters and rendering.

pub mod render;
pub mod view;

pub use render::{message_path, FeedRenderer};
pub use view::{sort_newest_first, FeedStats, FeedStatus, FeedView};
