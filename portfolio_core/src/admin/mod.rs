//! The operator's admin panel: per-session context, the feed driver that
//! owns the store subscription, and the rendered pages.

pub mod context;
pub mod driver;
pub mod page;
pub mod registry;


pub use context::AdminContext;
pub use driver::run_feed;
pub use registry::AdminRegistry;
