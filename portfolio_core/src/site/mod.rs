//! The public portfolio page.

pub mod page;
pub mod style;

pub use page::{missing_field, render_home, ContactOutcome};
pub use style::STYLESHEET;
