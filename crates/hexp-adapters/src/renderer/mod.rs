//! Template renderer adapters.

mod mustache;

pub use mustache::MustacheRenderer;
