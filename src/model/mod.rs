//! Host-side models the gutter can be attached to
//!
//! [`TextView`] is a complete in-memory host used by the preview binary,
//! the integration tests and the benchmarks.

pub mod text_view;

pub use text_view::{TextMetrics, TextView};
