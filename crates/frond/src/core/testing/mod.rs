//! Test support: fixture markup and a page harness.

/// Harness for page testing.
pub mod harness;
/// Markup builder for fixtures.
pub mod markup;

pub use harness::{Harness, HarnessBuilder};
pub use markup::{El, el};
