//! Sample pages and scripted sessions for exercising frond widgets outside
//! a test suite.

/// Sample pages.
pub mod pages;
/// Scripted interactions.
pub mod script;
