//! Form input molecules.

/// Checkbox molecules and native filter inputs.
pub mod choice;
/// Animated search placeholders.
pub mod placeholder;
/// Range sliders.
pub mod range;
/// Typing and paste filters.
pub mod sanitize;
/// Text fields and textareas.
pub mod text;
/// File uploads.
pub mod upload;
/// Blur validation.
pub mod validate;

pub use choice::{Checkbox, FilterField};
pub use placeholder::PlaceholderSuggestions;
pub use range::Range;
pub use sanitize::{SanitizeMode, Sanitizer};
pub use text::{TextArea, TextField};
pub use upload::Upload;
pub use validate::{ValidationKind, Validated};
