//! # Snapshot Testing Support
//!
//! Utilities for checking parser output in tests.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts lines and outline to an id-free, serializable
//!   `Snap`, so an incrementally maintained parser can be compared with a
//!   fresh parse of the same text
//! - **`invariants`**: Structural checks that hold after every edit (line
//!   positions tile the text, outline ranges are sorted and contiguous,
//!   identifiers are unique and resolve)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
