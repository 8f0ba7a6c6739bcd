//! Outline of a screenplay: scenes and sections derived from the lines.
//!
//! The outline is a flat list in document order. Nesting by section depth is
//! derived on demand with [`outline_tree`]. Elements point at their heading
//! line by id, never by reference, so the line list stays the single owner
//! of line data.

pub mod builder;
pub mod diff;
pub mod scene;
pub mod tree;

pub use builder::{BuiltOutline, OutlineBuilder, build_outline};
pub use diff::{OutlineChanges, diff_outline};
pub use scene::{OutlineKind, OutlineScene, OutlineState};
pub use tree::{OutlineNode, outline_tree, section_contents};
