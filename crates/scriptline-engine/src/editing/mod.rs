/*!
 * # Editing Core
 *
 * Keeps a parsed screenplay in step with an editor buffer.
 *
 * ## Architecture Overview
 *
 * ### 1. Lines Are the Source of Truth
 * - The document is held as an ordered list of **`Line`s**, each with a
 *   stable **`LineId`** and its byte offset into the text
 * - The text is the lines joined with `\n`; nothing else is stored
 * - Outline, title page and storyline index are derived from the lines
 *
 * ### 2. Incremental Re-parse
 * - An edit is a byte range plus replacement text, or an **xi-rope `Delta`**
 * - Only the touched lines are spliced; classification runs forward from
 *   the line before the edit until it settles
 * - The outline is rebuilt over the affected span and diffed, falling back
 *   to a full rebuild when numbering or section nesting cascades further
 *
 * ### 3. Stable Line Identity
 * - Lines keep their id while they are edited, split or pushed down
 * - Removed lines are reported to the delegate before anything else
 * - Id lookups go through a lazily rebuilt **`IdentityCache`**
 *
 * ### 4. Read API: Immutable Snapshots
 * - **`ParserSnapshot`** shares the parser's collections behind `Arc`
 * - Later edits copy on write, so snapshots can move to other threads
 * - Both parser and snapshot implement **`ReadOnlyScript`** for queries
 *
 * ## Module Structure
 *
 * - **`parser`**: `Parser`, full parses and the delegate protocol
 * - **`incremental`**: `parse_change` and `apply_delta`
 * - **`patch`**: what an edit changed
 * - **`delegate`**: callbacks into the host editor
 * - **`identity`**: id to index lookups
 * - **`script`**: the read-only query surface
 * - **`snapshot`**: immutable views
 * - **`blocks`**: paragraph blocks and dual dialogue pairing
 * - **`export`**: text for saving and lines for printing
 *
 * ## Usage Pattern
 *
 * ```rust
 * use scriptline_engine::editing::*;
 *
 * let mut parser = Parser::new("INT. HOUSE - DAY\n\nJohn enters.");
 *
 * // Type into the action line
 * let patch = parser.parse_change(22..22, " slowly");
 * assert!(patch.changed_indices.contains(&2));
 *
 * // Hand a snapshot to another thread
 * let snapshot = parser.snapshot();
 * assert_eq!(snapshot.number_of_scenes(), 1);
 * ```
 */

pub mod blocks;
pub mod delegate;
pub mod export;
pub mod identity;
pub mod incremental;
pub mod parser;
pub mod patch;
pub mod script;
pub mod snapshot;

pub use blocks::DualDialogue;
pub use delegate::ParserDelegate;
pub use export::{PrintLine, Screenplay};
pub use identity::IdentityCache;
pub use incremental::LARGE_EDIT_LINES;
pub use parser::{ParseMode, Parser};
pub use patch::Patch;
pub use script::ReadOnlyScript;
pub use snapshot::ParserSnapshot;
