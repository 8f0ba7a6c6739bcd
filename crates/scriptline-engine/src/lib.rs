pub mod editing;
pub mod error;
pub mod outline;
pub mod parsing;

// Re-export key types for easier usage
pub use editing::{
    ParseMode, Parser, ParserDelegate, ParserSnapshot, Patch, ReadOnlyScript, Screenplay,
};
pub use error::ParserError;
pub use outline::{OutlineChanges, OutlineKind, OutlineScene};
pub use parsing::{Line, LineId, LineType, TitlePage, parse_document};
pub use scriptline_config::ParserConfig;
