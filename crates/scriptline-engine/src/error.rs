use crate::parsing::LineId;

#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("Line identifier {0} appears more than once")]
    DuplicateIdentifier(LineId),
    #[error("Unknown line type: {0}")]
    UnknownLineType(String),
}
