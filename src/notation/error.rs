//! Error types for the notation parser.

use thiserror::Error;

/// A fatal error while parsing a notation line.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("malformed directive '{0}', expected key=value")]
    MalformedDirective(String),
    #[error("unexpected character '{0}'")]
    UnrecognizedSymbol(char),
    #[error("already defining an obstacle")]
    UnexpectedObstacleNesting,
    #[error("position '{0}' defined before direction")]
    PositionBeforeDirection(char),
    #[error("obstacle '{0}' needs two corner positions")]
    IncompleteObstacle(String),
    #[error("obstacle '{0}' is never closed")]
    UnterminatedObstacle(String),
    #[error("invalid obstacle length '{0}'")]
    InvalidNumericLiteral(String),
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}
