//! Error types for event emission.

use thiserror::Error;

/// A fatal error while emitting events. `line` is the source line of the
/// frame whose directive failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmitError {
    #[error("line {line}: '{key}' expects a number, got '{value}'")]
    InvalidNumericLiteral {
        line: usize,
        key: &'static str,
        value: String,
    },
    #[error("line {line}: measure must be positive, got {value}")]
    InvalidMeasure { line: usize, value: f64 },
    #[error("line {line}: intro_silence needs a bpm set before it")]
    TempoUnset { line: usize },
    #[error("line {line}: undefined procedure '{name}'")]
    UndefinedProcedure { line: usize, name: String },
    #[error("line {line}: procedure '{name}' is already defined")]
    DuplicateProcedure { line: usize, name: String },
    #[error("line {line}: procedure '{name}' expands itself")]
    RecursiveProcedure { line: usize, name: String },
}

impl EmitError {
    /// Source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            EmitError::InvalidNumericLiteral { line, .. }
            | EmitError::InvalidMeasure { line, .. }
            | EmitError::TempoUnset { line }
            | EmitError::UndefinedProcedure { line, .. }
            | EmitError::DuplicateProcedure { line, .. }
            | EmitError::RecursiveProcedure { line, .. } => *line,
        }
    }
}
