use interseg_core::error::{ErrorCode, IntersegError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}, column {column}: invalid value {raw:?}")]
    InvalidValue {
        line: usize,
        column: usize,
        raw: String,
    },
    #[error("line {line}: invalid identifier {raw:?}")]
    InvalidIdentifier { line: usize, raw: String },
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: &'static str,
        found: usize,
    },
    #[error("line {line}: no column {column}")]
    MissingColumn { line: usize, column: usize },
}

impl ParseError {
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Io(_) => None,
            ParseError::InvalidValue { line, .. }
            | ParseError::InvalidIdentifier { line, .. }
            | ParseError::FieldCount { line, .. }
            | ParseError::MissingColumn { line, .. } => Some(*line),
        }
    }
}

impl IntersegError for ParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ParseError::Io(_) => ErrorCode::Internal,
            _ => ErrorCode::InvalidArgument,
        }
    }
}
