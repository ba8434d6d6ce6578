use crate::error::{ErrorCode, IntersegError};
use crate::model::{Identifier, SegmentLabel};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("member not found: {0}")]
    UnknownMember(u64),
    #[error("segment not found: {0}")]
    UnknownSegment(String),
    #[error("unknown segment field: {0}")]
    UnknownField(String),
    #[error("field {field} cannot classify identifier {id}")]
    UnsupportedIdentifier { field: String, id: String },
    #[error("column not found in headings: {0}")]
    MissingColumn(String),
}

impl IntersegError for LookupError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::NotFound
    }
}

/// Maps an entity to the segment it belongs to.
pub trait Classifier {
    fn classify(&self, id: &Identifier) -> Result<SegmentLabel, LookupError>;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn classify(&self, id: &Identifier) -> Result<SegmentLabel, LookupError> {
        (**self).classify(id)
    }
}
