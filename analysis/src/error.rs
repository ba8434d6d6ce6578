use interseg_core::error::{ErrorCode, IntersegError};
use interseg_core::LookupError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("relative percent difference is undefined for {a} and {b} (sum is zero)")]
    DegenerateRpd { a: f64, b: f64 },
    #[error("two-sample test needs non-empty samples, got {left} and {right} values")]
    EmptySample { left: usize, right: usize },
    #[error("sample contains NaN")]
    NanSample,
    #[error("population is empty")]
    EmptyPopulation,
}

impl IntersegError for AnalysisError {
    fn error_code(&self) -> ErrorCode {
        match self {
            AnalysisError::Lookup(err) => err.error_code(),
            AnalysisError::DegenerateRpd { .. }
            | AnalysisError::EmptySample { .. }
            | AnalysisError::NanSample
            | AnalysisError::EmptyPopulation => ErrorCode::InvalidArgument,
        }
    }
}
