use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    NotFound,
    DataLoss,
    Internal,
}

impl ErrorCode {
    /// Process exit status reported by the command line front end.
    pub fn exit_status(self) -> u8 {
        match self {
            ErrorCode::InvalidArgument | ErrorCode::NotFound => 1,
            ErrorCode::DataLoss => 2,
            ErrorCode::Internal => 3,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::DataLoss => "DATA_LOSS",
            ErrorCode::Internal => "INTERNAL",
        };
        write!(f, "{}", s)
    }
}

pub trait IntersegError: std::error::Error {
    fn error_code(&self) -> ErrorCode;
}
