use interseg_core::error::{ErrorCode, IntersegError};
use interseg_core::LookupError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a registry archive (bad magic)")]
    BadMagic,
    #[error("unsupported registry archive version: {0}")]
    UnsupportedVersion(u32),
    #[error("registry archive truncated: expected {expected} payload bytes, found {found}")]
    Truncated { expected: u64, found: u64 },
    #[error("Data integrity error (CRC mismatch)")]
    CrcMismatch,
    #[error("corrupt registry payload")]
    CorruptPayload,
    #[error("Serialization error")]
    Serialization,
    #[error("duplicate member id: {0}")]
    DuplicateMember(u64),
    #[error("line {line}: {message}")]
    InvalidRow { line: usize, message: String },
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl IntersegError for RegistryError {
    fn error_code(&self) -> ErrorCode {
        match self {
            RegistryError::Io(_) => ErrorCode::Internal,
            RegistryError::BadMagic
            | RegistryError::UnsupportedVersion(_)
            | RegistryError::Truncated { .. }
            | RegistryError::CrcMismatch
            | RegistryError::CorruptPayload => ErrorCode::DataLoss,
            RegistryError::Serialization => ErrorCode::Internal,
            RegistryError::DuplicateMember(_) | RegistryError::InvalidRow { .. } => {
                ErrorCode::InvalidArgument
            }
            RegistryError::Lookup(err) => err.error_code(),
        }
    }
}
