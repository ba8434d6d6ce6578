use analysis::AnalysisError;
use ingestion::ParseError;
use interseg_core::error::{ErrorCode, IntersegError};
use interseg_core::LookupError;
use registry::RegistryError;

/// Finds the first typed error in the chain and reports its code.
///
/// Untyped errors raised by the front end itself are usage problems.
pub fn error_code_for(err: &anyhow::Error) -> ErrorCode {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<RegistryError>() {
            return e.error_code();
        }
        if let Some(e) = cause.downcast_ref::<ParseError>() {
            return e.error_code();
        }
        if let Some(e) = cause.downcast_ref::<AnalysisError>() {
            return e.error_code();
        }
        if let Some(e) = cause.downcast_ref::<LookupError>() {
            return e.error_code();
        }
        if cause.downcast_ref::<config::ConfigError>().is_some() {
            return ErrorCode::InvalidArgument;
        }
        if cause.downcast_ref::<std::io::Error>().is_some()
            || cause.downcast_ref::<serde_json::Error>().is_some()
        {
            return ErrorCode::Internal;
        }
    }
    ErrorCode::InvalidArgument
}
