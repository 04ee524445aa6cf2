// Domain errors - Error types for the domain layer

use std::fmt;
use std::path::PathBuf;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Configuration file could not be read or parsed
    ConfigFail(String),
    /// Filename stem does not follow the `yyMMdd_HHmm` pattern
    MalformedTimestamp(String),
    /// Filesystem operation failed
    FsFail(String),
    /// Still image could not be decoded, edited or encoded
    ImageFail(String),
    /// Video encoder or muxer failure
    EncoderFail(String),
    /// A frame does not match the geometry of the first frame
    GeometryMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// Internal error
    InternalError(String),
}

impl DomainError {
    /// Process exit code for this failure kind
    pub fn exit_code(&self) -> u8 {
        match self {
            DomainError::InternalError(_) => 1,
            DomainError::BadArgs(_) | DomainError::ConfigFail(_) => 2,
            DomainError::MalformedTimestamp(_) => 3,
            DomainError::FsFail(_) => 4,
            DomainError::ImageFail(_) => 5,
            DomainError::EncoderFail(_) => 6,
            DomainError::GeometryMismatch { .. } => 7,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::ConfigFail(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::MalformedTimestamp(msg) => write!(f, "Malformed timestamp: {}", msg),
            DomainError::FsFail(msg) => write!(f, "Filesystem error: {}", msg),
            DomainError::ImageFail(msg) => write!(f, "Image error: {}", msg),
            DomainError::EncoderFail(msg) => write!(f, "Video encoder error: {}", msg),
            DomainError::GeometryMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "Frame geometry mismatch: {} is {}x{}, expected {}x{}",
                path.display(),
                actual.0,
                actual.1,
                expected.0,
                expected.1
            ),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
