//! Error handling module for adapter code

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors raised by the concrete adapters before they reach the domain
#[derive(Error, Debug)]
pub enum TimelapseError {
    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInitError { message: String },

    /// No usable encoder for the requested fidelity
    #[error("No encoder available: {message}")]
    EncoderUnavailable { message: String },

    /// Font could not be loaded
    #[error("Failed to load font: {message}")]
    FontError { message: String },

    /// Unsupported configuration file type
    #[error("Unsupported config file '{path}'. Use .toml, .yaml or .yml")]
    UnsupportedConfigFormat { path: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Directory walk error
    #[error("Directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    /// Image codec error
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// FFmpeg error
    #[error("FFmpeg error: {0}")]
    FFmpegError(#[from] ffmpeg_next::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// YAML parse error
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for adapter operations
pub type TimelapseResult<T> = std::result::Result<T, TimelapseError>;

impl From<TimelapseError> for DomainError {
    fn from(err: TimelapseError) -> Self {
        let message = err.to_string();
        match err {
            TimelapseError::IoError(_) | TimelapseError::WalkError(_) => {
                DomainError::FsFail(message)
            }
            TimelapseError::ImageError(_) | TimelapseError::FontError { .. } => {
                DomainError::ImageFail(message)
            }
            TimelapseError::FFmpegInitError { .. }
            | TimelapseError::EncoderUnavailable { .. }
            | TimelapseError::FFmpegError(_) => DomainError::EncoderFail(message),
            TimelapseError::TomlError(_)
            | TimelapseError::YamlError(_)
            | TimelapseError::UnsupportedConfigFormat { .. } => DomainError::ConfigFail(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_fs_fail() {
        let err = TimelapseError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        let domain: DomainError = err.into();
        assert!(matches!(domain, DomainError::FsFail(ref m) if m.contains("read-only")));
    }

    #[test]
    fn test_config_errors_map_to_config_fail() {
        let err = TimelapseError::UnsupportedConfigFormat {
            path: "timelapse.ini".to_string(),
        };
        let domain: DomainError = err.into();
        assert_eq!(domain.exit_code(), 2);
    }

    #[test]
    fn test_encoder_errors_map_to_encoder_fail() {
        let err = TimelapseError::EncoderUnavailable {
            message: "rawvideo".to_string(),
        };
        let domain: DomainError = err.into();
        assert!(matches!(domain, DomainError::EncoderFail(_)));
    }
}
