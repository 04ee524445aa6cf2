// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::config_initialization::PipelineConfig;
use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for file system operations
pub trait FsPort: Send + Sync {
    /// Check if directory exists
    fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError>;

    /// Check if file exists
    fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Create directory (including parent directories)
    fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Delete directory recursively
    fn delete_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Delete file
    fn delete_file(&self, file_path: &Path) -> Result<(), DomainError>;

    /// List files with the given extension (ASCII case-insensitive).
    ///
    /// Order is unspecified; callers sort.
    fn list_files(
        &self,
        dir_path: &Path,
        extension: &str,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, DomainError>;
}

/// Port for still image decoding and encoding
pub trait ImagePort: Send + Sync {
    /// Decode an image file into 8-bit RGB pixels
    fn decode(&self, path: &Path) -> Result<RgbImage, DomainError>;

    /// Encode pixels with a lossy still-image encoding
    fn encode(&self, path: &Path, image: &RgbImage) -> Result<(), DomainError>;
}

/// Port for the graphics primitive that burns a label into a bitmap
pub trait OverlayPort: Send + Sync {
    /// Fill the backing rectangle and draw the label, in place
    fn overlay(&self, image: &mut RgbImage, spec: &OverlaySpec) -> Result<(), DomainError>;
}

/// An open single-track video stream
pub trait VideoSink {
    /// Append one frame; its geometry must match the stream
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), DomainError>;

    /// Flush the encoder and finalize the container
    fn close(self: Box<Self>) -> Result<(), DomainError>;
}

/// Port for the codec/container backend
pub trait VideoSinkFactory: Send + Sync {
    /// Create the output file and open a stream on it
    fn open(&self, spec: &VideoStreamSpec) -> Result<Box<dyn VideoSink>, DomainError>;
}

/// Port for configuration management
pub trait ConfigPort: Send + Sync {
    /// Load a configuration file; missing keys take their defaults
    fn load_config(&self, file_path: &Path) -> Result<PipelineConfig, DomainError>;

    /// Default file locations searched when none is given
    fn default_config_paths(&self) -> Vec<PathBuf>;
}

/// Port for logging and observability
pub trait LogPort: Send + Sync {
    /// Log info message
    fn info(&self, message: &str);

    /// Log warning message
    fn warn(&self, message: &str);

    /// Log error message
    fn error(&self, message: &str);

    /// Log debug message
    fn debug(&self, message: &str);
}
