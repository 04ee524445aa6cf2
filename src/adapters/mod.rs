// Adapters - External system implementations

pub mod file_config;
pub mod fs_local;
pub mod image_codec;
pub mod overlay_imageproc;
pub mod tracing_log;
pub mod video_libav;

// Re-export adapters
pub use file_config::FileConfigAdapter;
pub use fs_local::LocalFsAdapter;
pub use image_codec::ImageCodecAdapter;
pub use overlay_imageproc::ImageprocOverlayAdapter;
pub use tracing_log::TracingLogAdapter;
pub use video_libav::LibavVideoAdapter;
