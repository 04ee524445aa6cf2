//! Timelapse pipeline library
//!
//! Two stages share a date-scoped folder layout: the stamper burns each raw
//! still's capture time into it, and the assembler encodes the stamped stills
//! into one video. Both are reached through narrow ports so the media
//! backends can be swapped in tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config_initialization::PipelineConfig;
pub use domain::errors::DomainError;
pub use domain::model::{PipelineReport, StageOutcome};
pub use error::{TimelapseError, TimelapseResult};
