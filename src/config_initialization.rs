//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::ports::ConfigPort;

/// Run parameters shared by both stages.
///
/// Every field has a default, so config files only need the keys they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root holding the raw, dated and video folders
    pub base_path: PathBuf,
    pub raw_folder: String,
    pub dated_folder: String,
    pub video_folder: String,
    /// `YYYY-MM-DD`; today's local date when unset
    pub date: Option<String>,
    /// Display-only label appended to the burned-in timestamp
    pub timezone: String,
    /// Delete the raw date folder after a successful stamp
    pub remove_raw: bool,
    pub jpeg_quality: u8,
    /// TrueType/OpenType font used instead of the embedded monospace face
    pub font_path: Option<PathBuf>,
    pub video: VideoConfig,
}

/// Assembler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Assemble every dated image into `complete.<ext>`
    pub all_dates: bool,
    /// Raw frames in AVI instead of lossy MP4
    pub raw_output: bool,
    /// Zero or negative keeps the encoder default
    pub bitrate_kbps: i64,
    pub frame_rate: u32,
    /// `HH:MM`, inclusive
    pub window_start: Option<String>,
    /// `HH:MM`, inclusive
    pub window_end: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            raw_folder: "Raw".to_string(),
            dated_folder: "Dated".to_string(),
            video_folder: "Video".to_string(),
            date: None,
            timezone: "UTC".to_string(),
            remove_raw: false,
            jpeg_quality: 90,
            font_path: None,
            video: VideoConfig::default(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            all_dates: false,
            raw_output: false,
            bitrate_kbps: 0,
            frame_rate: 30,
            window_start: None,
            window_end: None,
        }
    }
}

impl PipelineConfig {
    pub fn layout(&self) -> FolderLayout {
        FolderLayout {
            base_path: self.base_path.clone(),
            raw_folder: self.raw_folder.clone(),
            dated_folder: self.dated_folder.clone(),
            video_folder: self.video_folder.clone(),
        }
    }

    pub fn date_key(&self) -> Result<DateKey, DomainError> {
        match &self.date {
            Some(date) => DateKey::parse(date),
            None => Ok(DateKey::today()),
        }
    }

    pub fn window(&self) -> Result<TimeWindow, DomainError> {
        TimeWindow::parse(
            self.video.window_start.as_deref(),
            self.video.window_end.as_deref(),
        )
    }

    /// Check every value a stage would otherwise reject halfway through
    pub fn validate(&self) -> Result<(), DomainError> {
        for (key, value) in [
            ("raw_folder", &self.raw_folder),
            ("dated_folder", &self.dated_folder),
            ("video_folder", &self.video_folder),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::BadArgs(format!("{} cannot be empty", key)));
            }
        }
        if self.raw_folder.trim() == self.dated_folder.trim() {
            return Err(DomainError::BadArgs(format!(
                "raw_folder and dated_folder must differ, both are '{}'",
                self.raw_folder
            )));
        }
        if self.timezone.trim().is_empty() {
            return Err(DomainError::BadArgs("timezone cannot be empty".to_string()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(DomainError::BadArgs(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if self.video.frame_rate == 0 {
            return Err(DomainError::BadArgs("frame_rate must be positive".to_string()));
        }
        self.date_key()?;
        self.window()?;
        Ok(())
    }

    pub fn stamp_request(&self) -> Result<StampRequest, DomainError> {
        Ok(StampRequest {
            layout: self.layout(),
            date: self.date_key()?,
            timezone: self.timezone.clone(),
            remove_raw: self.remove_raw,
        })
    }

    pub fn assembly_request(&self) -> Result<VideoAssemblyRequest, DomainError> {
        let inclusion = if self.video.all_dates {
            InclusionMode::AllDates
        } else {
            InclusionMode::SingleDate
        };
        Ok(VideoAssemblyRequest {
            layout: self.layout(),
            date: self.date_key()?,
            inclusion,
            fidelity: CodecFidelity::from_raw_flag(self.video.raw_output),
            bitrate_kbps: self.video.bitrate_kbps,
            frame_rate: self.video.frame_rate,
            window: self.window()?,
        })
    }
}

/// Values supplied on the command line or through `TIMELAPSE_*` variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub base_path: Option<PathBuf>,
    pub raw_folder: Option<String>,
    pub dated_folder: Option<String>,
    pub video_folder: Option<String>,
    pub date: Option<String>,
    pub timezone: Option<String>,
    pub remove_raw: Option<bool>,
    pub jpeg_quality: Option<u8>,
    pub font_path: Option<PathBuf>,
    pub all_dates: Option<bool>,
    pub raw_output: Option<bool>,
    pub bitrate_kbps: Option<i64>,
    pub frame_rate: Option<u32>,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
}

impl ConfigOverrides {
    /// Apply every set value; returns how many were applied
    pub fn apply_to(&self, config: &mut PipelineConfig) -> usize {
        let mut applied = 0;

        fn set<T: Clone>(target: &mut T, value: &Option<T>, applied: &mut usize) {
            if let Some(v) = value {
                *target = v.clone();
                *applied += 1;
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>, applied: &mut usize) {
            if value.is_some() {
                *target = value.clone();
                *applied += 1;
            }
        }

        set(&mut config.base_path, &self.base_path, &mut applied);
        set(&mut config.raw_folder, &self.raw_folder, &mut applied);
        set(&mut config.dated_folder, &self.dated_folder, &mut applied);
        set(&mut config.video_folder, &self.video_folder, &mut applied);
        set_opt(&mut config.date, &self.date, &mut applied);
        set(&mut config.timezone, &self.timezone, &mut applied);
        set(&mut config.remove_raw, &self.remove_raw, &mut applied);
        set(&mut config.jpeg_quality, &self.jpeg_quality, &mut applied);
        set_opt(&mut config.font_path, &self.font_path, &mut applied);
        set(&mut config.video.all_dates, &self.all_dates, &mut applied);
        set(&mut config.video.raw_output, &self.raw_output, &mut applied);
        set(&mut config.video.bitrate_kbps, &self.bitrate_kbps, &mut applied);
        set(&mut config.video.frame_rate, &self.frame_rate, &mut applied);
        set_opt(&mut config.video.window_start, &self.window_start, &mut applied);
        set_opt(&mut config.video.window_end, &self.window_end, &mut applied);

        applied
    }
}

/// Resolve configuration following precedence: CLI/Env > File > Defaults
pub fn initialize_configuration_hierarchy(
    config_port: &dyn ConfigPort,
    config_file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<PipelineConfig, DomainError> {
    info!("Initializing configuration hierarchy");

    let mut config = match config_file {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            config_port.load_config(path)?
        }
        None => match config_port
            .default_config_paths()
            .into_iter()
            .find(|p| p.is_file())
        {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                config_port.load_config(&path)?
            }
            None => {
                info!("No config file found, using defaults");
                PipelineConfig::default()
            }
        },
    };

    let applied = overrides.apply_to(&mut config);
    if applied > 0 {
        info!("Applied {} command-line/environment overrides", applied);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FileConfigAdapter;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let adapter = FileConfigAdapter::with_search_dir(dir.path());
        let config =
            initialize_configuration_hierarchy(&adapter, None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_overrides_beat_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("timelapse.toml"),
            "timezone = \"BST\"\ndate = \"2021-05-23\"\n[video]\nframe_rate = 15\n",
        )
        .unwrap();
        let adapter = FileConfigAdapter::with_search_dir(dir.path());

        let overrides = ConfigOverrides {
            frame_rate: Some(24),
            window_start: Some("07:00".to_string()),
            ..Default::default()
        };
        let config = initialize_configuration_hierarchy(&adapter, None, &overrides).unwrap();

        assert_eq!(config.timezone, "BST");
        assert_eq!(config.video.frame_rate, 24);
        assert_eq!(config.video.window_start.as_deref(), Some("07:00"));
        assert_eq!(config.date.as_deref(), Some("2021-05-23"));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let adapter = FileConfigAdapter::new();
        let err = initialize_configuration_hierarchy(
            &adapter,
            Some(Path::new("/nonexistent/timelapse.toml")),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::ConfigFail(_)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.video.frame_rate = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.date = Some("23-05-2021".to_string());
        assert!(matches!(config.validate(), Err(DomainError::BadArgs(_))));

        let mut config = PipelineConfig::default();
        config.video.window_start = Some("19:00".to_string());
        config.video.window_end = Some("07:00".to_string());
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.jpeg_quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dated_folder_cannot_alias_raw_folder() {
        let dir = TempDir::new().unwrap();
        let adapter = FileConfigAdapter::with_search_dir(dir.path());
        let overrides = ConfigOverrides {
            dated_folder: Some("Raw".to_string()),
            ..Default::default()
        };

        let err = initialize_configuration_hierarchy(&adapter, None, &overrides).unwrap_err();

        assert!(matches!(err, DomainError::BadArgs(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_requests_from_config() {
        let config = PipelineConfig {
            base_path: PathBuf::from("/srv/camera"),
            date: Some("2021-05-23".to_string()),
            timezone: "BST".to_string(),
            remove_raw: true,
            video: VideoConfig {
                raw_output: true,
                bitrate_kbps: 30000,
                window_end: Some("19:00".to_string()),
                ..VideoConfig::default()
            },
            ..PipelineConfig::default()
        };

        let stamp = config.stamp_request().unwrap();
        assert_eq!(stamp.layout.raw_dir(&stamp.date), PathBuf::from("/srv/camera/Raw/2021-05-23"));
        assert!(stamp.remove_raw);

        let assembly = config.assembly_request().unwrap();
        assert_eq!(assembly.inclusion, InclusionMode::SingleDate);
        assert_eq!(assembly.fidelity, CodecFidelity::Raw);
        assert_eq!(
            assembly.output_path(),
            PathBuf::from("/srv/camera/Video/2021-05-23_0000-1900.avi")
        );
    }
}
