//! Command-line argument definitions
//!
//! Every option can also come from a `TIMELAPSE_*` environment variable.
//! Options left unset fall through to the config file, then the defaults.

use std::path::PathBuf;

use clap::Args;

use crate::config_initialization::ConfigOverrides;

/// Folder layout and date selection
#[derive(Args, Debug, Default)]
pub struct LayoutArgs {
    /// Directory holding the raw, dated and video folders
    #[arg(long, env = "TIMELAPSE_BASE_PATH")]
    pub base_path: Option<PathBuf>,

    /// Raw capture folder name
    #[arg(long, env = "TIMELAPSE_RAW_FOLDER")]
    pub raw_folder: Option<String>,

    /// Stamped image folder name
    #[arg(long, env = "TIMELAPSE_DATED_FOLDER")]
    pub dated_folder: Option<String>,

    /// Video output folder name
    #[arg(long, env = "TIMELAPSE_VIDEO_FOLDER")]
    pub video_folder: Option<String>,

    /// Date to process (YYYY-MM-DD), default today
    #[arg(short, long, env = "TIMELAPSE_DATE")]
    pub date: Option<String>,
}

/// Stamping options
#[derive(Args, Debug, Default)]
pub struct StampOptions {
    /// Timezone label appended to the burned-in timestamp
    #[arg(long, env = "TIMELAPSE_TIMEZONE")]
    pub timezone: Option<String>,

    /// Delete the raw date folder after stamping
    #[arg(long, env = "TIMELAPSE_REMOVE_RAW", conflicts_with = "keep_raw")]
    pub remove_raw: bool,

    /// Keep the raw date folder even if the config says otherwise
    #[arg(long)]
    pub keep_raw: bool,

    /// JPEG quality of the stamped images (1-100)
    #[arg(long, env = "TIMELAPSE_JPEG_QUALITY", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: Option<u8>,

    /// TrueType/OpenType font for the timestamp
    #[arg(long, env = "TIMELAPSE_FONT_PATH")]
    pub font_path: Option<PathBuf>,
}

/// Assembly options
#[derive(Args, Debug, Default)]
pub struct VideoOptions {
    /// Assemble every dated image into complete.<ext>
    #[arg(long, env = "TIMELAPSE_ALL_DATES")]
    pub all_dates: bool,

    /// Uncompressed AVI instead of MP4
    #[arg(long, env = "TIMELAPSE_RAW_OUTPUT")]
    pub raw_output: bool,

    /// Target bitrate in kbit/s; 0 or less keeps the encoder default
    #[arg(long, env = "TIMELAPSE_BITRATE", allow_negative_numbers = true)]
    pub bitrate: Option<i64>,

    /// Output frames per second
    #[arg(long, env = "TIMELAPSE_FRAME_RATE")]
    pub frame_rate: Option<u32>,

    /// Earliest capture time to include (HH:MM)
    #[arg(long, env = "TIMELAPSE_WINDOW_START")]
    pub window_start: Option<String>,

    /// Latest capture time to include (HH:MM)
    #[arg(long, env = "TIMELAPSE_WINDOW_END")]
    pub window_end: Option<String>,
}

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    #[command(flatten)]
    pub stamp: StampOptions,

    #[command(flatten)]
    pub video: VideoOptions,
}

/// Arguments for the stamp command
#[derive(Args, Debug, Default)]
pub struct StampArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    #[command(flatten)]
    pub stamp: StampOptions,
}

/// Arguments for the assemble command
#[derive(Args, Debug, Default)]
pub struct AssembleArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    #[command(flatten)]
    pub video: VideoOptions,
}

impl LayoutArgs {
    fn apply(&self, overrides: &mut ConfigOverrides) {
        overrides.base_path = self.base_path.clone();
        overrides.raw_folder = self.raw_folder.clone();
        overrides.dated_folder = self.dated_folder.clone();
        overrides.video_folder = self.video_folder.clone();
        overrides.date = self.date.clone();
    }
}

impl StampOptions {
    fn apply(&self, overrides: &mut ConfigOverrides) {
        overrides.timezone = self.timezone.clone();
        overrides.remove_raw = match (self.remove_raw, self.keep_raw) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };
        overrides.jpeg_quality = self.jpeg_quality;
        overrides.font_path = self.font_path.clone();
    }
}

impl VideoOptions {
    fn apply(&self, overrides: &mut ConfigOverrides) {
        // Flags only switch modes on; off is the config file's business
        overrides.all_dates = self.all_dates.then_some(true);
        overrides.raw_output = self.raw_output.then_some(true);
        overrides.bitrate_kbps = self.bitrate;
        overrides.frame_rate = self.frame_rate;
        overrides.window_start = self.window_start.clone();
        overrides.window_end = self.window_end.clone();
    }
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::default();
        self.layout.apply(&mut overrides);
        self.stamp.apply(&mut overrides);
        self.video.apply(&mut overrides);
        overrides
    }
}

impl StampArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::default();
        self.layout.apply(&mut overrides);
        self.stamp.apply(&mut overrides);
        overrides
    }
}

impl AssembleArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::default();
        self.layout.apply(&mut overrides);
        self.video.apply(&mut overrides);
        overrides
    }
}
