// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// chrono pattern of a capture filename stem, e.g. `210523_0730`
pub const CAPTURE_STEM_FORMAT: &str = "%y%m%d_%H%M";

/// chrono pattern of the burned-in label, without the timezone suffix
pub const OVERLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Extension of raw and dated still images
pub const STILL_IMAGE_EXTENSION: &str = "jpg";

/// Output name used when every date is assembled into one video
pub const COMPLETE_VIDEO_LABEL: &str = "complete";

const CAPTURE_STEM_LEN: usize = 11;
const CAPTURE_STEM_SEPARATOR: usize = 6;

/// Point in time decoded from a capture filename stem.
///
/// The stem must be exactly `yyMMdd_HHmm`: eleven characters, digits
/// everywhere except an underscore at index 6. The timezone label the
/// timestamp is displayed with is never used for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureTimestamp {
    datetime: NaiveDateTime,
}

impl CaptureTimestamp {
    /// Create a timestamp from an already decoded date and time
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self { datetime }
    }

    /// Parse a filename stem such as `210523_0730`
    pub fn parse_stem(stem: &str) -> Result<Self, DomainError> {
        let bytes = stem.as_bytes();
        let well_formed = bytes.len() == CAPTURE_STEM_LEN
            && bytes.iter().enumerate().all(|(i, b)| {
                if i == CAPTURE_STEM_SEPARATOR {
                    *b == b'_'
                } else {
                    b.is_ascii_digit()
                }
            });

        if !well_formed {
            return Err(DomainError::MalformedTimestamp(format!(
                "'{}' does not match yyMMdd_HHmm",
                stem
            )));
        }

        let datetime = NaiveDateTime::parse_from_str(stem, CAPTURE_STEM_FORMAT).map_err(|e| {
            DomainError::MalformedTimestamp(format!("'{}' is not a valid date/time: {}", stem, e))
        })?;

        Ok(Self { datetime })
    }

    /// Parse the stem of a capture file path
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                DomainError::MalformedTimestamp(format!(
                    "{} has no UTF-8 file stem",
                    path.display()
                ))
            })?;
        Self::parse_stem(stem)
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// Time of day, used for window filtering
    pub fn time_of_day(&self) -> NaiveTime {
        self.datetime.time()
    }

    /// Label burned into the image, e.g. `2021-05-23 07:30 BST`
    pub fn overlay_label(&self, timezone: &str) -> String {
        format!(
            "{} {}",
            self.datetime.format(OVERLAY_TIMESTAMP_FORMAT),
            timezone
        )
    }
}

/// Calendar date that scopes the raw, dated and video folders
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateKey {
    date: NaiveDate,
}

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Parse a `YYYY-MM-DD` date key
    pub fn parse(date_str: &str) -> Result<Self, DomainError> {
        let trimmed = date_str.trim();
        // Folder names must round-trip, so `2021-5-23` is rejected
        if trimmed.len() != 10 {
            return Err(DomainError::BadArgs(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD",
                date_str
            )));
        }
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|e| {
            DomainError::BadArgs(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD: {}",
                date_str, e
            ))
        })?;
        Ok(Self { date })
    }

    /// Today's date in the local timezone
    pub fn today() -> Self {
        Self {
            date: chrono::Local::now().date_naive(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

/// Optional time-of-day bounds, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl TimeWindow {
    /// Create a window, rejecting a start later than the end
    pub fn new(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Result<Self, DomainError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(DomainError::BadArgs(format!(
                    "Window start {} is later than window end {}",
                    s.format("%H:%M"),
                    e.format("%H:%M")
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// Window that admits every frame
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse optional `HH:MM` bounds
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, DomainError> {
        let start = start.map(Self::parse_bound).transpose()?;
        let end = end.map(Self::parse_bound).transpose()?;
        Self::new(start, end)
    }

    fn parse_bound(bound: &str) -> Result<NaiveTime, DomainError> {
        let trimmed = bound.trim();
        if trimmed.len() != 5 {
            return Err(DomainError::BadArgs(format!(
                "Invalid window bound '{}'. Expected HH:MM",
                bound
            )));
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|e| {
            DomainError::BadArgs(format!(
                "Invalid window bound '{}'. Expected HH:MM: {}",
                bound, e
            ))
        })
    }

    /// True when either bound is set
    pub fn is_set(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Check whether a time of day falls inside the window
    pub fn contains(&self, time: NaiveTime) -> bool {
        if let Some(start) = self.start {
            if time < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if time > end {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_bound = |b: Option<NaiveTime>, default: &str| {
            b.map(|t| format!("{:02}:{:02}", t.hour(), t.minute()))
                .unwrap_or_else(|| default.to_string())
        };
        write!(
            f,
            "{}-{}",
            fmt_bound(self.start, "00:00"),
            fmt_bound(self.end, "23:59")
        )
    }
}

/// Choice between a raw/lossless stream and the default lossy one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecFidelity {
    /// Uncompressed frames in an AVI container
    Raw,
    /// H.264 (or MPEG-4 fallback) in an MP4 container
    Lossy,
}

impl CodecFidelity {
    pub fn from_raw_flag(raw_output: bool) -> Self {
        if raw_output {
            CodecFidelity::Raw
        } else {
            CodecFidelity::Lossy
        }
    }

    /// Container extension for this fidelity
    pub fn extension(&self) -> &'static str {
        match self {
            CodecFidelity::Raw => "avi",
            CodecFidelity::Lossy => "mp4",
        }
    }
}

/// Which dated images an assembly run considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionMode {
    SingleDate,
    AllDates,
}

/// Folder names below the base path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderLayout {
    pub base_path: PathBuf,
    pub raw_folder: String,
    pub dated_folder: String,
    pub video_folder: String,
}

impl FolderLayout {
    /// `<root>/<rawFolder>/<date>`
    pub fn raw_dir(&self, date: &DateKey) -> PathBuf {
        self.base_path
            .join(&self.raw_folder)
            .join(date.to_string())
    }

    /// `<root>/<datedFolder>`
    pub fn dated_root(&self) -> PathBuf {
        self.base_path.join(&self.dated_folder)
    }

    /// `<root>/<datedFolder>/<date>`
    pub fn dated_dir(&self, date: &DateKey) -> PathBuf {
        self.dated_root().join(date.to_string())
    }

    /// `<root>/<videoFolder>`
    pub fn video_dir(&self) -> PathBuf {
        self.base_path.join(&self.video_folder)
    }
}

/// Parameters of one Stamper run
#[derive(Debug, Clone)]
pub struct StampRequest {
    pub layout: FolderLayout,
    pub date: DateKey,
    pub timezone: String,
    pub remove_raw: bool,
}

/// Parameters of one Assembler run
#[derive(Debug, Clone)]
pub struct VideoAssemblyRequest {
    pub layout: FolderLayout,
    pub date: DateKey,
    pub inclusion: InclusionMode,
    pub fidelity: CodecFidelity,
    /// Kilobits per second; zero or negative defers to the encoder
    pub bitrate_kbps: i64,
    pub frame_rate: u32,
    pub window: TimeWindow,
}

impl VideoAssemblyRequest {
    /// Folder the candidate images are listed from
    pub fn candidate_root(&self) -> PathBuf {
        match self.inclusion {
            InclusionMode::AllDates => self.layout.dated_root(),
            InclusionMode::SingleDate => self.layout.dated_dir(&self.date),
        }
    }

    /// Window applied to the candidates; all-dates runs ignore it
    pub fn effective_window(&self) -> TimeWindow {
        match self.inclusion {
            InclusionMode::AllDates => TimeWindow::unbounded(),
            InclusionMode::SingleDate => self.window,
        }
    }

    /// `<root>/<videoFolder>/<name>.<ext>`
    pub fn output_path(&self) -> PathBuf {
        let name = crate::domain::rules::OutputNaming::video_name(
            &self.date,
            self.inclusion,
            &self.window,
        );
        self.layout
            .video_dir()
            .join(format!("{}.{}", name, self.fidelity.extension()))
    }
}

/// Width and height of a decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Black backing rectangle plus label text burned into a still
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySpec {
    pub rect_x: i32,
    pub rect_y: i32,
    pub rect_width: u32,
    pub rect_height: u32,
    pub text_x: i32,
    pub text_y: i32,
    pub text: String,
}

impl OverlaySpec {
    /// Fixed overlay placement, independent of the source resolution
    pub fn timestamp_label(text: impl Into<String>) -> Self {
        Self {
            rect_x: 895,
            rect_y: 675,
            rect_width: 500,
            rect_height: 100,
            text_x: 900,
            text_y: 680,
            text: text.into(),
        }
    }
}

/// Everything an encoder backend needs to open an output stream
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStreamSpec {
    pub path: PathBuf,
    pub geometry: FrameGeometry,
    pub frame_rate: u32,
    pub fidelity: CodecFidelity,
    /// Bits per second, `None` for encoder defaults
    pub bit_rate: Option<usize>,
}

/// Result of a stage that did not fail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome<T> {
    /// Nothing to do; not an error
    Skipped { reason: String },
    /// Stage ran to completion
    Completed(T),
}

impl<T> StageOutcome<T> {
    pub fn skipped(reason: impl Into<String>) -> Self {
        StageOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StageOutcome::Skipped { .. })
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            StageOutcome::Completed(report) => Some(report),
            StageOutcome::Skipped { .. } => None,
        }
    }
}

/// Summary of a completed Stamper run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StampReport {
    pub images: usize,
    pub dated_dir: PathBuf,
    pub raw_removed: bool,
}

/// Summary of a completed Assembler run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyReport {
    /// Images listed before window filtering
    pub candidates: usize,
    /// Frames written after window filtering
    pub frames: usize,
    pub output_path: PathBuf,
    /// Size of the first frame kept by the window; every written frame matches it
    pub geometry: FrameGeometry,
    pub fidelity: CodecFidelity,
}

/// Outcome of every stage that ran in one invocation
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PipelineReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp: Option<StageOutcome<StampReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assemble: Option<StageOutcome<AssemblyReport>>,
}
