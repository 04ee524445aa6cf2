// Domain rules - Selection, naming and encoder policies

use std::path::{Path, PathBuf};

use chrono::Timelike;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Naming policy for the produced video
pub struct OutputNaming;

impl OutputNaming {
    /// `complete`, `<date>` or `<date>_HHMM-HHMM`
    pub fn video_name(date: &DateKey, inclusion: InclusionMode, window: &TimeWindow) -> String {
        match inclusion {
            InclusionMode::AllDates => COMPLETE_VIDEO_LABEL.to_string(),
            InclusionMode::SingleDate if window.is_set() => {
                format!("{}_{}", date, Self::window_suffix(window))
            }
            InclusionMode::SingleDate => date.to_string(),
        }
    }

    /// Effective window as `HHMM-HHMM`; open bounds display as 0000 and 2359
    pub fn window_suffix(window: &TimeWindow) -> String {
        let start = window
            .start
            .map(|t| format!("{:02}{:02}", t.hour(), t.minute()))
            .unwrap_or_else(|| "0000".to_string());
        let end = window
            .end
            .map(|t| format!("{:02}{:02}", t.hour(), t.minute()))
            .unwrap_or_else(|| "2359".to_string());
        format!("{}-{}", start, end)
    }
}

/// Canonical frame order
pub struct CandidateOrdering;

impl CandidateOrdering {
    /// Sort by full path, byte-wise ascending.
    ///
    /// Capture stems are zero-padded `yyMMdd_HHmm`, so within one date folder
    /// this is chronological order.
    pub fn sort(candidates: &mut [PathBuf]) {
        candidates.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    }

    /// Case-insensitive match on the still image extension
    pub fn is_still_image(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(STILL_IMAGE_EXTENSION))
            .unwrap_or(false)
    }
}

/// Time-of-day filtering of ordered candidates
pub struct WindowFilter;

impl WindowFilter {
    /// Keep the candidates whose capture time falls inside the window.
    ///
    /// An unbounded window keeps everything without parsing names. Otherwise
    /// a malformed name fails the run the same way it does in the Stamper.
    pub fn retain(candidates: Vec<PathBuf>, window: &TimeWindow) -> Result<Vec<PathBuf>, DomainError> {
        if !window.is_set() {
            return Ok(candidates);
        }

        let mut retained = Vec::with_capacity(candidates.len());
        for path in candidates {
            let timestamp = CaptureTimestamp::from_path(&path)?;
            if window.contains(timestamp.time_of_day()) {
                retained.push(path);
            }
        }
        Ok(retained)
    }
}

/// Encoder parameter policy
pub struct EncoderPolicy;

impl EncoderPolicy {
    /// Kilobits per second to bits per second; non-positive means encoder default
    pub fn bit_rate(bitrate_kbps: i64) -> Option<usize> {
        if bitrate_kbps > 0 {
            usize::try_from(bitrate_kbps)
                .ok()
                .and_then(|kbps| kbps.checked_mul(1000))
        } else {
            None
        }
    }

    /// Build the stream description for the first retained frame
    pub fn stream_spec(
        request: &VideoAssemblyRequest,
        geometry: FrameGeometry,
    ) -> Result<VideoStreamSpec, DomainError> {
        if request.frame_rate == 0 {
            return Err(DomainError::BadArgs(
                "Frame rate must be positive".to_string(),
            ));
        }
        Ok(VideoStreamSpec {
            path: request.output_path(),
            geometry,
            frame_rate: request.frame_rate,
            fidelity: request.fidelity,
            bit_rate: Self::bit_rate(request.bitrate_kbps),
        })
    }
}

/// Frame geometry validation
pub struct GeometryCheck;

impl GeometryCheck {
    /// Reject a frame whose size differs from the stream geometry
    pub fn ensure_matches(
        path: &Path,
        expected: FrameGeometry,
        actual: FrameGeometry,
    ) -> Result<(), DomainError> {
        if expected != actual {
            return Err(DomainError::GeometryMismatch {
                path: path.to_path_buf(),
                expected: (expected.width, expected.height),
                actual: (actual.width, actual.height),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
