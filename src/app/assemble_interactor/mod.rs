// Assemble interactor - Encodes dated stills into one video

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the assembly stage
pub struct AssembleInteractor {
    fs_port: Arc<dyn FsPort>,
    image_port: Arc<dyn ImagePort>,
    video_factory: Arc<dyn VideoSinkFactory>,
    log_port: Arc<dyn LogPort>,
}

impl AssembleInteractor {
    /// Create new assemble interactor with injected ports
    pub fn new(
        fs_port: Arc<dyn FsPort>,
        image_port: Arc<dyn ImagePort>,
        video_factory: Arc<dyn VideoSinkFactory>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            fs_port,
            image_port,
            video_factory,
            log_port,
        }
    }

    /// Execute video assembly.
    ///
    /// The window filter runs before the output is touched, so a window
    /// that admits nothing leaves any previous video in place.
    pub fn execute(
        &self,
        request: &VideoAssemblyRequest,
    ) -> Result<StageOutcome<AssemblyReport>, DomainError> {
        let root = request.candidate_root();
        if !self.fs_port.directory_exists(&root)? {
            self.log_port.info(&format!(
                "Dated folder {} does not exist, nothing to assemble",
                root.display()
            ));
            return Ok(StageOutcome::skipped(format!(
                "dated folder {} does not exist",
                root.display()
            )));
        }

        let mut candidates = self
            .fs_port
            .list_files(&root, STILL_IMAGE_EXTENSION, true)?;
        CandidateOrdering::sort(&mut candidates);
        if candidates.is_empty() {
            self.log_port
                .info(&format!("No images in {}, nothing to assemble", root.display()));
            return Ok(StageOutcome::skipped(format!(
                "no images in {}",
                root.display()
            )));
        }

        let candidate_count = candidates.len();
        let window = request.effective_window();
        let frames = WindowFilter::retain(candidates, &window)?;
        self.log_port.info(&format!(
            "{} candidate images, {} inside window {}",
            candidate_count,
            frames.len(),
            window
        ));
        if frames.is_empty() {
            return Ok(StageOutcome::skipped(format!(
                "no images inside window {}",
                window
            )));
        }

        let output_path = request.output_path();
        if self.fs_port.file_exists(&output_path)? {
            self.log_port
                .info(&format!("Replacing existing {}", output_path.display()));
            self.fs_port.delete_file(&output_path)?;
        }
        self.fs_port.create_directory(&request.layout.video_dir())?;

        let geometry = self.encode(request, &frames, &output_path)?;

        self.log_port.info(&format!(
            "Wrote {} frames to {}",
            frames.len(),
            output_path.display()
        ));
        Ok(StageOutcome::Completed(AssemblyReport {
            candidates: candidate_count,
            frames: frames.len(),
            output_path,
            geometry,
            fidelity: request.fidelity,
        }))
    }

    fn encode(
        &self,
        request: &VideoAssemblyRequest,
        frames: &[PathBuf],
        output_path: &Path,
    ) -> Result<FrameGeometry, DomainError> {
        let (first, rest) = frames
            .split_first()
            .ok_or_else(|| DomainError::InternalError("no frames to encode".to_string()))?;

        let first_image = self.image_port.decode(first)?;
        let (width, height) = first_image.dimensions();
        let geometry = FrameGeometry::new(width, height);
        let spec = EncoderPolicy::stream_spec(request, geometry)?;

        let mut sink = self.video_factory.open(&spec)?;
        self.log_port.debug(&format!(
            "Opened {} at {} {} fps",
            output_path.display(),
            geometry,
            spec.frame_rate
        ));

        let written = sink.write_frame(&first_image);
        drop(first_image);
        let written = written.and_then(|_| self.write_remaining(sink.as_mut(), geometry, rest));

        let finished = match written {
            Ok(()) => sink.close(),
            Err(e) => {
                drop(sink);
                Err(e)
            }
        };
        if let Err(e) = finished {
            self.discard_partial(output_path);
            return Err(e);
        }
        Ok(geometry)
    }

    /// Decode, check and write each frame; one decoded image alive at a time
    fn write_remaining(
        &self,
        sink: &mut dyn VideoSink,
        geometry: FrameGeometry,
        frames: &[PathBuf],
    ) -> Result<(), DomainError> {
        for path in frames {
            let image = self.image_port.decode(path)?;
            let (width, height) = image.dimensions();
            GeometryCheck::ensure_matches(path, geometry, FrameGeometry::new(width, height))?;
            sink.write_frame(&image)?;
        }
        Ok(())
    }

    fn discard_partial(&self, output_path: &Path) {
        match self.fs_port.file_exists(output_path) {
            Ok(true) => {
                if let Err(e) = self.fs_port.delete_file(output_path) {
                    self.log_port.warn(&format!(
                        "Could not remove partial output {}: {}",
                        output_path.display(),
                        e
                    ));
                }
            }
            Ok(false) => {}
            Err(e) => self.log_port.warn(&e.to_string()),
        }
    }
}
