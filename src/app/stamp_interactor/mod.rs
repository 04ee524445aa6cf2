// Stamp interactor - Burns capture timestamps into a date's raw stills

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the stamping stage
pub struct StampInteractor {
    fs_port: Arc<dyn FsPort>,
    image_port: Arc<dyn ImagePort>,
    overlay_port: Arc<dyn OverlayPort>,
    log_port: Arc<dyn LogPort>,
}

impl StampInteractor {
    /// Create new stamp interactor with injected ports
    pub fn new(
        fs_port: Arc<dyn FsPort>,
        image_port: Arc<dyn ImagePort>,
        overlay_port: Arc<dyn OverlayPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            fs_port,
            image_port,
            overlay_port,
            log_port,
        }
    }

    /// Stamp every raw still of the request date into the dated folder.
    ///
    /// A missing raw folder skips the stage. Otherwise the dated folder is
    /// rebuilt from scratch, so reruns never leave stale images behind.
    pub fn execute(&self, request: &StampRequest) -> Result<StageOutcome<StampReport>, DomainError> {
        let raw_dir = request.layout.raw_dir(&request.date);
        if !self.fs_port.directory_exists(&raw_dir)? {
            self.log_port.info(&format!(
                "Raw folder {} does not exist, nothing to stamp",
                raw_dir.display()
            ));
            return Ok(StageOutcome::skipped(format!(
                "raw folder {} does not exist",
                raw_dir.display()
            )));
        }

        let dated_dir = request.layout.dated_dir(&request.date);
        if self.fs_port.directory_exists(&dated_dir)? {
            self.log_port
                .debug(&format!("Clearing {}", dated_dir.display()));
            self.fs_port.delete_directory(&dated_dir)?;
        }
        self.fs_port.create_directory(&dated_dir)?;

        let mut images = self
            .fs_port
            .list_files(&raw_dir, STILL_IMAGE_EXTENSION, false)?;
        CandidateOrdering::sort(&mut images);
        self.log_port.info(&format!(
            "Stamping {} images from {}",
            images.len(),
            raw_dir.display()
        ));

        for source in &images {
            let timestamp = CaptureTimestamp::from_path(source)?;
            let label = timestamp.overlay_label(&request.timezone);

            let mut pixels = self.image_port.decode(source)?;
            self.overlay_port
                .overlay(&mut pixels, &OverlaySpec::timestamp_label(label))?;

            let file_name = source.file_name().ok_or_else(|| {
                DomainError::FsFail(format!("{} has no file name", source.display()))
            })?;
            let destination = dated_dir.join(file_name);
            self.log_port
                .info(&format!("Saving {}", destination.display()));
            self.image_port.encode(&destination, &pixels)?;
        }

        let raw_removed = if request.remove_raw {
            self.log_port
                .info(&format!("Removing raw folder {}", raw_dir.display()));
            self.fs_port.delete_directory(&raw_dir)?;
            true
        } else {
            false
        };

        Ok(StageOutcome::Completed(StampReport {
            images: images.len(),
            dated_dir,
            raw_removed,
        }))
    }
}
