use std::sync::Arc;

use crate::adapters::{
    ImageCodecAdapter, ImageprocOverlayAdapter, LibavVideoAdapter, LocalFsAdapter,
    TracingLogAdapter,
};
use crate::app::{AssembleInteractor, PipelineInteractor, StampInteractor};
use crate::config_initialization::PipelineConfig;
use crate::domain::errors::DomainError;
use crate::ports::{FsPort, ImagePort, LogPort, OverlayPort, VideoSinkFactory};

pub trait AppContainer: Send + Sync {
    fn stamp_interactor(&self) -> Arc<StampInteractor>;
    fn assemble_interactor(&self) -> Arc<AssembleInteractor>;
    fn pipeline_interactor(&self) -> Arc<PipelineInteractor>;
}

pub struct DefaultAppContainer {
    stamp_interactor: Arc<StampInteractor>,
    assemble_interactor: Arc<AssembleInteractor>,
    pipeline_interactor: Arc<PipelineInteractor>,
}

impl DefaultAppContainer {
    /// Wire the production adapters for a resolved configuration
    pub fn new(config: &PipelineConfig) -> Result<Self, DomainError> {
        let fs_port = Arc::new(LocalFsAdapter::new());
        let image_port = Arc::new(ImageCodecAdapter::new(config.jpeg_quality)?);
        let overlay_port = Arc::new(match &config.font_path {
            Some(path) => ImageprocOverlayAdapter::from_font_file(path)?,
            None => ImageprocOverlayAdapter::new()?,
        });
        let video_factory = Arc::new(LibavVideoAdapter::new()?);
        let log_port = Arc::new(TracingLogAdapter::new());

        Ok(Self::with_ports(
            fs_port,
            image_port,
            overlay_port,
            video_factory,
            log_port,
        ))
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        fs_port: Arc<dyn FsPort>,
        image_port: Arc<dyn ImagePort>,
        overlay_port: Arc<dyn OverlayPort>,
        video_factory: Arc<dyn VideoSinkFactory>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        let stamp_interactor = Arc::new(StampInteractor::new(
            Arc::clone(&fs_port),
            Arc::clone(&image_port),
            Arc::clone(&overlay_port),
            Arc::clone(&log_port),
        ));

        let assemble_interactor = Arc::new(AssembleInteractor::new(
            Arc::clone(&fs_port),
            Arc::clone(&image_port),
            Arc::clone(&video_factory),
            Arc::clone(&log_port),
        ));

        let pipeline_interactor = Arc::new(PipelineInteractor::new(
            Arc::clone(&stamp_interactor),
            Arc::clone(&assemble_interactor),
            Arc::clone(&log_port),
        ));

        Self {
            stamp_interactor,
            assemble_interactor,
            pipeline_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn stamp_interactor(&self) -> Arc<StampInteractor> {
        Arc::clone(&self.stamp_interactor)
    }

    fn assemble_interactor(&self) -> Arc<AssembleInteractor> {
        Arc::clone(&self.assemble_interactor)
    }

    fn pipeline_interactor(&self) -> Arc<PipelineInteractor> {
        Arc::clone(&self.pipeline_interactor)
    }
}
