// Pipeline interactor - Stamp then assemble for one date

use std::sync::Arc;

use crate::app::{AssembleInteractor, StampInteractor};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Runs both stages in sequence; a skipped stage does not stop the next one
pub struct PipelineInteractor {
    stamp_interactor: Arc<StampInteractor>,
    assemble_interactor: Arc<AssembleInteractor>,
    log_port: Arc<dyn LogPort>,
}

impl PipelineInteractor {
    pub fn new(
        stamp_interactor: Arc<StampInteractor>,
        assemble_interactor: Arc<AssembleInteractor>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            stamp_interactor,
            assemble_interactor,
            log_port,
        }
    }

    pub fn execute(
        &self,
        stamp_request: &StampRequest,
        assembly_request: &VideoAssemblyRequest,
    ) -> Result<PipelineReport, DomainError> {
        self.log_port
            .info(&format!("Starting pipeline for {}", stamp_request.date));

        let stamp = self
            .stamp_interactor
            .execute(stamp_request)
            .inspect_err(|e| self.log_port.error(&format!("Stamping failed: {}", e)))?;

        let assemble = self
            .assemble_interactor
            .execute(assembly_request)
            .inspect_err(|e| self.log_port.error(&format!("Assembly failed: {}", e)))?;

        self.log_port.info("Pipeline finished");
        Ok(PipelineReport {
            stamp: Some(stamp),
            assemble: Some(assemble),
        })
    }
}
