// Application layer - Use case interactors

pub mod assemble_interactor;
pub mod container;
pub mod pipeline_interactor;
pub mod stamp_interactor;

#[cfg(test)]
mod test_support;

// Re-export interactors
pub use assemble_interactor::AssembleInteractor;
pub use container::{AppContainer, DefaultAppContainer};
pub use pipeline_interactor::PipelineInteractor;
pub use stamp_interactor::StampInteractor;
