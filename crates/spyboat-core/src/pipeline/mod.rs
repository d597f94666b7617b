pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{preprocess_movie, run_pipeline, run_pipeline_reported};
pub use types::{NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter};
