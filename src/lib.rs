pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod ground_truth;
pub mod output;
pub mod pipeline;
pub mod recording;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use batch::{BatchReport, BatchRunner, DiagnosticSink, WorkItem, discover_recordings};
pub use config::AnalysisConfig;
pub use error::{EcgError, Result};
pub use pipeline::{PeakPipeline, PipelineOutput};
pub use recording::Recording;
