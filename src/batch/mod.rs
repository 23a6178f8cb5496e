mod discovery;
mod orchestrator;
mod sink;

pub use discovery::{WorkItem, discover_recordings};
pub use orchestrator::{
    BatchReport, BatchRunner, BenchmarkRun, ItemOutcome, RecordingFailure, RecordingResult,
};
pub use sink::DiagnosticSink;
