pub mod pipeline;
pub mod aggregator;
pub mod insights;

pub use pipeline::{AnalysisPipeline, CancellationFlag, CompletedRun, NoopObserver, RunObserver};
pub use insights::SummaryEngine;
