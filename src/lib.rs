pub mod config;
pub mod error;
pub mod models;
pub mod input;
pub mod llm;
pub mod analysis;
pub mod report;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use llm::{ClassifyOptions, ClientSettings, OpenAiClassifier, SentimentClassifier};
pub use analysis::{AnalysisPipeline, CancellationFlag, CompletedRun, RunObserver};
pub use models::{AnalysisRun, Sentiment, SentimentVerdict, TextUnit, Verdict};
