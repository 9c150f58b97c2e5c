use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::analysis::insights::SummaryEngine;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::llm::SentimentClassifier;
use crate::models::{AnalysisRun, RunStats, RunSummary, TextUnit};

/// Receives run updates. Both hooks default to no-ops.
pub trait RunObserver: Send + Sync {
    /// Called after every appended verdict, in input order.
    fn on_progress(&self, _run: &AnalysisRun, _stats: &RunStats) {}

    /// Called exactly once, after the final verdict.
    fn on_complete(&self, _run: &AnalysisRun, _summary: &RunSummary) {}
}

pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Shared stop signal, checked between units.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct CompletedRun {
    pub run: AnalysisRun,
    pub summary: RunSummary,
}

pub struct AnalysisPipeline {
    classifier: Arc<dyn SentimentClassifier>,
    summary_engine: SummaryEngine,
    cancellation: CancellationFlag,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(classifier: impl SentimentClassifier + 'static, config: PipelineConfig) -> Self {
        Self {
            classifier: Arc::new(classifier),
            summary_engine: SummaryEngine::new(),
            cancellation: CancellationFlag::new(),
            config,
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancellation
    }

    /// Classifies `units` in order, publishing a snapshot after each verdict.
    /// Each call builds a fresh run; nothing carries over from earlier runs.
    pub async fn run_analysis(
        &self,
        units: Vec<TextUnit>,
        observer: &dyn RunObserver,
    ) -> Result<CompletedRun> {
        if units.is_empty() {
            return Err(Error::InvalidInput("No valid text found to analyze".to_string()));
        }

        let total = units.len();
        let limit = self.config.concurrency_limit.max(1);
        let options = self.config.options;
        tracing::info!(
            "Analyzing {} text(s) with {} (max {} in flight)",
            total,
            self.classifier.name(),
            limit
        );

        let mut run = AnalysisRun::with_capacity(total);

        let cancellation = self.cancellation.clone();
        let classifier = self.classifier.clone();
        // Units are only pulled from the iterator when a slot frees up, so
        // the flag check stops new requests without reordering results.
        let requests = units
            .into_iter()
            .take_while(move |_| !cancellation.is_cancelled())
            .map(move |unit| {
                let classifier = classifier.clone();
                async move { classifier.classify(&unit, options).await }
            });
        let mut verdicts = stream::iter(requests).buffered(limit);

        while let Some(verdict) = verdicts.next().await {
            run.push(verdict);
            observer.on_progress(&run, &RunStats::compute(&run));

            if self.cancellation.is_cancelled() {
                break;
            }
        }

        // Also covers a flag raised before the first unit was pulled
        let cancelled = run.len() < total;

        if cancelled {
            tracing::warn!("Run cancelled after {}/{} text(s)", run.len(), total);
        } else {
            tracing::info!("Completed analysis of {} text(s)", run.len());
        }

        let summary = self.summary_engine.generate_summary(&run, cancelled);
        observer.on_complete(&run, &summary);

        Ok(CompletedRun { run, summary })
    }
}
