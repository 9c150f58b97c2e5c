use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::verdict::SentimentVerdict;

/// Ordered verdicts for one submitted batch. Only ever appended to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub started_at: DateTime<Utc>,
    verdicts: Vec<SentimentVerdict>,
}

impl AnalysisRun {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            started_at: Utc::now(),
            verdicts: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, verdict: SentimentVerdict) {
        self.verdicts.push(verdict);
    }

    pub fn verdicts(&self) -> &[SentimentVerdict] {
        &self.verdicts
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

impl Default for AnalysisRun {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<SentimentVerdict> for AnalysisRun {
    fn from_iter<I: IntoIterator<Item = SentimentVerdict>>(iter: I) -> Self {
        let mut run = AnalysisRun::new();
        run.verdicts.extend(iter);
        run
    }
}
