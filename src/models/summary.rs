use serde::{Deserialize, Serialize};

use super::verdict::Sentiment;

pub const HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
    pub errors: u32,
    pub total: u32,
}

impl SentimentCounts {
    pub fn get(&self, sentiment: Sentiment) -> u32 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
}

/// Whole-number percentages of the submitted total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentPercentages {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentPercentages {
    pub fn get(&self, sentiment: Sentiment) -> u32 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceHistogram {
    pub bins: [u32; HISTOGRAM_BINS],
}

impl ConfidenceHistogram {
    pub fn bin_width() -> u32 {
        100 / HISTOGRAM_BINS as u32
    }

    pub fn label(index: usize) -> String {
        let width = Self::bin_width();
        let min = index as u32 * width;
        format!("{}-{}%", min, min + width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u32,
}

/// Statistics recomputed after every verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub counts: SentimentCounts,
    pub percentages: SentimentPercentages,
    /// Mean confidence in `[0, 1]`.
    pub average_confidence: f64,
    pub dominant: Option<Sentiment>,
    pub histogram: ConfidenceHistogram,
}

impl RunStats {
    pub fn dominant_label(&self) -> String {
        self.dominant
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudWord {
    pub keyword: String,
    pub count: u32,
    pub weight: u32,
}

/// Produced once, after the last verdict of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub stats: RunStats,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Insight>,
    pub word_cloud: Vec<CloudWord>,
    pub cancelled: bool,
}

impl RunSummary {
    /// Bar chart data: the most frequent cloud words.
    pub fn word_frequency(&self, limit: usize) -> &[CloudWord] {
        &self.word_cloud[..limit.min(self.word_cloud.len())]
    }
}
