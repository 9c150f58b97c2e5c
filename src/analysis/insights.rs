use crate::analysis::aggregator::{keyword_frequency, keywords_for_sentiment};
use crate::models::{
    AnalysisRun, CloudWord, Insight, KeywordCount, RunStats, RunSummary, Sentiment,
};

/// Narrative text and keyword cloud generated once a run has finished.
pub struct SummaryEngine {
    settings: CloudSettings,
}

#[derive(Debug, Clone)]
struct CloudSettings {
    max_words: usize,
    base_weight: u32,
    weight_per_occurrence: u32,
    max_weight: u32,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            max_words: 30,
            base_weight: 14,
            weight_per_occurrence: 2,
            max_weight: 36,
        }
    }
}

impl SummaryEngine {
    pub fn new() -> Self {
        Self {
            settings: CloudSettings::default(),
        }
    }

    pub fn generate_summary(&self, run: &AnalysisRun, cancelled: bool) -> RunSummary {
        let stats = RunStats::compute(run);

        RunSummary {
            insights: self.generate_insights(run),
            recommendations: self.generate_recommendations(run, &stats),
            word_cloud: self.generate_word_cloud(run),
            stats,
            cancelled,
        }
    }

    pub fn generate_insights(&self, run: &AnalysisRun) -> Vec<Insight> {
        if run.is_empty() {
            return Vec::new();
        }

        let positive = keywords_for_sentiment(run, Sentiment::Positive, 3);
        let negative = keywords_for_sentiment(run, Sentiment::Negative, 3);
        let neutral = keywords_for_sentiment(run, Sentiment::Neutral, 3);
        let overall = keyword_frequency(run.verdicts(), 5);

        vec![
            Insight {
                title: "Positive Highlights".to_string(),
                text: self.subset_sentence(
                    run,
                    Sentiment::Positive,
                    &positive,
                    |words| format!("Customers frequently mentioned positive aspects like {}.", words),
                    "No positive feedback found.",
                ),
            },
            Insight {
                title: "Areas for Improvement".to_string(),
                text: self.subset_sentence(
                    run,
                    Sentiment::Negative,
                    &negative,
                    |words| {
                        format!(
                            "Customers expressed concerns about {}. These are opportunities for enhancement.",
                            words
                        )
                    },
                    "No negative feedback found.",
                ),
            },
            Insight {
                title: "Neutral Observations".to_string(),
                text: self.subset_sentence(
                    run,
                    Sentiment::Neutral,
                    &neutral,
                    |words| {
                        format!(
                            "Neutral comments often referenced {}. These topics may need more context.",
                            words
                        )
                    },
                    "No neutral feedback found.",
                ),
            },
            Insight {
                title: "Most Influential Words".to_string(),
                text: format!(
                    "The most impactful words across all feedback were: {}.",
                    or_none(&overall)
                ),
            },
        ]
    }

    pub fn generate_recommendations(&self, run: &AnalysisRun, stats: &RunStats) -> Vec<Insight> {
        if run.is_empty() {
            return Vec::new();
        }

        let negative = keywords_for_sentiment(run, Sentiment::Negative, 3);
        let positive = keywords_for_sentiment(run, Sentiment::Positive, 3);

        vec![
            Insight {
                title: "Response Strategy".to_string(),
                text: format!(
                    "With {}% negative feedback, prioritize addressing the most common concerns first. \
                     Develop a communication plan to acknowledge issues and outline improvements.",
                    stats.percentages.negative
                ),
            },
            Insight {
                title: "Product Improvements".to_string(),
                text: format!(
                    "Focus development efforts on enhancing features related to {} based on customer feedback.",
                    or_none(&negative)
                ),
            },
            Insight {
                title: "Positive Reinforcement".to_string(),
                text: format!(
                    "Recognize and amplify positive feedback about {} in marketing materials to build trust.",
                    or_none(&positive)
                ),
            },
            Insight {
                title: "Sentiment Tracking".to_string(),
                text: "Implement regular sentiment analysis to track changes over time. \
                       Set a goal to reduce negative sentiment by 20% in the next quarter."
                    .to_string(),
            },
        ]
    }

    pub fn generate_word_cloud(&self, run: &AnalysisRun) -> Vec<CloudWord> {
        keyword_frequency(run.verdicts(), self.settings.max_words)
            .into_iter()
            .map(|k| CloudWord {
                weight: self.weight(k.count),
                keyword: k.keyword,
                count: k.count,
            })
            .collect()
    }

    fn weight(&self, count: u32) -> u32 {
        self.settings
            .base_weight
            .saturating_add(count.saturating_mul(self.settings.weight_per_occurrence))
            .min(self.settings.max_weight)
    }

    fn subset_sentence(
        &self,
        run: &AnalysisRun,
        sentiment: Sentiment,
        keywords: &[KeywordCount],
        present: impl Fn(String) -> String,
        absent: &str,
    ) -> String {
        let has_subset = run.verdicts().iter().any(|v| v.sentiment() == Some(sentiment));
        if has_subset {
            present(or_none(keywords))
        } else {
            absent.to_string()
        }
    }
}

impl Default for SummaryEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Comma-joined keywords, or a placeholder when keywords were not collected.
fn or_none(keywords: &[KeywordCount]) -> String {
    if keywords.is_empty() {
        "(no keywords)".to_string()
    } else {
        keywords
            .iter()
            .map(|k| k.keyword.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
