use std::collections::HashMap;

use crate::models::{
    AnalysisRun, ConfidenceHistogram, KeywordCount, RunStats, Sentiment, SentimentCounts,
    SentimentPercentages, SentimentVerdict, HISTOGRAM_BINS,
};

/// Failure verdicts count toward `total` and `errors` only.
pub fn sentiment_counts(verdicts: &[SentimentVerdict]) -> SentimentCounts {
    let mut counts = SentimentCounts::default();

    for verdict in verdicts {
        match verdict.sentiment() {
            Some(Sentiment::Positive) => counts.positive += 1,
            Some(Sentiment::Neutral) => counts.neutral += 1,
            Some(Sentiment::Negative) => counts.negative += 1,
            None => counts.errors += 1,
        }
        counts.total += 1;
    }

    counts
}

pub fn percentages(counts: &SentimentCounts) -> SentimentPercentages {
    SentimentPercentages {
        positive: percent_of(counts.positive, counts.total),
        neutral: percent_of(counts.neutral, counts.total),
        negative: percent_of(counts.negative, counts.total),
    }
}

/// `count / total * 100`, rounded half up; 0 when `total` is 0.
pub fn percent_of(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

pub fn average_confidence(verdicts: &[SentimentVerdict]) -> f64 {
    if verdicts.is_empty() {
        return 0.0;
    }

    verdicts.iter().map(|v| v.confidence()).sum::<f64>() / verdicts.len() as f64
}

/// Ties go to positive, then neutral.
pub fn dominant_sentiment(counts: &SentimentCounts) -> Option<Sentiment> {
    if counts.total == 0 {
        return None;
    }

    let (pos, neu, neg) = (counts.positive, counts.neutral, counts.negative);
    if pos >= neu && pos >= neg {
        Some(Sentiment::Positive)
    } else if neu >= neg {
        Some(Sentiment::Neutral)
    } else {
        Some(Sentiment::Negative)
    }
}

/// Ten equal-width bins over 0-100%. Exactly 100% lands in the last bin;
/// failures sit at 0%.
pub fn confidence_histogram(verdicts: &[SentimentVerdict]) -> ConfidenceHistogram {
    let mut histogram = ConfidenceHistogram::default();
    let bin_width = ConfidenceHistogram::bin_width() as f64;

    for verdict in verdicts {
        let percent = (verdict.confidence() * 100.0).clamp(0.0, 100.0);
        let index = ((percent / bin_width).floor() as usize).min(HISTOGRAM_BINS - 1);
        histogram.bins[index] += 1;
    }

    histogram
}

/// Case-insensitive keyword counts, most frequent first. Equal counts keep
/// first-seen order.
pub fn keyword_frequency<'a, I>(verdicts: I, top_n: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a SentimentVerdict>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ranked: Vec<KeywordCount> = Vec::new();

    for verdict in verdicts {
        for keyword in verdict.keywords() {
            let normalized = keyword.to_lowercase();
            match index.get(&normalized) {
                Some(&i) => ranked[i].count += 1,
                None => {
                    index.insert(normalized.clone(), ranked.len());
                    ranked.push(KeywordCount {
                        keyword: normalized,
                        count: 1,
                    });
                }
            }
        }
    }

    // stable sort keeps insertion order among ties
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}

pub fn keywords_for_sentiment(
    run: &AnalysisRun,
    sentiment: Sentiment,
    top_n: usize,
) -> Vec<KeywordCount> {
    keyword_frequency(
        run.verdicts()
            .iter()
            .filter(|v| v.sentiment() == Some(sentiment)),
        top_n,
    )
}

impl RunStats {
    pub fn compute(run: &AnalysisRun) -> Self {
        let verdicts = run.verdicts();
        let counts = sentiment_counts(verdicts);

        Self {
            counts,
            percentages: percentages(&counts),
            average_confidence: average_confidence(verdicts),
            dominant: dominant_sentiment(&counts),
            histogram: confidence_histogram(verdicts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, TextUnit};

    fn verdict(sentiment: Sentiment, confidence: f64, keywords: &[&str]) -> SentimentVerdict {
        SentimentVerdict::success(
            TextUnit::new("sample").unwrap(),
            Classification {
                sentiment,
                confidence,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                explanation: String::new(),
            },
        )
    }

    fn failure() -> SentimentVerdict {
        SentimentVerdict::failure(TextUnit::new("sample").unwrap(), "Analysis failed: timeout")
    }

    fn counts(positive: u32, neutral: u32, negative: u32) -> SentimentCounts {
        SentimentCounts {
            positive,
            neutral,
            negative,
            errors: 0,
            total: positive + neutral + negative,
        }
    }

    #[test]
    fn test_counts_partition_total() {
        let run: AnalysisRun = vec![
            verdict(Sentiment::Positive, 0.9, &[]),
            verdict(Sentiment::Negative, 0.8, &[]),
            failure(),
            verdict(Sentiment::Neutral, 0.4, &[]),
            verdict(Sentiment::Positive, 0.7, &[]),
        ]
        .into_iter()
        .collect();

        let c = sentiment_counts(run.verdicts());
        assert_eq!((c.positive, c.neutral, c.negative, c.errors), (2, 1, 1, 1));
        assert_eq!(c.positive + c.neutral + c.negative + c.errors, c.total);
        assert_eq!(c.total, 5);
    }

    #[test]
    fn test_percentages_use_submitted_total() {
        let mut c = counts(1, 1, 1);
        let p = percentages(&c);
        assert_eq!((p.positive, p.neutral, p.negative), (33, 33, 33));

        c.errors = 1;
        c.total = 4;
        let p = percentages(&c);
        assert_eq!((p.positive, p.neutral, p.negative), (25, 25, 25));

        assert_eq!(percent_of(1, 8), 13);
        assert_eq!(percent_of(2, 3), 67);
    }

    #[test]
    fn test_percentages_sum_close_to_hundred() {
        for (pos, neu, neg) in [(1, 1, 1), (2, 2, 3), (5, 0, 1), (7, 3, 1), (1, 1, 4)] {
            let p = percentages(&counts(pos, neu, neg));
            let sum = p.positive + p.neutral + p.negative;
            assert!((98..=102).contains(&sum), "sum {} for {:?}", sum, (pos, neu, neg));
        }
    }

    #[test]
    fn test_dominant_sentiment_tie_breaks() {
        assert_eq!(dominant_sentiment(&counts(2, 2, 0)), Some(Sentiment::Positive));
        assert_eq!(dominant_sentiment(&counts(0, 2, 2)), Some(Sentiment::Neutral));
        assert_eq!(dominant_sentiment(&counts(2, 0, 2)), Some(Sentiment::Positive));
        assert_eq!(dominant_sentiment(&counts(0, 1, 3)), Some(Sentiment::Negative));
        assert_eq!(dominant_sentiment(&SentimentCounts::default()), None);
    }

    #[test]
    fn test_dominant_sentiment_all_failures() {
        let run: AnalysisRun = vec![failure(), failure()].into_iter().collect();
        // every category ties at zero
        assert_eq!(RunStats::compute(&run).dominant, Some(Sentiment::Positive));
    }

    #[test]
    fn test_histogram_one_per_bin() {
        let verdicts: Vec<_> = (0..10)
            .map(|i| verdict(Sentiment::Neutral, (i as f64 * 10.0 + 5.0) / 100.0, &[]))
            .collect();

        let histogram = confidence_histogram(&verdicts);
        assert_eq!(histogram.bins, [1; HISTOGRAM_BINS]);
    }

    #[test]
    fn test_histogram_full_confidence_in_last_bin() {
        let verdicts = vec![verdict(Sentiment::Positive, 1.0, &[]), failure()];
        let histogram = confidence_histogram(&verdicts);
        assert_eq!(histogram.bins[9], 1);
        assert_eq!(histogram.bins[0], 1);
        assert_eq!(histogram.bins.iter().sum::<u32>(), 2);
        assert_eq!(ConfidenceHistogram::label(9), "90-100%");
        assert_eq!(ConfidenceHistogram::label(0), "0-10%");
    }

    #[test]
    fn test_keyword_frequency_case_insensitive_first_seen() {
        let verdicts = vec![
            verdict(Sentiment::Positive, 0.9, &["a", "B"]),
            verdict(Sentiment::Positive, 0.9, &["a"]),
            verdict(Sentiment::Negative, 0.9, &["c"]),
        ];

        let top = keyword_frequency(&verdicts, 2);
        let words: Vec<_> = top.iter().map(|k| k.keyword.as_str()).collect();
        let counts: Vec<_> = top.iter().map(|k| k.count).collect();
        assert_eq!(words, vec!["a", "b"]);
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn test_keyword_frequency_ties_keep_first_occurrence() {
        let verdicts = vec![
            verdict(Sentiment::Neutral, 0.5, &["zeta", "alpha"]),
            verdict(Sentiment::Neutral, 0.5, &["Alpha", "Zeta", "mid"]),
        ];

        let top = keyword_frequency(&verdicts, 10);
        let words: Vec<_> = top.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(words, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_keywords_for_sentiment_filters_subset() {
        let run: AnalysisRun = vec![
            verdict(Sentiment::Positive, 0.9, &["price"]),
            verdict(Sentiment::Negative, 0.9, &["delivery", "support"]),
            verdict(Sentiment::Negative, 0.9, &["Delivery"]),
            failure(),
        ]
        .into_iter()
        .collect();

        let top = keywords_for_sentiment(&run, Sentiment::Negative, 3);
        assert_eq!(top[0], KeywordCount { keyword: "delivery".to_string(), count: 2 });
        assert_eq!(top.len(), 2);
        assert!(keywords_for_sentiment(&run, Sentiment::Neutral, 3).is_empty());
    }

    #[test]
    fn test_average_confidence_counts_failures_as_zero() {
        let verdicts = vec![
            verdict(Sentiment::Positive, 0.9, &[]),
            verdict(Sentiment::Negative, 0.5, &[]),
            failure(),
            failure(),
        ];
        assert!((average_confidence(&verdicts) - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_empty_run_degrades_to_zero() {
        let stats = RunStats::compute(&AnalysisRun::new());
        assert_eq!(stats.counts, SentimentCounts::default());
        assert_eq!(stats.percentages, SentimentPercentages::default());
        assert_eq!(stats.average_confidence, 0.0);
        assert_eq!(stats.dominant, None);
        assert_eq!(stats.dominant_label(), "-");
        assert_eq!(stats.histogram.bins, [0; HISTOGRAM_BINS]);
        assert!(keyword_frequency(AnalysisRun::new().verdicts(), 5).is_empty());
    }
}
