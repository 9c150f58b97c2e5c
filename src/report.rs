use serde::Serialize;

use crate::error::Result;
use crate::models::{
    AnalysisRun, ConfidenceHistogram, RunStats, RunSummary, Sentiment, SentimentVerdict,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown format '{}' (expected text, markdown, json or csv)", other)),
        }
    }
}

pub fn render(format: OutputFormat, run: &AnalysisRun, summary: &RunSummary) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(run, summary)),
        OutputFormat::Markdown => Ok(format_markdown(run, summary)),
        OutputFormat::Json => to_json(run, summary),
        OutputFormat::Csv => to_csv(run),
    }
}

/// Flat per-verdict record used by the JSON and CSV exports.
#[derive(Serialize)]
struct ExportRow<'a> {
    text: &'a str,
    sentiment: &'static str,
    confidence: f64,
    keywords: &'a [String],
    explanation: &'a str,
}

impl<'a> From<&'a SentimentVerdict> for ExportRow<'a> {
    fn from(verdict: &'a SentimentVerdict) -> Self {
        Self {
            text: verdict.source_text.as_str(),
            sentiment: verdict.sentiment_label(),
            confidence: verdict.confidence(),
            keywords: verdict.keywords(),
            explanation: verdict.explanation(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    timestamp: String,
    total_texts: usize,
    cancelled: bool,
    stats: &'a RunStats,
    results: Vec<ExportRow<'a>>,
}

pub fn to_json(run: &AnalysisRun, summary: &RunSummary) -> Result<String> {
    let export = JsonExport {
        timestamp: run.started_at.to_rfc3339(),
        total_texts: run.len(),
        cancelled: summary.cancelled,
        stats: &summary.stats,
        results: run.verdicts().iter().map(ExportRow::from).collect(),
    };

    Ok(serde_json::to_string_pretty(&export)?)
}

pub fn to_csv(run: &AnalysisRun) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Text", "Sentiment", "Confidence", "Keywords", "Explanation"])?;

    for verdict in run.verdicts() {
        let confidence = verdict.confidence().to_string();
        let keywords = verdict.keywords().join(", ");
        writer.write_record([
            verdict.source_text.as_str(),
            verdict.sentiment_label(),
            confidence.as_str(),
            keywords.as_str(),
            verdict.explanation(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn percent(value: f64) -> u32 {
    (value * 100.0).round() as u32
}

pub fn format_text(run: &AnalysisRun, summary: &RunSummary) -> String {
    let stats = &summary.stats;
    let mut output = String::new();

    output.push_str("\n=== Sentiment Analysis ===\n\n");
    if summary.cancelled {
        output.push_str("(run cancelled before all texts were analyzed)\n\n");
    }

    output.push_str(&format!("Texts analyzed: {}\n", stats.counts.total));
    output.push_str(&format!(
        "Average confidence: {}%\n",
        percent(stats.average_confidence)
    ));
    output.push_str(&format!("Dominant sentiment: {}\n", stats.dominant_label()));
    if stats.counts.errors > 0 {
        output.push_str(&format!("Failed analyses: {}\n", stats.counts.errors));
    }

    output.push_str("\nBreakdown:\n");
    for sentiment in Sentiment::ALL {
        output.push_str(&format!(
            "  {:<9} {:>4} ({}%)\n",
            sentiment.to_string(),
            stats.counts.get(sentiment),
            stats.percentages.get(sentiment)
        ));
    }

    output.push_str("\nConfidence distribution:\n");
    for (i, count) in stats.histogram.bins.iter().enumerate() {
        output.push_str(&format!(
            "  {:>8} {}\n",
            ConfidenceHistogram::label(i),
            "#".repeat(*count as usize)
        ));
    }

    output.push_str("\nResults:\n");
    for verdict in run.verdicts() {
        output.push_str(&format!(
            "  [{}] {}% {}\n",
            capitalize(verdict.sentiment_label()),
            percent(verdict.confidence()),
            verdict.source_text
        ));
        if !verdict.explanation().is_empty() {
            output.push_str(&format!("      {}\n", verdict.explanation()));
        }
        if !verdict.keywords().is_empty() {
            output.push_str(&format!("      keywords: {}\n", verdict.keywords().join(", ")));
        }
    }

    if !summary.insights.is_empty() {
        output.push_str("\nInsights:\n");
        for insight in &summary.insights {
            output.push_str(&format!("  + {}: {}\n", insight.title, insight.text));
        }
    }

    if !summary.recommendations.is_empty() {
        output.push_str("\nRecommendations:\n");
        for rec in &summary.recommendations {
            output.push_str(&format!("  - {}: {}\n", rec.title, rec.text));
        }
    }

    let top = summary.word_frequency(10);
    if !top.is_empty() {
        output.push_str("\nTop keywords:\n");
        for word in top {
            output.push_str(&format!("  {:<20} {}\n", word.keyword, word.count));
        }
    }

    output
}

pub fn format_markdown(run: &AnalysisRun, summary: &RunSummary) -> String {
    let stats = &summary.stats;
    let mut output = String::new();

    output.push_str("# Sentiment Analysis\n\n");
    if summary.cancelled {
        output.push_str("> Run cancelled before all texts were analyzed.\n\n");
    }

    output.push_str("## Summary\n\n");
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Texts Analyzed | {} |\n", stats.counts.total));
    output.push_str(&format!(
        "| Average Confidence | {}% |\n",
        percent(stats.average_confidence)
    ));
    output.push_str(&format!("| Dominant Sentiment | {} |\n", stats.dominant_label()));
    for sentiment in Sentiment::ALL {
        output.push_str(&format!(
            "| {} | {} ({}%) |\n",
            sentiment,
            stats.counts.get(sentiment),
            stats.percentages.get(sentiment)
        ));
    }
    if stats.counts.errors > 0 {
        output.push_str(&format!("| Errors | {} |\n", stats.counts.errors));
    }

    output.push_str("\n## Confidence Distribution\n\n");
    output.push_str("| Range | Texts |\n|-------|-------|\n");
    for (i, count) in stats.histogram.bins.iter().enumerate() {
        output.push_str(&format!("| {} | {} |\n", ConfidenceHistogram::label(i), count));
    }

    output.push_str("\n## Results\n\n");
    output.push_str("| Text | Sentiment | Confidence | Keywords | Explanation |\n");
    output.push_str("|------|-----------|------------|----------|-------------|\n");
    for verdict in run.verdicts() {
        output.push_str(&format!(
            "| {} | {} | {}% | {} | {} |\n",
            escape_cell(verdict.source_text.as_str()),
            capitalize(verdict.sentiment_label()),
            percent(verdict.confidence()),
            escape_cell(&verdict.keywords().join(", ")),
            escape_cell(verdict.explanation())
        ));
    }

    if !summary.insights.is_empty() {
        output.push_str("\n## Insights\n\n");
        for insight in &summary.insights {
            output.push_str(&format!("- **{}**: {}\n", insight.title, insight.text));
        }
    }

    if !summary.recommendations.is_empty() {
        output.push_str("\n## Recommendations\n\n");
        for rec in &summary.recommendations {
            output.push_str(&format!("- **{}**: {}\n", rec.title, rec.text));
        }
    }

    if !summary.word_cloud.is_empty() {
        output.push_str("\n## Keywords\n\n");
        let words: Vec<_> = summary
            .word_cloud
            .iter()
            .map(|w| format!("{} ({})", w.keyword, w.count))
            .collect();
        output.push_str(&words.join(", "));
        output.push('\n');
    }

    output.push_str(&format!(
        "\n---\n*Analysis started {}*\n",
        run.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
