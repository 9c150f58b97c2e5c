use serde::{Deserialize, Serialize};

/// One non-blank piece of text submitted for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextUnit(String);

impl TextUnit {
    /// Returns `None` when the text is blank. Surrounding whitespace is dropped.
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TextUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Negative => write!(f, "Negative"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub sentiment: Sentiment,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub keywords: Vec<String>,
    pub explanation: String,
}

/// Outcome of classifying one unit. Failed calls are carried as data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    Success(Classification),
    Failure { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub source_text: TextUnit,
    pub outcome: Verdict,
}

impl SentimentVerdict {
    pub fn success(source_text: TextUnit, classification: Classification) -> Self {
        Self {
            source_text,
            outcome: Verdict::Success(classification),
        }
    }

    pub fn failure(source_text: TextUnit, reason: impl Into<String>) -> Self {
        Self {
            source_text,
            outcome: Verdict::Failure {
                reason: reason.into(),
            },
        }
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        match &self.outcome {
            Verdict::Success(c) => Some(c.sentiment),
            Verdict::Failure { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Verdict::Failure { .. })
    }

    /// `"positive"`, `"neutral"`, `"negative"` or `"error"`.
    pub fn sentiment_label(&self) -> &'static str {
        self.sentiment().map(|s| s.as_str()).unwrap_or("error")
    }

    pub fn confidence(&self) -> f64 {
        match &self.outcome {
            Verdict::Success(c) => c.confidence,
            Verdict::Failure { .. } => 0.0,
        }
    }

    pub fn keywords(&self) -> &[String] {
        match &self.outcome {
            Verdict::Success(c) => &c.keywords,
            Verdict::Failure { .. } => &[],
        }
    }

    /// The model's explanation, or the failure reason.
    pub fn explanation(&self) -> &str {
        match &self.outcome {
            Verdict::Success(c) => &c.explanation,
            Verdict::Failure { reason } => reason,
        }
    }
}
