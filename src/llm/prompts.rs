pub const SYSTEM_PROMPT: &str = r#"You are an AI trained to perform sentiment analysis. Analyze the sentiment of the user's text and respond in JSON format with the following structure:
{
    "sentiment": "positive" | "negative" | "neutral",
    "confidence": float between 0 and 1,
    "keywords": [array of 3-5 keywords that influenced the sentiment],
    "explanation": "brief explanation of why this sentiment was chosen"
}

Respond with the JSON object only."#;

/// Upper bound on keywords kept per verdict.
pub const MAX_KEYWORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
    pub include_keywords: bool,
    pub include_explanations: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            include_keywords: true,
            include_explanations: true,
        }
    }
}
