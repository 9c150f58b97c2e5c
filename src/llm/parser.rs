use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::llm::prompts::{ClassifyOptions, MAX_KEYWORDS};
use crate::models::{Classification, Sentiment};

#[derive(Deserialize)]
struct RawSentiment {
    sentiment: String,
    confidence: f64,
    // Loosely typed: only inspected when the caller asked for them.
    #[serde(default)]
    keywords: Option<Value>,
    #[serde(default)]
    explanation: Option<Value>,
}

/// Parses the model's message content into a classification, dropping the
/// fields the caller did not ask for.
pub fn parse_sentiment_response(response: &str, options: ClassifyOptions) -> Result<Classification> {
    let json_str = extract_json(response)?;

    let raw: RawSentiment = serde_json::from_str(&json_str)
        .map_err(|e| Error::ParseError(format!("Failed to parse sentiment response: {}", e)))?;

    let sentiment = Sentiment::parse(&raw.sentiment)
        .ok_or_else(|| Error::ParseError(format!("Unknown sentiment '{}'", raw.sentiment)))?;

    if !raw.confidence.is_finite() {
        return Err(Error::ParseError("Confidence is not a finite number".to_string()));
    }

    let keywords = if options.include_keywords {
        keywords_from(raw.keywords)
    } else {
        Vec::new()
    };

    let explanation = match raw.explanation {
        Some(Value::String(text)) if options.include_explanations => text.trim().to_string(),
        _ => String::new(),
    };

    Ok(Classification {
        sentiment,
        confidence: raw.confidence.clamp(0.0, 1.0),
        keywords,
        explanation,
    })
}

/// Non-string items and anything other than an array are ignored.
fn keywords_from(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(k) => Some(k.trim().to_string()),
                _ => None,
            })
            .filter(|k| !k.is_empty())
            .take(MAX_KEYWORDS)
            .collect(),
        _ => Vec::new(),
    }
}

fn extract_json(text: &str) -> Result<String> {
    // Fenced ```json block
    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            return Ok(text[start..start + end].trim().to_string());
        }
    }

    // Plain fenced block
    if let Some(start) = text.find("```") {
        let start = start + 3;
        let start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[start..].find("```") {
            let content = text[start..start + end].trim();
            if content.starts_with('{') {
                return Ok(content.to_string());
            }
        }
    }

    // Raw object, possibly surrounded by prose
    if let Some(start) = text.find('{') {
        let mut depth = 0;
        let mut end = start;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, c) in text[start..].char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }

        if depth == 0 && end > start {
            return Ok(text[start..end].to_string());
        }
    }

    Err(Error::ParseError("No valid JSON found in response".to_string()))
}
