use async_trait::async_trait;
use crate::llm::prompts::ClassifyOptions;
use crate::models::{SentimentVerdict, TextUnit};

/// Classifies a single unit. Implementations never fail: every problem is
/// reported as a failure verdict.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &TextUnit, options: ClassifyOptions) -> SentimentVerdict;
    fn name(&self) -> &str;
}
