pub mod provider;
pub mod openai;
pub mod prompts;
pub mod parser;

pub use provider::SentimentClassifier;
pub use openai::{ClientSettings, OpenAiClassifier};
pub use prompts::ClassifyOptions;
