use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::{Error, Result};
use crate::llm::parser::parse_sentiment_response;
use crate::llm::prompts::{ClassifyOptions, SYSTEM_PROMPT};
use crate::llm::provider::SentimentClassifier;
use crate::models::{Classification, SentimentVerdict, TextUnit};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct OpenAiClassifier {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl OpenAiClassifier {
    pub fn new(api_key: String, settings: ClientSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            model: settings.model,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
        })
    }

    async fn request_classification(
        &self,
        text: &TextUnit,
        options: ClassifyOptions,
    ) -> Result<Classification> {
        tracing::debug!("Classifying {} chars with {}", text.as_str().len(), self.model);

        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.as_str().to_string(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| "Failed to analyze text".to_string());
            return Err(Error::LLMApi(format!("{} ({})", message, status)));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to parse OpenAI response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::LLMApi("Empty response from OpenAI".to_string()))?;

        parse_sentiment_response(&content, options)
    }
}

#[async_trait]
impl SentimentClassifier for OpenAiClassifier {
    async fn classify(&self, text: &TextUnit, options: ClassifyOptions) -> SentimentVerdict {
        match self.request_classification(text, options).await {
            Ok(classification) => SentimentVerdict::success(text.clone(), classification),
            Err(e) => {
                tracing::warn!("Sentiment analysis failed: {}", e);
                SentimentVerdict::failure(text.clone(), format!("Analysis failed: {}", e))
            }
        }
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sentiment, Verdict};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Reads one HTTP request off the socket (headers plus content-length body).
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    return;
                }
            }
        }
    }

    /// Serves a single canned response and returns the base URL to hit.
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    fn classifier(base_url: String, timeout: Duration) -> OpenAiClassifier {
        OpenAiClassifier::new(
            "test-key".to_string(),
            ClientSettings {
                model: "gpt-4".to_string(),
                base_url,
                timeout,
            },
        )
        .unwrap()
    }

    fn chat_body(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    fn unit(text: &str) -> TextUnit {
        TextUnit::new(text).unwrap()
    }

    #[tokio::test]
    async fn test_classify_success() {
        let content = r#"{"sentiment": "positive", "confidence": 0.88, "keywords": ["love", "fast"], "explanation": "Enthusiastic."}"#;
        let base_url = serve_once("200 OK", chat_body(content)).await;
        let client = classifier(base_url, Duration::from_secs(5));

        let verdict = client.classify(&unit("I love how fast it is"), ClassifyOptions::default()).await;

        assert_eq!(verdict.source_text.as_str(), "I love how fast it is");
        assert_eq!(verdict.sentiment(), Some(Sentiment::Positive));
        assert_eq!(verdict.confidence(), 0.88);
        assert_eq!(verdict.keywords(), &["love".to_string(), "fast".to_string()]);
        assert_eq!(verdict.explanation(), "Enthusiastic.");
    }

    #[tokio::test]
    async fn test_classify_malformed_content_is_failure() {
        let base_url = serve_once("200 OK", chat_body("I think it's positive")).await;
        let client = classifier(base_url, Duration::from_secs(5));

        let verdict = client.classify(&unit("meh"), ClassifyOptions::default()).await;

        assert!(verdict.is_failure());
        assert_eq!(verdict.sentiment_label(), "error");
        assert_eq!(verdict.confidence(), 0.0);
        assert!(verdict.explanation().starts_with("Analysis failed:"));
    }

    #[tokio::test]
    async fn test_classify_http_error_uses_api_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided"}}"#.to_string();
        let base_url = serve_once("401 Unauthorized", body).await;
        let client = classifier(base_url, Duration::from_secs(5));

        let verdict = client.classify(&unit("hello"), ClassifyOptions::default()).await;

        match verdict.outcome {
            Verdict::Failure { reason } => assert!(reason.contains("Incorrect API key provided")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_classify_timeout_is_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        let client = classifier(format!("http://{}", addr), Duration::from_millis(200));

        let verdict = client.classify(&unit("slow"), ClassifyOptions::default()).await;

        assert!(verdict.is_failure());
        assert_eq!(verdict.confidence(), 0.0);
        assert!(!verdict.explanation().is_empty());
    }

    #[tokio::test]
    async fn test_classify_connection_refused_is_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = classifier(format!("http://{}", addr), Duration::from_secs(2));

        let verdict = client.classify(&unit("offline"), ClassifyOptions::default()).await;

        assert!(verdict.is_failure());
        assert!(verdict.keywords().is_empty());
    }
}
