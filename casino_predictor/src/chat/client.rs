//! Ollama completion client.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::{ChatError, ChatResult};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma3:4b";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const CONNECTION_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
const MAX_PREDICTED_TOKENS: u32 = 400;

/// Outcome of a connectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub available: bool,
    pub message: String,
}

/// A text-completion backend: prompt in, text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> ChatResult<String>;

    async fn check_connection(&self) -> ConnectionStatus;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Server root, without a trailing `/api/...` path.
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: ChatConfig,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl CompletionService for OllamaClient {
    async fn complete(&self, prompt: &str) -> ChatResult<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                num_predict: MAX_PREDICTED_TOKENS,
            },
        };

        debug!("Sending {} byte prompt to {}", prompt.len(), self.config.model);
        let response = self
            .client
            .post(self.endpoint("/api/generate"))
            .timeout(self.config.request_timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response.trim().to_string())
    }

    async fn check_connection(&self) -> ConnectionStatus {
        let model = &self.config.model;
        let response = self
            .client
            .get(self.endpoint("/api/tags"))
            .timeout(CONNECTION_CHECK_TIMEOUT)
            .send()
            .await;

        let status = |available: bool, message: String| ConnectionStatus { available, message };

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(_) => {
                return status(
                    false,
                    "Ollama is running but not responding correctly".to_string(),
                );
            }
            Err(_) => return status(false, "Ollama is not running. Run: ollama serve".to_string()),
        };

        match response.json::<TagsResponse>().await {
            Ok(tags) if tags.models.iter().any(|m| &m.name == model) => {
                status(true, format!("Model {model} is ready"))
            }
            Ok(_) => status(
                false,
                format!("Model {model} not found. Download it with: ollama pull {model}"),
            ),
            Err(_) => status(
                false,
                "Ollama is running but not responding correctly".to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    /// Reads one HTTP request (headers plus content-length body).
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Serves a single canned response and returns the base url.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    fn client(base_url: String, timeout: Duration) -> OllamaClient {
        OllamaClient::new(ChatConfig {
            base_url,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: timeout,
        })
    }

    #[tokio::test]
    async fn test_complete_trims_response() {
        let url = serve_once("200 OK", r#"{"response":"  The house always wins.  "}"#).await;
        let answer = client(url, Duration::from_secs(5)).complete("hi").await.unwrap();
        assert_eq!(answer, "The house always wins.");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(format!("http://{addr}"), Duration::from_secs(5));
        assert_eq!(client.complete("hi").await, Err(ChatError::Connection));
        let status = client.check_connection().await;
        assert!(!status.available);
        assert!(status.message.contains("not running"));
    }

    #[tokio::test]
    async fn test_timeout_is_distinct_from_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_request(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let client = client(format!("http://{addr}"), Duration::from_millis(200));
        assert_eq!(client.complete("hi").await, Err(ChatError::Timeout));
    }

    #[tokio::test]
    async fn test_error_status() {
        let url = serve_once("500 Internal Server Error", "{}").await;
        let result = client(url, Duration::from_secs(5)).complete("hi").await;
        assert_eq!(result, Err(ChatError::Status(500)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_unexpected() {
        let url = serve_once("200 OK", r#"{"text":"nope"}"#).await;
        let result = client(url, Duration::from_secs(5)).complete("hi").await;
        assert!(matches!(result, Err(ChatError::Unexpected(_))));
    }

    #[tokio::test]
    async fn test_check_connection_model_ready() {
        let url = serve_once("200 OK", r#"{"models":[{"name":"gemma3:4b"}]}"#).await;
        let status = client(url, Duration::from_secs(5)).check_connection().await;
        assert!(status.available);
        assert_eq!(status.message, "Model gemma3:4b is ready");
    }

    #[tokio::test]
    async fn test_check_connection_model_missing() {
        let url = serve_once("200 OK", r#"{"models":[{"name":"llama3:8b"}]}"#).await;
        let status = client(url, Duration::from_secs(5)).check_connection().await;
        assert!(!status.available);
        assert!(status.message.contains("ollama pull gemma3:4b"));
    }
}
