//! Gemini implementation of the LLM gateway port

use super::client::GeminiClient;
use super::session::GeminiSession;
use super::types::{Content, GenerateContentRequest, GenerationConfig};
use async_trait::async_trait;
use std::sync::Arc;
use swarm_application::{
    GatewayError, GenerationOptions, GenerationRequest, LlmGateway, LlmSession,
};
use swarm_domain::Model;
use tracing::info;

/// LLM gateway backed by the Gemini `generateContent` REST endpoint
pub struct GeminiGateway {
    client: Arc<GeminiClient>,
}

impl GeminiGateway {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = GeminiClient::new(api_key, base_url)?;
        info!("GeminiGateway initialized");
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Read the API key from the environment variable `api_key_env`.
    pub fn from_env(api_key_env: &str, base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GatewayError::ConnectionError(format!(
                    "environment variable {} is not set",
                    api_key_env
                ))
            })?;
        Self::new(api_key, base_url)
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn generate(
        &self,
        model: &Model,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        let mut config = GenerationConfig::from_options(options);
        if let Some(schema) = &request.schema {
            config = config.with_schema(schema.clone());
        }

        let body = GenerateContentRequest {
            contents: vec![Content::user(&request.prompt)],
            system_instruction: request.system.as_deref().map(Content::system),
            generation_config: config,
        };
        self.client.generate_content(model, &body).await
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GeminiSession::new(
            Arc::clone(&self.client),
            model.clone(),
            system_prompt,
            GenerationConfig::from_options(options),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response per connection and return the base URL
    /// plus a handle yielding the raw requests received.
    async fn serve(responses: Vec<(u16, String)>) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut raw = Vec::new();
                let mut buf = [0u8; 4096];
                // Read headers, then the declared body length
                loop {
                    let n = socket.read(&mut buf).await.unwrap();
                    raw.extend_from_slice(&buf[..n]);
                    let text = String::from_utf8_lossy(&raw).to_string();
                    if let Some(split) = text.find("\r\n\r\n") {
                        let length = text[..split]
                            .lines()
                            .find_map(|l| {
                                l.to_lowercase()
                                    .strip_prefix("content-length:")
                                    .map(|v| v.trim().parse::<usize>().unwrap())
                            })
                            .unwrap_or(0);
                        if raw.len() >= split + 4 + length {
                            break;
                        }
                    }
                    if n == 0 {
                        break;
                    }
                }
                requests.push(String::from_utf8_lossy(&raw).to_string());

                let response = format!(
                    "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            requests
        });

        (format!("http://{}", addr), handle)
    }

    fn answer(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_posts_schema_and_key() {
        let (base_url, server) = serve(vec![(200, answer("{\"ok\": true}"))]).await;
        let gateway = GeminiGateway::new("secret", base_url).unwrap();

        let request = GenerationRequest::new("plan this")
            .with_system("you plan")
            .with_schema(serde_json::json!({"type": "OBJECT"}));
        let text = gateway
            .generate(&Model::Gemini25Pro, &request, &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "{\"ok\": true}");

        let raw = server.await.unwrap().remove(0);
        assert!(raw.starts_with("POST /models/gemini-2.5-pro:generateContent"));
        assert!(raw.to_lowercase().contains("x-goog-api-key: secret"));
        assert!(raw.contains("\"responseMimeType\":\"application/json\""));
        assert!(raw.contains("\"systemInstruction\""));
    }

    #[tokio::test]
    async fn test_rate_limit_is_transient_http_error() {
        let body = r#"{"error": {"code": 429, "message": "slow down", "status": "RESOURCE_EXHAUSTED"}}"#;
        let (base_url, _server) = serve(vec![(429, body.to_string())]).await;
        let gateway = GeminiGateway::new("k", base_url).unwrap();

        let err = gateway
            .generate(
                &Model::default(),
                &GenerationRequest::new("q"),
                &GenerationOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_session_resends_history() {
        let (base_url, server) =
            serve(vec![(200, answer("first answer")), (200, answer("second answer"))]).await;
        let gateway = GeminiGateway::new("k", base_url).unwrap();

        let session = gateway
            .create_session_with_system_prompt(
                &Model::default(),
                "You are bound to Doc1.pdf",
                &GenerationOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(session.send("q1").await.unwrap(), "first answer");
        assert_eq!(session.send("q2").await.unwrap(), "second answer");

        let requests = server.await.unwrap();
        assert!(!requests[0].contains("first answer"));
        assert!(requests[1].contains("first answer"));
        assert!(requests[1].contains("q1"));
        assert!(requests[1].contains("You are bound to Doc1.pdf"));
    }
}
