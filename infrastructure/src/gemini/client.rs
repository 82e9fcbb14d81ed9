//! HTTP client for the `generateContent` endpoint

use super::types::{GenerateContentRequest, GenerateContentResponse, parse_http_error};
use std::time::Duration;
use swarm_application::GatewayError;
use swarm_domain::Model;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, model: &Model) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model.as_str())
    }

    pub async fn generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<String, GatewayError> {
        debug!(
            model = %model,
            contents = request.contents.len(),
            "Calling generateContent"
        );

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_transport_error)?;
        if !(200..300).contains(&status) {
            return Err(parse_http_error(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::RequestFailed(format!("malformed response: {}", e)))?;
        parsed.into_text()
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}
