use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::generation::{GenerationRequest, SamplingOptions};
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

/// Per-call timeouts for the Ollama endpoints.
#[derive(Debug, Clone, Copy)]
pub struct OllamaTimeouts {
    pub generate: Duration,
    pub health: Duration,
    pub list_models: Duration,
}

impl Default for OllamaTimeouts {
    fn default() -> Self {
        Self {
            generate: Duration::from_secs(300),
            health: Duration::from_secs(3),
            list_models: Duration::from_secs(5),
        }
    }
}

pub struct OllamaClient {
    http: Client,
    base_url: String,
    timeouts: OllamaTimeouts,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, timeouts: OllamaTimeouts) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            timeouts,
        }
    }

    fn generate_endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }

    fn tags_endpoint(&self) -> String {
        format!("{}/api/tags", self.base_url.trim_end_matches('/'))
    }

    async fn fetch_tags(&self) -> Result<TagsResponse, reqwest::Error> {
        self.http
            .get(self.tags_endpoint())
            .timeout(self.timeouts.list_models)
            .send()
            .await?
            .error_for_status()?
            .json::<TagsResponse>()
            .await
    }
}

#[async_trait]
impl LanguageModelService for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        request.options.check().map_err(AppError::Configuration)?;

        let body = OllamaGenerateRequest::new(request);
        debug!(
            model = %request.model,
            prompt_bytes = request.prompt.len(),
            "sending generate request"
        );

        let response = self
            .http
            .post(self.generate_endpoint())
            .json(&body)
            .timeout(self.timeouts.generate)
            .send()
            .await
            .map_err(|err| {
                AppError::ServiceUnavailable(format!(
                    "failed to reach Ollama at {}: {err}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::UpstreamError(format!(
                "Ollama responded with {status}: {body}"
            )));
        }

        let payload: OllamaGenerateResponse = response.json().await.map_err(|err| {
            AppError::UpstreamError(format!("failed to parse Ollama response: {err}"))
        })?;

        debug!(
            eval_count = payload.eval_count,
            total_duration_ns = payload.total_duration,
            "generation finished"
        );

        Ok(payload.response.trim().to_string())
    }

    async fn is_up(&self) -> bool {
        match self
            .http
            .get(self.tags_endpoint())
            .timeout(self.timeouts.health)
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::OK,
            Err(err) => {
                debug!("Ollama health check failed: {err}");
                false
            }
        }
    }

    async fn list_models(&self) -> Vec<String> {
        match self.fetch_tags().await {
            Ok(tags) => {
                let mut names = tags
                    .models
                    .into_iter()
                    .filter_map(|model| model.name)
                    .filter(|name| !name.is_empty())
                    .collect::<Vec<_>>();
                names.sort();
                names.dedup();
                names
            }
            Err(err) => {
                warn!("could not list Ollama models: {err}");
                Vec::new()
            }
        }
    }
}

#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

impl<'a> OllamaGenerateRequest<'a> {
    fn new(request: &'a GenerationRequest) -> Self {
        Self {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: OllamaOptions::from(request.options),
        }
    }
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
    top_p: f64,
    num_predict: u32,
}

impl From<SamplingOptions> for OllamaOptions {
    fn from(options: SamplingOptions) -> Self {
        Self {
            temperature: options.temperature,
            top_p: options.top_p,
            num_predict: options.num_predict,
        }
    }
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[serde(default)]
    total_duration: u64,
    #[serde(default)]
    eval_count: u64,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelDescriptor>,
}

#[derive(Deserialize)]
struct ModelDescriptor {
    #[serde(default)]
    name: Option<String>,
}
