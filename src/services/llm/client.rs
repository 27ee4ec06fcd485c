use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::prompts;
use super::schema::{
    self, GatewayError, GatewayResult, ImplementationIntentionInput, ImplementationIntentionOutput,
    InterventionInput, InterventionOutput, UrgeSurfingInput, UrgeSurfingOutput, Validate,
};
use super::TextGenerator;
use crate::config::GatewayConfig;

/// HTTP gateway to a llama.cpp-style `/completion` endpoint.
#[derive(Clone)]
pub struct LlmGateway {
    client: Client,
    config: GatewayConfig,
}

#[derive(Serialize)]
struct CompletionRequest {
    prompt: String,
    stream: bool,
    n_predict: usize,
    temperature: f32,
    stop: Vec<String>,
    json_schema: Value,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LlmGateway {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// One validated round trip: check input, send, check output.
    async fn generate<I, O>(&self, operation: &str, input: &I, prompt: String, json_schema: Value) -> GatewayResult<O>
    where
        I: Validate,
        O: for<'de> Deserialize<'de> + Validate,
    {
        input.validate().map_err(GatewayError::InvalidInput)?;

        let request_body = CompletionRequest {
            prompt,
            stream: false,
            n_predict: self.config.n_predict,
            temperature: self.config.temperature,
            stop: vec!["User:".to_string(), "System:".to_string()],
            json_schema,
        };

        debug!("{}: sending completion request to {}", operation, self.config.base_url);
        let response = self
            .client
            .post(format!("{}/completion", self.config.base_url))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("{}: backend answered {}", operation, response.status());
            return Err(GatewayError::Status(response.status()));
        }

        let resp_json: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidOutput(e.to_string()))?;

        schema::parse_output(&resp_json.content)
    }
}

#[async_trait]
impl TextGenerator for LlmGateway {
    async fn suggest_intervention(&self, input: &InterventionInput) -> GatewayResult<InterventionOutput> {
        self.generate(
            "intervention",
            input,
            prompts::intervention_prompt(input),
            schema::intervention_schema(),
        )
        .await
    }

    async fn implementation_intention(
        &self,
        input: &ImplementationIntentionInput,
    ) -> GatewayResult<ImplementationIntentionOutput> {
        self.generate(
            "implementation_intention",
            input,
            prompts::implementation_intention_prompt(input),
            schema::implementation_intention_schema(),
        )
        .await
    }

    async fn urge_surfing_script(&self, input: &UrgeSurfingInput) -> GatewayResult<UrgeSurfingOutput> {
        self.generate(
            "urge_surfing",
            input,
            prompts::urge_surfing_prompt(input),
            schema::urge_surfing_schema(),
        )
        .await
    }
}
