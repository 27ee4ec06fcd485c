pub mod client;
pub mod prompts;
pub mod schema;

use async_trait::async_trait;

use schema::{
    GatewayResult, ImplementationIntentionInput, ImplementationIntentionOutput, InterventionInput,
    InterventionOutput, UrgeSurfingInput, UrgeSurfingOutput,
};

pub use client::LlmGateway;

/// The generative backend as the rest of the crate sees it.
/// Each call validates its input and output; any failure is a `GatewayError`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn suggest_intervention(&self, input: &InterventionInput) -> GatewayResult<InterventionOutput>;

    async fn implementation_intention(
        &self,
        input: &ImplementationIntentionInput,
    ) -> GatewayResult<ImplementationIntentionOutput>;

    async fn urge_surfing_script(&self, input: &UrgeSurfingInput) -> GatewayResult<UrgeSurfingOutput>;
}
