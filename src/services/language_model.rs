use std::time::Duration;

use async_trait::async_trait;

use crate::error::ModelError;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Send `prompt` to the model and return its raw, untrusted text.
    async fn generate(&self, prompt: &str, timeout: Duration) -> Result<String, ModelError>;
}
