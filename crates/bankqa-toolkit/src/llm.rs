use async_trait::async_trait;

use crate::errors::ToolkitError;

/// Text completion model supplied by the host application.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, ToolkitError>;
}
