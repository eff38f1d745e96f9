use async_trait::async_trait;

use crate::domain::generation::GenerationRequest;
use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Runs one non-streamed completion and returns the trimmed text.
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
    /// Cheap reachability check; never fails.
    async fn is_up(&self) -> bool;
    /// Installed model names, or an empty list when they cannot be fetched.
    async fn list_models(&self) -> Vec<String>;
}
