use async_trait::async_trait;

use crate::domain::case::CaseRecord;
use crate::error::AppResult;

#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Loads the case whose file name matches `identifier` (surrounding
    /// whitespace ignored).
    async fn load_case(&self, identifier: &str) -> AppResult<CaseRecord>;
    /// Sorted identifiers of every stored case.
    async fn list_case_ids(&self) -> AppResult<Vec<String>>;
}
