use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::domain::case::CaseRecord;
use crate::error::{AppError, AppResult};
use crate::services::CaseStore;

const CASE_EXTENSION: &str = "json";

/// Reads mock cases from a directory of `<case-number>.json` files.
pub struct FileCaseStore {
    directory: PathBuf,
}

impl FileCaseStore {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    fn case_path(&self, identifier: &str) -> PathBuf {
        self.directory.join(format!("{identifier}.{CASE_EXTENSION}"))
    }
}

#[async_trait]
impl CaseStore for FileCaseStore {
    async fn load_case(&self, identifier: &str) -> AppResult<CaseRecord> {
        let path = self.case_path(identifier.trim());
        debug!(path = %path.display(), "loading case");

        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "Mock case not found: {}",
                    path.display()
                )));
            }
            Err(err) => return Err(AppError::Io(err)),
        };

        CaseRecord::from_json(&contents)
            .map_err(|err| AppError::Malformed(format!("{}: {err}", path.display())))
    }

    async fn list_case_ids(&self) -> AppResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(AppError::Io(err)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CASE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
