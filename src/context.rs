use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{CaseStore, LanguageModelService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub case_store: Arc<dyn CaseStore>,
    pub language_model: Arc<dyn LanguageModelService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        case_store: Arc<dyn CaseStore>,
        language_model: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self {
            config,
            case_store,
            language_model,
        }
    }
}
