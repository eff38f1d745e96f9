use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::case::CaseRecord;
use crate::domain::generation::{GenerationRequest, GenerationResult};
use crate::domain::prompt::{PromptPreset, build_prompt};
use crate::error::AppResult;
use crate::workflow::interpret::interpret;

/// Everything produced by one generation cycle, kept for display.
#[derive(Debug, Clone)]
pub struct CopilotOutcome {
    pub case: CaseRecord,
    pub prompt: String,
    pub raw: String,
    pub result: GenerationResult,
}

/// Loads a case, prompts the model once and interprets the reply according
/// to the preset: structured presets must yield JSON, free text is kept as is.
pub async fn run_case(
    ctx: &AppContext,
    case_id: &str,
    preset: PromptPreset,
    model: &str,
) -> AppResult<CopilotOutcome> {
    let case = ctx.case_store.load_case(case_id).await?;
    let prompt = build_prompt(preset.instruction(), &case);

    let request = GenerationRequest {
        model: model.to_string(),
        prompt: prompt.clone(),
        options: ctx.config.sampling,
    };
    info!(case = case_id.trim(), model, "generating case output");
    let raw = ctx.language_model.generate(&request).await?;
    debug!(chars = raw.len(), "model replied");

    let result = match preset {
        PromptPreset::Structured => GenerationResult::Structured(interpret(&raw)?),
        PromptPreset::FreeText => GenerationResult::Text(raw.clone()),
    };

    Ok(CopilotOutcome {
        case,
        prompt,
        raw,
        result,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{AppConfig, ConfigOverrides, StoredConfig};
    use crate::error::AppError;
    use crate::services::{CaseStore, LanguageModelService};

    pub(crate) struct MemoryCaseStore {
        pub cases: HashMap<String, CaseRecord>,
    }

    #[async_trait]
    impl CaseStore for MemoryCaseStore {
        async fn load_case(&self, identifier: &str) -> AppResult<CaseRecord> {
            self.cases
                .get(identifier.trim())
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Mock case not found: {identifier}")))
        }

        async fn list_case_ids(&self) -> AppResult<Vec<String>> {
            let mut ids = self.cases.keys().cloned().collect::<Vec<_>>();
            ids.sort();
            Ok(ids)
        }
    }

    pub(crate) struct ScriptedModel {
        pub reply: String,
        pub up: bool,
        pub models: Vec<String>,
        pub requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedModel {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                up: true,
                models: Vec::new(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModelService for ScriptedModel {
        async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }

        async fn is_up(&self) -> bool {
            self.up
        }

        async fn list_models(&self) -> Vec<String> {
            self.models.clone()
        }
    }

    pub(crate) fn context_with(model: Arc<ScriptedModel>) -> AppContext {
        let mut cases = HashMap::new();
        cases.insert(
            "DEMO1".to_string(),
            CaseRecord {
                short_description: Some("VPN down".to_string()),
                ..CaseRecord::default()
            },
        );
        let config = AppConfig::resolve(
            Path::new("/tmp"),
            StoredConfig::default(),
            |_| None,
            &ConfigOverrides::default(),
        )
        .unwrap();
        AppContext::new(config, Arc::new(MemoryCaseStore { cases }), model)
    }

    #[tokio::test]
    async fn structured_preset_parses_reply() {
        let model = Arc::new(ScriptedModel::replying(
            "Here you go:\n{\"summary\":[\"VPN outage\"],\"customer_reply\":\"On it.\"}",
        ));
        let ctx = context_with(model.clone());

        let outcome = run_case(&ctx, " DEMO1 ", PromptPreset::Structured, "llama3.2:latest")
            .await
            .unwrap();

        match outcome.result {
            GenerationResult::Structured(insights) => {
                assert_eq!(insights.summary, vec!["VPN outage".to_string()]);
                assert_eq!(insights.customer_reply, "On it.");
            }
            other => panic!("expected structured result, got {other:?}"),
        }
        assert!(outcome.prompt.contains("Short description: VPN down"));
        assert!(outcome.prompt.contains("Description: None"));

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "llama3.2:latest");
        assert_eq!(requests[0].prompt, outcome.prompt);
        assert_eq!(requests[0].options, ctx.config.sampling);
    }

    #[tokio::test]
    async fn free_text_preset_keeps_raw_text() {
        let model = Arc::new(ScriptedModel::replying("CASE SUMMARY:\n- VPN down"));
        let ctx = context_with(model);

        let outcome = run_case(&ctx, "DEMO1", PromptPreset::FreeText, "mistral:7b")
            .await
            .unwrap();

        assert_eq!(
            outcome.result,
            GenerationResult::Text("CASE SUMMARY:\n- VPN down".to_string())
        );
        assert!(outcome.prompt.starts_with("You are a ServiceNow Case Copilot."));
    }

    #[tokio::test]
    async fn unparseable_structured_reply_reaches_caller() {
        let model = Arc::new(ScriptedModel::replying("I could not decide."));
        let ctx = context_with(model);

        let err = run_case(&ctx, "DEMO1", PromptPreset::Structured, "llama3.2:latest")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotParseable(_)));
    }

    #[tokio::test]
    async fn unknown_case_skips_the_model() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let ctx = context_with(model.clone());

        let err = run_case(&ctx, "CS9999999", PromptPreset::Structured, "llama3.2:latest")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(model.requests.lock().unwrap().is_empty());
    }
}
