use crate::context::AppContext;
use crate::error::{AppError, AppResult};

pub async fn list_cases(ctx: &AppContext) -> AppResult<()> {
    let ids = ctx.case_store.list_case_ids().await?;
    if ids.is_empty() {
        println!("No mock cases found in {}", ctx.config.cases_dir.display());
    }
    for id in ids {
        println!("{id}");
    }
    Ok(())
}

pub async fn list_models(ctx: &AppContext) -> AppResult<()> {
    let models = ctx.language_model.list_models().await;
    if models.is_empty() {
        println!("No models reported by {}", ctx.config.ollama_url);
    }
    for model in models {
        let marker = if model == ctx.config.model { " (default)" } else { "" };
        println!("{model}{marker}");
    }
    Ok(())
}

pub async fn status(ctx: &AppContext) -> AppResult<()> {
    if !ctx.language_model.is_up().await {
        return Err(AppError::ServiceUnavailable(format!(
            "no Ollama server answering at {}",
            ctx.config.ollama_url
        )));
    }
    println!("Ollama is running at {}", ctx.config.ollama_url);
    println!("Default model: {}", ctx.config.model);
    Ok(())
}
