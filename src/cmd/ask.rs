use crate::cmd::read_line;
use crate::context::AppContext;
use crate::domain::prompt::PromptPreset;
use crate::error::AppResult;
use crate::workflow::copilot::run_case;

#[derive(Debug, Clone)]
pub struct AskCommandArgs {
    pub case: Option<String>,
}

pub async fn run(ctx: &AppContext, args: AskCommandArgs) -> AppResult<()> {
    println!("ServiceNow Case Copilot (Mock Mode) - Ollama\n");

    let case_number = match args.case {
        Some(case) => case,
        None => read_line("Enter Case number (e.g., CS0001234): ")?.unwrap_or_default(),
    };

    let outcome = run_case(ctx, &case_number, PromptPreset::FreeText, &ctx.config.model).await?;
    println!("\n{}", outcome.raw);
    Ok(())
}
