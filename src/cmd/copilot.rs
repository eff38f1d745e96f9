use termimad::{MadSkin, crossterm::style::Color};
use tracing::warn;

use crate::cmd::read_line;
use crate::context::AppContext;
use crate::domain::generation::{CaseInsights, GenerationResult};
use crate::domain::prompt::PromptPreset;
use crate::error::{AppError, AppResult};
use crate::workflow::copilot::{CopilotOutcome, run_case};

const ENGINE_DOWN: &str = "Cannot connect to the local AI engine. Please start Ollama and try again.";

#[derive(Debug, Clone)]
pub struct CopilotCommandArgs {
    pub advanced: bool,
    pub preset: PromptPreset,
}

pub async fn run(ctx: &AppContext, args: CopilotCommandArgs) -> AppResult<()> {
    let skin = create_markdown_skin();
    skin.print_text(
        "# 🧠 ServiceNow Case Copilot\n*On-prem LLM copilot for ServiceNow Case Management*\n",
    );

    if !ctx.language_model.is_up().await {
        return Err(AppError::ServiceUnavailable(ENGINE_DOWN.to_string()));
    }

    let model = if args.advanced {
        let installed = ctx.language_model.list_models().await;
        let model = pick_model(&installed, &ctx.config.model);
        skin.print_text(&controls_markdown(ctx, &installed, &model));
        model
    } else {
        ctx.config.model.clone()
    };

    match ctx.case_store.list_case_ids().await {
        Ok(ids) if !ids.is_empty() => println!("Available cases: {}\n", ids.join(", ")),
        Ok(_) => {}
        Err(err) => warn!("could not list mock cases: {err}"),
    }

    loop {
        let Some(case_number) = read_line("Case number (e.g., CS0001234, blank to quit): ")? else {
            break;
        };
        if case_number.is_empty() || case_number.eq_ignore_ascii_case("quit") {
            break;
        }

        println!("Generating output...");
        match run_case(ctx, &case_number, args.preset, &model).await {
            Ok(outcome) => {
                skin.print_text(&outcome_markdown(&outcome, args.advanced));
                println!();
            }
            Err(err) => eprintln!("Error: {err}\n"),
        }
    }

    Ok(())
}

/// The configured model when it is installed, otherwise the first one found.
fn pick_model(installed: &[String], configured: &str) -> String {
    if installed.iter().any(|name| name == configured) {
        configured.to_string()
    } else {
        installed
            .first()
            .cloned()
            .unwrap_or_else(|| configured.to_string())
    }
}

fn controls_markdown(ctx: &AppContext, installed: &[String], model: &str) -> String {
    let sampling = ctx.config.sampling;
    let mut md = String::from("## ⚙️ Model & Controls\n");
    md.push_str(&format!("Ollama is running at `{}` ✅\n\n", ctx.config.ollama_url));
    if installed.is_empty() {
        md.push_str("Installed models: *none reported*\n");
    } else {
        md.push_str(&format!("Installed models: {}\n", installed.join(", ")));
    }
    md.push_str(&format!(
        "\n* **Model:** `{model}`\n* **Temperature:** {}\n* **Top-p:** {}\n* **Max output tokens:** {}\n",
        sampling.temperature, sampling.top_p, sampling.num_predict
    ));
    md
}

fn outcome_markdown(outcome: &CopilotOutcome, advanced: bool) -> String {
    let mut md = match &outcome.result {
        GenerationResult::Structured(insights) => insights_markdown(insights),
        GenerationResult::Text(text) => format!("## Output\n{text}\n"),
    };

    if advanced {
        md.push_str("\n---\n## Advanced Details\n");
        if let GenerationResult::Structured(insights) = &outcome.result {
            md.push_str("### Raw JSON\n");
            md.push_str(&code_block("json", &pretty_json(insights)));
        }
        md.push_str("### Prompt\n");
        md.push_str(&code_block("text", &outcome.prompt));
        md.push_str("### Case JSON used\n");
        md.push_str(&code_block("json", &pretty_json(&outcome.case)));
    }
    md
}

fn insights_markdown(insights: &CaseInsights) -> String {
    let mut md = String::from("## Output\n");

    md.push_str("### ✅ Case Summary\n");
    push_bullets(&mut md, &insights.summary);

    md.push_str("### 🧭 Next Actions\n");
    for (index, action) in insights.next_actions.iter().enumerate() {
        md.push_str(&format!("{}. {action}\n", index + 1));
    }

    md.push_str("### 🛠️ Engineer Suggestion (Work Notes Draft)\n");
    push_quote(&mut md, &insights.engineer_suggestion);

    md.push_str("### 💬 Customer Reply Draft\n");
    push_quote(&mut md, &insights.customer_reply);

    if !insights.risks_or_unknowns.is_empty() {
        md.push_str("### ⚠️ Missing Info / Risks\n");
        push_bullets(&mut md, &insights.risks_or_unknowns);
    }
    md
}

fn push_bullets(md: &mut String, items: &[String]) {
    for item in items {
        md.push_str(&format!("* {item}\n"));
    }
}

fn push_quote(md: &mut String, text: &str) {
    for line in text.lines() {
        md.push_str(&format!("> {line}\n"));
    }
}

fn code_block(language: &str, body: &str) -> String {
    format!("```{language}\n{body}\n```\n")
}

fn pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("<unserializable: {err}>"))
}

fn create_markdown_skin() -> MadSkin {
    let mut skin = MadSkin::default();

    skin.headers[0].set_fg(Color::Cyan);
    skin.headers[1].set_fg(Color::Blue);
    skin.headers[2].set_fg(Color::Green);

    skin.code_block.set_fg(Color::Yellow);
    skin.inline_code.set_fg(Color::Yellow);

    skin.bold.set_fg(Color::White);
    skin.italic.set_fg(Color::Magenta);

    skin
}
