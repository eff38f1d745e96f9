use tracing::debug;

use crate::domain::generation::CaseInsights;
use crate::domain::json::from_object_str;
use crate::error::{AppError, AppResult};

const NOT_PARSEABLE: &str = "Model output was not valid JSON. Try again or change model/settings.";

/// Reads the structured sections out of a model reply.
///
/// The whole reply is parsed first. Local models often wrap the object in
/// prose or code fences, so on failure the span from the first `{` to the
/// last `}` is parsed instead. Truncated or broken JSON is not repaired.
pub fn interpret(raw: &str) -> AppResult<CaseInsights> {
    let text = raw.trim();

    if let Ok(insights) = from_object_str::<CaseInsights>(text) {
        return Ok(insights);
    }

    let candidate = brace_span(text)
        .ok_or_else(|| AppError::NotParseable(NOT_PARSEABLE.to_string()))?;

    from_object_str::<CaseInsights>(candidate).map_err(|err| {
        debug!("extracted JSON span did not parse: {err}");
        AppError::NotParseable(NOT_PARSEABLE.to_string())
    })
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
