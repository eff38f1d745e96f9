use crate::domain::case::CaseRecord;

const MISSING_FIELD: &str = "None";

const STRUCTURED_INSTRUCTION: &str = "You are a ServiceNow Case Copilot.
Return ONLY valid JSON with these keys:
summary (list of strings),
next_actions (list of strings),
engineer_suggestion (string),
customer_reply (string),
risks_or_unknowns (list of strings)

Rules:
- Do NOT invent facts. If information is missing, list it under risks_or_unknowns.
- Keep customer_reply short, professional, and friendly (2–6 lines).
- Make next_actions practical and ordered.
";

const FREE_TEXT_INSTRUCTION: &str = "You are a ServiceNow Case Copilot.
Given a ServiceNow case, produce:

CASE SUMMARY:
- 3-6 bullets

CUSTOMER UPDATE DRAFT:
- Short, professional (2-6 lines)

NEXT ACTIONS:
- Checklist bullets

CLARIFYING QUESTIONS (if needed):
- bullets

Rules:
- Do NOT invent facts. If missing, ask questions.
- Keep customer update confident and simple.
";

/// Named system instructions. Each one fixes how the reply is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPreset {
    Structured,
    FreeText,
}

impl PromptPreset {
    pub fn instruction(&self) -> &'static str {
        match self {
            PromptPreset::Structured => STRUCTURED_INSTRUCTION,
            PromptPreset::FreeText => FREE_TEXT_INSTRUCTION,
        }
    }
}

/// Renders the instruction followed by every case field under a fixed label.
/// Absent fields are printed with a placeholder, never skipped.
pub fn build_prompt(system_instruction: &str, case: &CaseRecord) -> String {
    let fields: [(&str, &Option<String>); 7] = [
        ("Number", &case.number),
        ("State", &case.state),
        ("Priority", &case.priority),
        ("Short description", &case.short_description),
        ("Description", &case.description),
        ("Customer comment", &case.comments),
        ("Work notes", &case.work_notes),
    ];

    let mut prompt = format!("{system_instruction}\n\nCASE DATA:\n");
    for (label, value) in fields {
        let value = value.as_deref().unwrap_or(MISSING_FIELD);
        prompt.push_str(label);
        prompt.push_str(": ");
        prompt.push_str(value);
        prompt.push('\n');
    }

    prompt.trim().to_string()
}
