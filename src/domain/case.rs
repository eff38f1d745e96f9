use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::json::from_object_str;

/// A mock ServiceNow case as stored on disk. Every field is optional and
/// unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(default, deserialize_with = "scalar_text")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub short_description: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub work_notes: Option<String>,
}

impl CaseRecord {
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        from_object_str(contents)
    }
}

// Exports sometimes carry numeric priorities or booleans; keep their text.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}
