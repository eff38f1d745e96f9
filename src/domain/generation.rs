use serde::{Deserialize, Serialize};

/// Sampling parameters forwarded to the inference server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingOptions {
    pub temperature: f64,
    pub top_p: f64,
    pub num_predict: u32,
}

impl SamplingOptions {
    pub const DEFAULT_TEMPERATURE: f64 = 0.3;
    pub const DEFAULT_TOP_P: f64 = 0.9;
    pub const DEFAULT_NUM_PREDICT: u32 = 450;

    /// Returns a description of the first out-of-range parameter.
    pub fn check(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0 and 1, got {}",
                self.temperature
            ));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(format!(
                "top_p must be greater than 0 and at most 1, got {}",
                self.top_p
            ));
        }
        if self.num_predict == 0 {
            return Err("max output tokens must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: Self::DEFAULT_TEMPERATURE,
            top_p: Self::DEFAULT_TOP_P,
            num_predict: Self::DEFAULT_NUM_PREDICT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub options: SamplingOptions,
}

/// The sections the structured preset asks the model to fill in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInsights {
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub next_actions: Vec<String>,
    #[serde(default)]
    pub engineer_suggestion: String,
    #[serde(default)]
    pub customer_reply: String,
    #[serde(default)]
    pub risks_or_unknowns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Structured(CaseInsights),
    Text(String),
}
