use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::generation::SamplingOptions;
use crate::error::{AppError, AppResult};
use crate::infra::ollama::OllamaTimeouts;

const CONFIG_DIR_NAME: &str = "case-copilot";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:latest";
pub const DEFAULT_CASES_DIR: &str = "mock_cases";

const ENV_OLLAMA_URL: &str = "CASE_COPILOT_OLLAMA_URL";
const ENV_MODEL: &str = "CASE_COPILOT_MODEL";
const ENV_CASES_DIR: &str = "CASE_COPILOT_CASES_DIR";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ollama_url: String,
    pub model: String,
    pub sampling: SamplingOptions,
    pub timeouts: OllamaTimeouts,
    pub cases_dir: PathBuf,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    pub cases_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(workspace_hint: &Path, overrides: &ConfigOverrides) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(workspace_hint, stored, |key| env::var(key).ok(), overrides)
    }

    /// Layers defaults, the stored file, the environment and CLI overrides.
    pub fn resolve(
        workspace_hint: &Path,
        stored: StoredConfig,
        env_lookup: impl Fn(&str) -> Option<String>,
        overrides: &ConfigOverrides,
    ) -> AppResult<Self> {
        let stored_sampling = stored.sampling();
        let env_value = |key: &str| env_lookup(key).filter(|value| !value.trim().is_empty());

        let ollama_url = env_value(ENV_OLLAMA_URL)
            .or(stored.ollama_url)
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        let model = overrides
            .model
            .clone()
            .or_else(|| env_value(ENV_MODEL))
            .or(stored.default_model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let cases_dir = overrides
            .cases_dir
            .clone()
            .or_else(|| env_value(ENV_CASES_DIR).map(PathBuf::from))
            .or_else(|| stored.cases_dir.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CASES_DIR));
        let cases_dir = if cases_dir.is_absolute() {
            cases_dir
        } else {
            workspace_hint.join(cases_dir)
        };

        let sampling = SamplingOptions {
            temperature: overrides
                .temperature
                .unwrap_or(stored_sampling.temperature),
            top_p: overrides.top_p.unwrap_or(stored_sampling.top_p),
            num_predict: overrides
                .max_tokens
                .unwrap_or(stored_sampling.num_predict),
        };
        sampling.check().map_err(AppError::Configuration)?;

        Ok(Self {
            ollama_url,
            model,
            sampling,
            timeouts: OllamaTimeouts::default(),
            cases_dir,
        })
    }
}

/// Settings persisted by `config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cases_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl StoredConfig {
    /// Stored sampling values, with defaults for the ones left unset.
    pub fn sampling(&self) -> SamplingOptions {
        SamplingOptions {
            temperature: self
                .temperature
                .unwrap_or(SamplingOptions::DEFAULT_TEMPERATURE),
            top_p: self.top_p.unwrap_or(SamplingOptions::DEFAULT_TOP_P),
            num_predict: self
                .max_tokens
                .unwrap_or(SamplingOptions::DEFAULT_NUM_PREDICT),
        }
    }

    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!(
                    "invalid config file {}: {err}",
                    path.display()
                ))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("could not determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = AppConfig::resolve(
            Path::new("/work"),
            StoredConfig::default(),
            no_env,
            &ConfigOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.ollama_url, DEFAULT_OLLAMA_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.cases_dir, PathBuf::from("/work/mock_cases"));
        assert_eq!(config.sampling, SamplingOptions::default());
    }

    #[test]
    fn layers_stored_env_and_overrides() {
        let stored = StoredConfig {
            ollama_url: Some("http://gpu-box:11434".to_string()),
            default_model: Some("mistral:7b".to_string()),
            cases_dir: Some("/srv/cases".to_string()),
            temperature: Some(0.1),
            top_p: None,
            max_tokens: Some(600),
        };
        let env = |key: &str| match key {
            ENV_MODEL => Some("qwen2.5:7b".to_string()),
            ENV_CASES_DIR => Some("   ".to_string()),
            _ => None,
        };
        let overrides = ConfigOverrides {
            temperature: Some(0.7),
            ..ConfigOverrides::default()
        };

        let config = AppConfig::resolve(Path::new("/work"), stored, env, &overrides).unwrap();

        assert_eq!(config.ollama_url, "http://gpu-box:11434");
        assert_eq!(config.model, "qwen2.5:7b");
        assert_eq!(config.cases_dir, PathBuf::from("/srv/cases"));
        assert_eq!(config.sampling.temperature, 0.7);
        assert_eq!(config.sampling.top_p, SamplingOptions::DEFAULT_TOP_P);
        assert_eq!(config.sampling.num_predict, 600);
    }

    #[test]
    fn stored_sampling_falls_back_to_defaults() {
        let stored = StoredConfig {
            top_p: Some(0.5),
            ..StoredConfig::default()
        };
        let sampling = stored.sampling();
        assert_eq!(sampling.top_p, 0.5);
        assert_eq!(sampling.num_predict, SamplingOptions::DEFAULT_NUM_PREDICT);
    }

    #[test]
    fn rejects_out_of_range_overrides() {
        let overrides = ConfigOverrides {
            top_p: Some(1.5),
            ..ConfigOverrides::default()
        };
        let err = AppConfig::resolve(Path::new("/work"), StoredConfig::default(), no_env, &overrides)
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn stored_config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        assert!(StoredConfig::load_from(&path).unwrap().default_model.is_none());

        let stored = StoredConfig {
            default_model: Some("llama3.2:latest".to_string()),
            max_tokens: Some(300),
            ..StoredConfig::default()
        };
        stored.save_to(&path).unwrap();

        let loaded = StoredConfig::load_from(&path).unwrap();
        assert_eq!(loaded.default_model.as_deref(), Some("llama3.2:latest"));
        assert_eq!(loaded.max_tokens, Some(300));
        assert!(loaded.ollama_url.is_none());
    }

    #[test]
    fn invalid_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            StoredConfig::load_from(&path),
            Err(AppError::Configuration(_))
        ));
    }
}
