// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use ragdesk_app::{
    CollectionName, DEFAULT_COLLECTION, DEFAULT_GROQ_MODELS, DEFAULT_LLM_MODEL,
    DEFAULT_LLM_SOURCE, DEFAULT_OLLAMA_MODELS, LlmSource, ModeName, ModelName, SelectionDefaults,
    names_from,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "ragdesk";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_API_BASE_URL: &str = "http://localhost:5001";
const DEFAULT_API_TIMEOUT: &str = "5s";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            defaults: Defaults::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_API_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_API_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Defaults {
    pub collection: Option<String>,
    pub llm_source: Option<String>,
    pub llm_model: Option<String>,
    pub mode: Option<String>,
    pub ollama_models: Option<Vec<String>>,
    pub groq_models: Option<Vec<String>>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("RAGDESK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set RAGDESK_CONFIG_PATH to the config file")
        })?;

        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` and place values under [api] and [defaults]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Regenerate it with --print-example-config",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.api.base_url
            && base_url.trim_end_matches('/').is_empty()
        {
            bail!("api.base_url in {} must not be empty", path.display());
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_API_TIMEOUT))
    }

    pub fn selection_defaults(&self) -> SelectionDefaults {
        let defaults = &self.defaults;
        let collection = match defaults.collection.as_deref() {
            Some("") => None,
            Some(name) => Some(CollectionName::from(name)),
            None => Some(CollectionName::from(DEFAULT_COLLECTION)),
        };

        SelectionDefaults {
            collection,
            llm_source: LlmSource::from(
                defaults.llm_source.as_deref().unwrap_or(DEFAULT_LLM_SOURCE),
            ),
            llm_model: ModelName::from(defaults.llm_model.as_deref().unwrap_or(DEFAULT_LLM_MODEL)),
            mode: defaults
                .mode
                .as_deref()
                .map(ModeName::from)
                .unwrap_or_else(ModeName::rag),
            ollama_models: match &defaults.ollama_models {
                Some(models) => names_from(models),
                None => names_from(&DEFAULT_OLLAMA_MODELS),
            },
            groq_models: match &defaults.groq_models {
                Some(models) => names_from(models),
                None => names_from(&DEFAULT_GROQ_MODELS),
            },
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# ragdesk config\n# Place this file at: {}\n\nversion = 1\n\n[api]\nbase_url = \"{}\"\ntimeout = \"{}\"\n\n[defaults]\n# Empty string starts with no collection selected.\ncollection = \"{}\"\nllm_source = \"{}\"\nllm_model = \"{}\"\nmode = \"{}\"\nollama_models = {}\ngroq_models = {}\n",
            path.display(),
            DEFAULT_API_BASE_URL,
            DEFAULT_API_TIMEOUT,
            DEFAULT_COLLECTION,
            DEFAULT_LLM_SOURCE,
            DEFAULT_LLM_MODEL,
            ModeName::RAG,
            toml_list(&DEFAULT_OLLAMA_MODELS),
            toml_list(&DEFAULT_GROQ_MODELS),
        )
    }
}

fn toml_list(values: &[&str]) -> String {
    let quoted: Vec<String> = values.iter().map(|value| format!("{value:?}")).collect();
    format!("[{}]", quoted.join(", "))
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("timeout {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
