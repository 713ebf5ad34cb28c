//! Persistent configuration for hackpilot.
//!
//! Config file lives at `~/.config/hackpilot/config.toml`. It maps provider
//! names to credential strings and carries a few LLM / deployment knobs.
//! Credentials are only checked for presence, right before they are needed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{AssistantError, Result};

/// Default model for the Anthropic provider.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
/// Default model for OpenAI-compatible providers.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Provider name -> conventional environment variable holding its credential.
pub const CREDENTIAL_ENV: &[(&str, &str)] = &[
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("openai", "OPENAI_API_KEY"),
    ("vercel", "VERCEL_TOKEN"),
    ("netlify", "NETLIFY_AUTH_TOKEN"),
    ("heroku", "HEROKU_API_KEY"),
    ("railway", "RAILWAY_TOKEN"),
];

/// Which LLM API dialect to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Anthropic,
    OpenAi,
}

impl LlmProvider {
    /// Credential key in `[credentials]`.
    pub fn credential_name(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::OpenAi => "openai",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "https://api.anthropic.com",
            LlmProvider::OpenAi => "https://api.openai.com",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => DEFAULT_MODEL,
            LlmProvider::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// `[llm]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmSettings {
    pub provider: Option<LlmProvider>,
    pub model: Option<String>,
    /// Override the API root, e.g. for a local OpenAI-compatible gateway.
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// `[deploy]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeploySettings {
    pub default_platform: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// User configuration (persisted in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider name -> credential string.
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub deploy: DeploySettings,
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hackpilot")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hackpilot")
        .join("history.db")
}

impl Config {
    /// Load a config file. A missing file yields defaults; a present but
    /// unreadable or malformed one is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AssistantError::config(format!("can't read {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
            .map_err(|e| AssistantError::config(format!("bad config file {}: {e}", path.display())))
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let s = toml::to_string_pretty(self)
            .map_err(|e| AssistantError::config(format!("can't serialize config: {e}")))?;
        std::fs::write(path, s)?;
        Ok(())
    }

    /// Overlay credentials from conventional environment variables. The
    /// lookup is injected so callers decide where the environment comes from.
    pub fn overlay_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (name, var) in CREDENTIAL_ENV {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                self.credentials.insert((*name).to_string(), value);
            }
        }
        if let Some(model) = lookup("HACKPILOT_MODEL").filter(|v| !v.trim().is_empty()) {
            self.llm.model = Some(model);
        }
    }

    /// Fetch a credential, failing if it is absent or blank.
    pub fn credential(&self, provider: &str) -> Result<&str> {
        match self.credentials.get(provider).map(|s| s.trim()) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => {
                let hint = CREDENTIAL_ENV
                    .iter()
                    .find(|(name, _)| *name == provider)
                    .map(|(_, var)| format!(" (or set {var})"))
                    .unwrap_or_default();
                Err(AssistantError::config(format!(
                    "missing credential for `{provider}`: add it under [credentials]{hint}"
                )))
            }
        }
    }

    pub fn llm_provider(&self) -> LlmProvider {
        self.llm.provider.unwrap_or_default()
    }

    pub fn llm_model(&self) -> String {
        self.llm
            .model
            .clone()
            .unwrap_or_else(|| self.llm_provider().default_model().to_string())
    }

    pub fn llm_base_url(&self) -> String {
        self.llm
            .base_url
            .clone()
            .unwrap_or_else(|| self.llm_provider().default_base_url().to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn llm_max_tokens(&self) -> u32 {
        self.llm.max_tokens.unwrap_or(4096)
    }

    pub fn llm_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.llm.timeout_secs.unwrap_or(120))
    }

    pub fn deploy_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.deploy.timeout_secs.unwrap_or(300))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let cfg = Config::parse(
            r#"
[credentials]
anthropic = "sk-ant-test"
vercel = "vc-token"

[llm]
provider = "openai"
model = "gpt-4o-mini"
base_url = "http://localhost:8080/"
timeout_secs = 5

[deploy]
default_platform = "netlify"
"#,
        )
        .unwrap();
        assert_eq!(cfg.credential("anthropic").unwrap(), "sk-ant-test");
        assert_eq!(cfg.llm_provider(), LlmProvider::OpenAi);
        assert_eq!(cfg.llm_model(), "gpt-4o-mini");
        assert_eq!(cfg.llm_base_url(), "http://localhost:8080");
        assert_eq!(cfg.llm_timeout().as_secs(), 5);
        assert_eq!(cfg.deploy.default_platform.as_deref(), Some("netlify"));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::parse("").unwrap();
        assert!(cfg.credentials.is_empty());
        assert_eq!(cfg.llm_provider(), LlmProvider::Anthropic);
        assert_eq!(cfg.llm_model(), DEFAULT_MODEL);
        assert_eq!(cfg.llm_max_tokens(), 4096);
    }

    #[test]
    fn missing_or_blank_credential_is_configuration_error() {
        let mut cfg = Config::default();
        cfg.credentials.insert("vercel".into(), "   ".into());
        let err = cfg.credential("vercel").unwrap_err();
        assert!(matches!(err, AssistantError::Configuration(_)));
        assert!(err.to_string().contains("VERCEL_TOKEN"));

        let err = cfg.credential("anthropic").unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn environment_overrides_file_entries() {
        let mut cfg = Config::default();
        cfg.credentials.insert("anthropic".into(), "from-file".into());
        cfg.overlay_env(|var| match var {
            "ANTHROPIC_API_KEY" => Some("from-env".into()),
            "NETLIFY_AUTH_TOKEN" => Some(String::new()),
            "HACKPILOT_MODEL" => Some("claude-test".into()),
            _ => None,
        });
        assert_eq!(cfg.credential("anthropic").unwrap(), "from-env");
        assert!(cfg.credential("netlify").is_err());
        assert_eq!(cfg.llm_model(), "claude-test");
    }

    #[test]
    fn load_missing_file_is_default_and_bad_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert!(cfg.credentials.is_empty());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "credentials = 12").unwrap();
        let err = Config::load(&bad).unwrap_err();
        assert!(matches!(err, AssistantError::Configuration(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.credentials.insert("railway".into(), "rw".into());
        cfg.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.credential("railway").unwrap(), "rw");
    }
}
