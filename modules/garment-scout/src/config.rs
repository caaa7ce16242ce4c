use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

/// Which backend serves the vision and text models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    Claude,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::Claude => "claude",
        }
    }

    fn default_vision_model(&self) -> &'static str {
        match self {
            Provider::Ollama => "llava:13b",
            Provider::Claude => "claude-sonnet-4-20250514",
        }
    }

    fn default_text_model(&self) -> &'static str {
        match self {
            Provider::Ollama => "qwen2.5:latest",
            Provider::Claude => "claude-sonnet-4-20250514",
        }
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "claude" | "anthropic" => Ok(Provider::Claude),
            other => Err(anyhow!("Unknown AI_PROVIDER '{other}' (expected ollama or claude)")),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Search
    pub serper_api_key: String,
    pub search_country: String,
    pub search_language: String,
    pub search_timeout: Duration,

    // Models
    pub provider: Provider,
    pub ollama_base_url: String,
    pub ollama_num_gpu: Option<u32>,
    pub anthropic_api_key: Option<String>,
    pub vision_model: String,
    pub text_model: String,
    pub text_max_tokens: u32,
    pub model_timeout: Duration,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build a config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider: Provider = match get("AI_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => Provider::Ollama,
        };

        let anthropic_api_key = get("ANTHROPIC_API_KEY");
        if provider == Provider::Claude && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY environment variable is required when AI_PROVIDER=claude");
        }

        Ok(Self {
            serper_api_key: get("SERPER_API_KEY")
                .context("SERPER_API_KEY environment variable is required")?,
            search_country: get("SEARCH_COUNTRY").unwrap_or_else(|| "us".to_string()),
            search_language: get("SEARCH_LANGUAGE").unwrap_or_else(|| "en".to_string()),
            search_timeout: parse_or("SEARCH_TIMEOUT_SECS", get("SEARCH_TIMEOUT_SECS"), 30)
                .map(Duration::from_secs)?,

            provider,
            ollama_base_url: get("OLLAMA_BASE_URL")
                .unwrap_or_else(|| "http://localhost:11434".to_string()),
            ollama_num_gpu: get("OLLAMA_NUM_GPU")
                .map(|v| parse_value("OLLAMA_NUM_GPU", &v))
                .transpose()?,
            anthropic_api_key,
            vision_model: get("VISION_MODEL")
                .unwrap_or_else(|| provider.default_vision_model().to_string()),
            text_model: get("TEXT_MODEL")
                .unwrap_or_else(|| provider.default_text_model().to_string()),
            text_max_tokens: parse_or("TEXT_MAX_TOKENS", get("TEXT_MAX_TOKENS"), 250)?,
            model_timeout: parse_or("MODEL_TIMEOUT_SECS", get("MODEL_TIMEOUT_SECS"), 120)
                .map(Duration::from_secs)?,
        })
    }

    fn log_keys(&self) {
        info!(
            serper_api_key = %redact_key(&self.serper_api_key),
            anthropic_api_key = ?self.anthropic_api_key.as_deref().map(redact_key),
            provider = %self.provider,
            "Config loaded"
        );
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::from_lookup(|key| match key {
            "SERPER_API_KEY" => Some("serper-test".to_string()),
            _ => None,
        })
        .expect("test config")
    }
}

/// Show at most five leading characters, and never more than half the key.
fn redact_key(val: &str) -> String {
    let chars = val.chars().count();
    let shown: String = val.chars().take((chars / 2).min(5)).collect();
    format!("{shown}...({chars} chars)")
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow!("{key} must be a non-negative integer, got '{raw}'"))
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_use_local_ollama() {
        let config = Config::from_lookup(lookup(&[("SERPER_API_KEY", "abc")])).unwrap();

        assert_eq!(config.provider, Provider::Ollama);
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.vision_model, "llava:13b");
        assert_eq!(config.text_model, "qwen2.5:latest");
        assert_eq!(config.text_max_tokens, 250);
        assert_eq!(config.model_timeout, Duration::from_secs(120));
        assert_eq!(config.search_timeout, Duration::from_secs(30));
        assert_eq!(config.search_country, "us");
        assert_eq!(config.ollama_num_gpu, None);
    }

    #[test]
    fn test_serper_key_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("SERPER_API_KEY"));

        let err = Config::from_lookup(lookup(&[("SERPER_API_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("SERPER_API_KEY"));
    }

    #[test]
    fn test_claude_provider() {
        let config = Config::from_lookup(lookup(&[
            ("SERPER_API_KEY", "abc"),
            ("AI_PROVIDER", "Claude"),
            ("ANTHROPIC_API_KEY", "sk-ant-test"),
            ("TEXT_MODEL", "claude-haiku"),
        ]))
        .unwrap();

        assert_eq!(config.provider, Provider::Claude);
        assert_eq!(config.vision_model, "claude-sonnet-4-20250514");
        assert_eq!(config.text_model, "claude-haiku");
    }

    #[test]
    fn test_claude_provider_requires_key() {
        let err = Config::from_lookup(lookup(&[
            ("SERPER_API_KEY", "abc"),
            ("AI_PROVIDER", "claude"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("SERPER_API_KEY", "abc"),
            ("AI_PROVIDER", "gemini"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn test_numeric_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SERPER_API_KEY", "abc"),
            ("TEXT_MAX_TOKENS", "64"),
            ("MODEL_TIMEOUT_SECS", "10"),
            ("OLLAMA_NUM_GPU", "1"),
        ]))
        .unwrap();

        assert_eq!(config.text_max_tokens, 64);
        assert_eq!(config.model_timeout, Duration::from_secs(10));
        assert_eq!(config.ollama_num_gpu, Some(1));
    }

    #[test]
    fn test_redact_key_hides_short_keys() {
        assert_eq!(redact_key("abc12"), "ab...(5 chars)");
        assert_eq!(redact_key("x"), "...(1 chars)");
        assert_eq!(redact_key("sk-ant-api03-secret"), "sk-an...(19 chars)");
        assert_eq!(redact_key("clé€€"), "cl...(5 chars)");
    }

    #[test]
    fn test_bad_number_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("SERPER_API_KEY", "abc"),
            ("SEARCH_TIMEOUT_SECS", "half a minute"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SEARCH_TIMEOUT_SECS"));
    }
}
