use std::str::FromStr;
use std::time::Duration;

use ai_client::claude::DEFAULT_CLAUDE_MODEL;
use ai_client::gemini::DEFAULT_GEMINI_MODEL;
use anyhow::{anyhow, bail, Context, Result};

use crate::fetcher::DEFAULT_PAGE_TIMEOUT;
use crate::resolver::DEFAULT_MATCH_THRESHOLD;

pub const DEFAULT_MUSICBRAINZ_USER_AGENT: &str =
    "MusicReviewAssistant/1.0 (music-review-assistant)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    Claude,
}

impl LlmProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => DEFAULT_GEMINI_MODEL,
            LlmProvider::Claude => DEFAULT_CLAUDE_MODEL,
        }
    }

    fn api_key_var(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::Claude => "ANTHROPIC_API_KEY",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(LlmProvider::Gemini),
            "claude" | "anthropic" => Ok(LlmProvider::Claude),
            other => bail!("unknown LLM_PROVIDER {other:?} (expected gemini or claude)"),
        }
    }
}

/// Tunables of the research pipeline. Defaults match production behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchSettings {
    /// Minimum catalog score for replacing a Hangul artist name.
    pub name_match_threshold: u8,
    /// Encyclopedia edition for the album and artist articles.
    pub primary_lang: String,
    /// Encyclopedia edition for the untranslated album title.
    pub secondary_lang: String,
    /// Language the summary fields are written in.
    pub summary_language: String,
    pub page_timeout: Duration,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            name_match_threshold: DEFAULT_MATCH_THRESHOLD,
            primary_lang: "en".to_string(),
            secondary_lang: "ko".to_string(),
            summary_language: "Korean".to_string(),
            page_timeout: DEFAULT_PAGE_TIMEOUT,
        }
    }
}

/// Application configuration loaded from environment variables.
/// `Debug` output never includes the API key.
#[derive(Clone)]
pub struct Config {
    pub llm_provider: LlmProvider,
    /// Key for the selected provider.
    pub llm_api_key: String,
    pub llm_model: String,
    pub musicbrainz_user_agent: String,
    pub research: ResearchSettings,
}

impl Config {
    /// Load from the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let llm_provider: LlmProvider = get("LLM_PROVIDER")
            .as_deref()
            .unwrap_or("gemini")
            .parse()?;

        let key_var = llm_provider.api_key_var();
        let llm_api_key = get(key_var)
            .ok_or_else(|| anyhow!("{key_var} environment variable is required"))?;

        let defaults = ResearchSettings::default();
        let research = ResearchSettings {
            name_match_threshold: match get("NAME_MATCH_THRESHOLD") {
                Some(raw) => {
                    let threshold: u8 = raw
                        .trim()
                        .parse()
                        .context("NAME_MATCH_THRESHOLD must be a number")?;
                    if threshold > 100 {
                        bail!("NAME_MATCH_THRESHOLD must be between 0 and 100");
                    }
                    threshold
                }
                None => defaults.name_match_threshold,
            },
            primary_lang: get("WIKI_PRIMARY_LANG").unwrap_or(defaults.primary_lang),
            secondary_lang: get("WIKI_SECONDARY_LANG").unwrap_or(defaults.secondary_lang),
            summary_language: get("SUMMARY_LANGUAGE").unwrap_or(defaults.summary_language),
            page_timeout: match get("PAGE_TIMEOUT_SECS") {
                Some(raw) => Duration::from_secs(
                    raw.trim()
                        .parse()
                        .context("PAGE_TIMEOUT_SECS must be a number")?,
                ),
                None => defaults.page_timeout,
            },
        };

        Ok(Self {
            llm_provider,
            llm_api_key,
            llm_model: get("LLM_MODEL").unwrap_or_else(|| llm_provider.default_model().to_string()),
            musicbrainz_user_agent: get("MUSICBRAINZ_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_MUSICBRAINZ_USER_AGENT.to_string()),
            research,
        })
    }

    /// Log the effective configuration without exposing the API key.
    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let prefix: String = val.chars().take(4).collect();
            format!("{prefix}...({} chars)", val.chars().count())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  LLM_PROVIDER: {:?}", self.llm_provider);
        tracing::info!("  {}: {}", self.llm_provider.api_key_var(), preview(&self.llm_api_key));
        tracing::info!("  LLM_MODEL: {}", self.llm_model);
        tracing::info!("  MUSICBRAINZ_USER_AGENT: {}", self.musicbrainz_user_agent);
        tracing::info!("  NAME_MATCH_THRESHOLD: {}", self.research.name_match_threshold);
        tracing::info!(
            "  WIKI languages: {} / {}",
            self.research.primary_lang,
            self.research.secondary_lang
        );
        tracing::info!("  SUMMARY_LANGUAGE: {}", self.research.summary_language);
        tracing::info!("  PAGE_TIMEOUT_SECS: {}", self.research.page_timeout.as_secs());
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("llm_provider", &self.llm_provider)
            .field("llm_api_key", &"<redacted>")
            .field("llm_model", &self.llm_model)
            .field("musicbrainz_user_agent", &self.musicbrainz_user_agent)
            .field("research", &self.research)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_gemini_key() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "AIza-test")])).unwrap();
        assert_eq!(config.llm_provider, LlmProvider::Gemini);
        assert_eq!(config.llm_api_key, "AIza-test");
        assert_eq!(config.llm_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.musicbrainz_user_agent, DEFAULT_MUSICBRAINZ_USER_AGENT);
        assert_eq!(config.research, ResearchSettings::default());
        assert_eq!(config.research.name_match_threshold, 80);
        assert_eq!(config.research.page_timeout, Duration::from_secs(8));
    }

    #[test]
    fn test_missing_provider_key_is_an_error() {
        let err = Config::from_lookup(lookup(&[("LLM_PROVIDER", "claude"), ("GEMINI_API_KEY", "x")]))
            .unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("LLM_MODEL", "  "),
            ("WIKI_PRIMARY_LANG", ""),
        ]))
        .unwrap();
        assert_eq!(config.llm_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.research.primary_lang, "en");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("LLM_PROVIDER", "Claude"),
            ("ANTHROPIC_API_KEY", "sk-ant-test"),
            ("LLM_MODEL", "custom-model"),
            ("NAME_MATCH_THRESHOLD", "90"),
            ("WIKI_PRIMARY_LANG", "ja"),
            ("WIKI_SECONDARY_LANG", "en"),
            ("SUMMARY_LANGUAGE", "English"),
            ("PAGE_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.llm_provider, LlmProvider::Claude);
        assert_eq!(config.llm_model, "custom-model");
        assert_eq!(config.research.name_match_threshold, 90);
        assert_eq!(config.research.primary_lang, "ja");
        assert_eq!(config.research.secondary_lang, "en");
        assert_eq!(config.research.summary_language, "English");
        assert_eq!(config.research.page_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[("LLM_PROVIDER", "openai"), ("GEMINI_API_KEY", "k")])).is_err());
        assert!(Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("NAME_MATCH_THRESHOLD", "high")])).is_err());
        assert!(Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("NAME_MATCH_THRESHOLD", "101")])).is_err());
        assert!(Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("PAGE_TIMEOUT_SECS", "-1")])).is_err());
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "AIza-very-secret-value")])).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("AIza-very-secret-value"));
        assert!(debug.contains("llm_api_key: \"<redacted>\""));
        assert!(debug.contains(DEFAULT_GEMINI_MODEL));
    }
}
