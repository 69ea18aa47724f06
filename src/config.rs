use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OpenAI API key; submissions fail with a configuration error when absent
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Model used to pick books from the catalog
    #[serde(default = "default_model")]
    pub selection_model: String,

    /// Model used to write per-tab justifications
    #[serde(default = "default_model")]
    pub reasoning_model: String,

    #[serde(default = "default_temperature")]
    pub llm_temperature: f32,

    #[serde(default)]
    pub selection_max_tokens: Option<u32>,

    #[serde(default = "default_reasoning_max_tokens")]
    pub reasoning_max_tokens: u32,

    /// Outbound request timeout; unset means no timeout
    #[serde(default)]
    pub llm_timeout_secs: Option<u64>,

    /// Book catalog JSON file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Append every rendered prompt to this file when set
    #[serde(default)]
    pub prompt_log_path: Option<PathBuf>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1".to_string()
}

fn default_temperature() -> f32 {
    0.9
}

fn default_reasoning_max_tokens() -> u32 {
    1800
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/books.json")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults_apply_without_env() {
        let config = from_pairs(&[]);
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.openai_api_url, "https://api.openai.com/v1");
        assert_eq!(config.selection_model, "gpt-4.1");
        assert_eq!(config.reasoning_model, "gpt-4.1");
        assert_eq!(config.reasoning_max_tokens, 1800);
        assert_eq!(config.selection_max_tokens, None);
        assert_eq!(config.llm_timeout_secs, None);
        assert_eq!(config.catalog_path, PathBuf::from("data/books.json"));
        assert_eq!(config.prompt_log_path, None);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_env_overrides() {
        let config = from_pairs(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("REASONING_MODEL", "gpt-4o-mini"),
            ("LLM_TEMPERATURE", "0.3"),
            ("CATALOG_PATH", "/tmp/books.json"),
            ("PORT", "8080"),
        ]);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.reasoning_model, "gpt-4o-mini");
        assert!((config.llm_temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/books.json"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let vars = vec![("PORT".to_string(), "not-a-port".to_string())];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }
}
