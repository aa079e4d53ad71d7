use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PlannerConfig {
    /// Generative-text provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// WordPress content API settings
    #[serde(default)]
    pub content: ContentConfig,
    /// Proxy server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Base URL of a running proxy, used by the proxy-backed candidate source
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    /// Number of candidates requested per category
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            content: ContentConfig::default(),
            server: ServerConfig::default(),
            proxy_url: default_proxy_url(),
            candidate_limit: default_candidate_limit(),
        }
    }
}

/// Configuration for the OpenAI-compatible completion endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// API key for authentication (can also be set via OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_provider_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl ProviderConfig {
    /// Configured key, falling back to the OPENAI_API_KEY environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Configuration for the WordPress recipe content API
#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Site root, without the /wp-json suffix
    #[serde(default = "default_content_base_url")]
    pub base_url: String,
    /// Upstream request timeout in seconds
    #[serde(default = "default_content_timeout")]
    pub timeout: u64,
    /// Posts per category when the caller gives no limit
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: default_content_base_url(),
            timeout: default_content_timeout(),
            default_limit: default_limit(),
        }
    }
}

/// Configuration for the HTTP proxy
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

// Default value functions
fn default_provider_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_content_base_url() -> String {
    "https://www.foodandhome.co.za".to_string()
}

fn default_content_timeout() -> u64 {
    10
}

fn default_limit() -> u32 {
    3
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_proxy_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_candidate_limit() -> u32 {
    6
}

impl PlannerConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEALPLAN__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEALPLAN__PROVIDER__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`PlannerConfig::load`] for the source priority.
pub fn load_config() -> Result<PlannerConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: MEALPLAN__SERVER__PORT
        .add_source(
            Environment::with_prefix("MEALPLAN")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.allowed_origins")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
