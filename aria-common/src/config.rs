//! Configuration loading and base path resolution
//!
//! Configuration is a single TOML file. Every table is optional; missing
//! tables and fields fall back to built-in defaults defined in this module.
//!
//! # Resolution order
//!
//! Config file:
//! 1. Explicit path (command line / `ARIA_CONFIG`)
//! 2. `<base>/aria-report.toml`
//! 3. `<user config dir>/aria-report/config.toml`
//! 4. Built-in defaults
//!
//! Base path:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML `base_path`
//! 4. Current working directory

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// File name looked up inside the project base directory
pub const PROJECT_CONFIG_FILE: &str = "aria-report.toml";

/// Environment variable naming the project base directory
pub const BASE_PATH_ENV: &str = "ARIA_BASE_PATH";

/// Provider kinds accepted by the chat-completion client
pub const SUPPORTED_PROVIDERS: &[&str] = &["openai", "openai-compatible"];

/// Top-level TOML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Project root holding the `materials/` tree (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Section writer tuning
    #[serde(default)]
    pub writer: WriterSettings,

    /// Primary generation service
    #[serde(default = "default_primary")]
    pub primary: GeneratorSettings,

    /// Secondary generation service
    #[serde(default = "default_secondary")]
    pub secondary: GeneratorSettings,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            logging: LoggingConfig::default(),
            writer: WriterSettings::default(),
            primary: default_primary(),
            secondary: default_secondary(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Tunable parameters for dual-source section generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterSettings {
    /// Sampling temperature sent to both generators
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion token cap per request
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Nucleus sampling parameter
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Target language tag ("zh..." requests Chinese prose, anything else English)
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum number of excerpts included in one grounding prompt
    #[serde(default = "default_max_context_segments")]
    pub max_context_segments: usize,

    /// Minimum paragraph score for a non-winning candidate paragraph to be merged
    #[serde(default = "default_min_paragraph_score")]
    pub min_paragraph_score: f64,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            top_p: default_top_p(),
            language: default_language(),
            max_context_segments: default_max_context_segments(),
            min_paragraph_score: default_min_paragraph_score(),
        }
    }
}

/// Connection settings for one chat-completion service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Identifier used in logs and candidate file names
    pub identifier: String,

    /// Model name sent with each request
    pub model: String,

    /// Provider kind (see [`SUPPORTED_PROVIDERS`])
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Environment variable consulted when `api_key` is absent
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Explicit credential (takes precedence over `api_key_env`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Endpoint root; `/v1/chat/completions` is appended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    /// Additional HTTP headers sent with every request
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

impl GeneratorSettings {
    /// Create settings with defaults for everything except identity and model
    pub fn new(identifier: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            model: model.into(),
            provider: default_provider(),
            api_key_env: default_api_key_env(),
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
            extra_headers: BTreeMap::new(),
        }
    }

    /// Return the API key, preferring the explicit value over the environment
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| is_valid_key(k)) {
            return Ok(key.to_string());
        }

        match std::env::var(&self.api_key_env) {
            Ok(key) if is_valid_key(&key) => {
                debug!(
                    client = %self.identifier,
                    env = %self.api_key_env,
                    "API key loaded from environment variable"
                );
                Ok(key)
            }
            _ => Err(Error::Config(format!(
                "Missing API key for generation client '{}'. Provide `api_key` in the config \
                 or set the environment variable '{}'",
                self.identifier, self.api_key_env
            ))),
        }
    }

    /// Reject provider kinds the chat-completion client cannot talk to
    pub fn validate_provider(&self) -> Result<()> {
        if SUPPORTED_PROVIDERS.contains(&self.provider.as_str()) {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "Generation client '{}' uses unsupported provider '{}' (expected one of: {})",
                self.identifier,
                self.provider,
                SUPPORTED_PROVIDERS.join(", ")
            )))
        }
    }

    /// Request timeout as a `Duration`; must be positive and representable
    pub fn timeout(&self) -> Result<Duration> {
        if self.timeout_secs.is_nan() || self.timeout_secs <= 0.0 {
            return Err(Error::Config(format!(
                "Generation client '{}' has invalid timeout_secs {} (must be positive)",
                self.identifier, self.timeout_secs
            )));
        }
        Duration::try_from_secs_f64(self.timeout_secs).map_err(|e| {
            Error::Config(format!(
                "Generation client '{}' has invalid timeout_secs {}: {}",
                self.identifier, self.timeout_secs, e
            ))
        })
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_output_tokens() -> u32 {
    800
}

fn default_top_p() -> f32 {
    0.9
}

fn default_language() -> String {
    "zh".to_string()
}

fn default_max_context_segments() -> usize {
    10
}

fn default_min_paragraph_score() -> f64 {
    0.25
}

fn default_provider() -> String {
    "openai-compatible".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> f64 {
    60.0
}

fn default_primary() -> GeneratorSettings {
    GeneratorSettings::new("primary", "gpt-4o-mini")
}

fn default_secondary() -> GeneratorSettings {
    GeneratorSettings {
        api_key_env: "DEEPSEEK_API_KEY".to_string(),
        base_url: Some("https://api.deepseek.com".to_string()),
        ..GeneratorSettings::new("secondary", "deepseek-chat")
    }
}

/// Locate the configuration file to load, if any
///
/// `explicit` wins unconditionally (a missing explicit file is reported by
/// [`load_toml_config`]). Otherwise the project file under `base_hint` and
/// the per-user file are tried in that order.
pub fn resolve_config_path(explicit: Option<&Path>, base_hint: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(base) = base_hint {
        let project = base.join(PROJECT_CONFIG_FILE);
        if project.is_file() {
            return Some(project);
        }
    }

    dirs::config_dir()
        .map(|d| d.join("aria-report").join("config.toml"))
        .filter(|p| p.is_file())
}

/// Parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Read TOML failed ({}): {}", path.display(), e))
    })?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;
    debug!("Parsed configuration from {}", path.display());
    Ok(config)
}

/// Load configuration from `path`, or built-in defaults when no file applies
pub fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(path) => load_toml_config(path),
        None => {
            debug!("No configuration file found; using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Resolve the project base path
///
/// Priority: command-line argument → environment variable → TOML → current directory.
pub fn resolve_base_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.base_path {
        return path.clone();
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Write configuration to disk atomically (temp file + rename)
///
/// On Unix the file is restricted to the owner (0600) since it may carry
/// API keys.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&temp_path, path)?;
    info!("Configuration written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_tables_missing() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.writer.max_context_segments, 10);
        assert_eq!(config.writer.min_paragraph_score, 0.25);
        assert_eq!(config.primary.identifier, "primary");
        assert_eq!(config.secondary.identifier, "secondary");
        assert_eq!(
            config.secondary.base_url.as_deref(),
            Some("https://api.deepseek.com")
        );
    }

    #[test]
    fn test_partial_generator_table_uses_field_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [primary]
            identifier = "alpha"
            model = "m1"
            "#,
        )
        .unwrap();
        assert_eq!(config.primary.provider, "openai-compatible");
        assert_eq!(config.primary.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.primary.timeout_secs, 60.0);
        assert!(config.primary.extra_headers.is_empty());
    }

    #[test]
    fn test_explicit_key_preferred() {
        let mut settings = GeneratorSettings::new("p", "m");
        settings.api_key = Some("explicit".to_string());
        settings.api_key_env = "ARIA_TEST_UNSET_VARIABLE_FOR_KEY".to_string();
        assert_eq!(settings.resolve_api_key().unwrap(), "explicit");
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let mut settings = GeneratorSettings::new("p", "m");
        settings.api_key = Some("   ".to_string());
        settings.api_key_env = "ARIA_TEST_UNSET_VARIABLE_FOR_KEY".to_string();
        let err = settings.resolve_api_key().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("ARIA_TEST_UNSET_VARIABLE_FOR_KEY"));
    }

    #[test]
    fn test_timeout_conversion() {
        let mut settings = GeneratorSettings::new("p", "m");
        settings.timeout_secs = 2.5;
        assert_eq!(settings.timeout().unwrap(), Duration::from_millis(2500));
    }

    #[test]
    fn test_unrepresentable_timeout_is_config_error() {
        let config: TomlConfig = toml::from_str(
            r#"
            [primary]
            timeout_secs = inf
            "#,
        )
        .unwrap();
        assert!(matches!(config.primary.timeout(), Err(Error::Config(_))));

        let mut settings = GeneratorSettings::new("p", "m");
        for bad in [1e300, 0.0, -3.0, f64::NAN] {
            settings.timeout_secs = bad;
            assert!(matches!(settings.timeout(), Err(Error::Config(_))), "{}", bad);
        }
    }

    #[test]
    fn test_provider_validation() {
        let mut settings = GeneratorSettings::new("p", "m");
        assert!(settings.validate_provider().is_ok());
        settings.provider = "openai".to_string();
        assert!(settings.validate_provider().is_ok());
        settings.provider = "anthropic".to_string();
        assert!(matches!(settings.validate_provider(), Err(Error::Config(_))));
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("  \t"));
    }
}
