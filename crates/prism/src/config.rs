//! Layered configuration for the Prism CLI.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from prism.toml)
//! - `~/.config/prism/prism.toml`
//! - `./prism.toml`
//! - An explicit file passed with `--config`
//! - `PRISM__<SECTION>__<KEY>` environment variables

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use prism_error::{ConfigError, PrismError, PrismResult};
use prism_models::{DEFAULT_ZHIPU_MODEL, RetryPolicy, ZHIPU_API_KEY_ENV};
use prism_pipeline::OutputLayout;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../prism.toml");

/// Chat model settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider name: `zhipu`, `openai` or any OpenAI-compatible service
    pub provider: String,
    /// Model identifier
    pub name: String,
    /// Chat-completions endpoint; provider default when unset
    pub endpoint: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// System message for every stage; built-in prompt when unset
    pub system_prompt: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Token cap per response
    pub max_tokens: Option<u32>,
    /// Requests per minute, 0 for unlimited
    pub requests_per_minute: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "zhipu".to_string(),
            name: DEFAULT_ZHIPU_MODEL.to_string(),
            endpoint: None,
            api_key_env: ZHIPU_API_KEY_ENV.to_string(),
            system_prompt: None,
            temperature: None,
            max_tokens: None,
            requests_per_minute: 0,
            timeout_secs: None,
        }
    }
}

/// Stage log persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Record stage logs in PostgreSQL
    pub enabled: bool,
    /// Environment variable holding the database URL
    pub url_env: String,
    /// Connection pool size
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_env: "DATABASE_URL".to_string(),
            pool_size: 4,
        }
    }
}

/// Top-level Prism configuration.
///
/// # Example
///
/// ```no_run
/// use prism::PrismConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PrismConfig::load(None)?;
/// println!("Model: {} via {}", config.model.name, config.model.provider);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PrismConfig {
    /// Chat model settings
    pub model: ModelConfig,
    /// Retry policy for transient provider errors
    pub retry: RetryPolicy,
    /// Stage log persistence
    pub database: DatabaseConfig,
    /// Artifact file names and output directory
    pub output: OutputLayout,
}

fn build(builder: ConfigBuilder<DefaultState>) -> PrismResult<PrismConfig> {
    builder
        .build()
        .map_err(|e| {
            PrismError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize()
        .map_err(|e| {
            PrismError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
}

impl PrismConfig {
    /// The bundled defaults alone.
    pub fn bundled() -> PrismResult<Self> {
        build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load a single configuration file over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> PrismResult<Self> {
        debug!("Loading configuration from file");
        build(Config::builder().add_source(File::from(path.as_ref())))
    }

    /// Load all layers, with `explicit` (from `--config`) above the
    /// discovered files and below the environment.
    ///
    /// Discovered files are optional; an explicit file must exist.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> PrismResult<Self> {
        debug!("Loading configuration: env > --config > ./prism.toml > home > bundled");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/prism/prism.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("prism").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("PRISM")
                .separator("__")
                .try_parsing(true),
        );

        build(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bundled_defaults_parse() {
        let config = PrismConfig::bundled().unwrap();
        assert_eq!(config.model.provider, "zhipu");
        assert_eq!(config.model.name, "glm-4-air");
        assert_eq!(config.model.api_key_env, "ZHIPUAI_API_KEY");
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.output, OutputLayout::default());
        assert!(config.database.enabled);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[model]\nname = \"glm-4-plus\"\ntemperature = 0.7\n\n[database]\nenabled = false\n\n[output]\ndir = \"runs\""
        )
        .unwrap();

        let config = PrismConfig::from_file(file.path()).unwrap();

        assert_eq!(config.model.name, "glm-4-plus");
        assert_eq!(config.model.temperature, Some(0.7));
        assert_eq!(config.model.provider, "zhipu");
        assert!(!config.database.enabled);
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(
            config.output.plan_path(),
            std::path::PathBuf::from("runs/story_plan.json")
        );
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[model\nname = ").unwrap();

        let err = PrismConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Configuration Error"));
    }

    #[test]
    fn test_explicit_file_overrides_bundled() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[retry]\nmax_retries = 0").unwrap();

        let config = PrismConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.retry.max_retries, 0);
    }
}
