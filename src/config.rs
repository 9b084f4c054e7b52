//! YAML configuration
//!
//! Every section and field is optional in the file; missing values take the
//! defaults below. Validation failures are fatal for the run.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Locations searched when no explicit config path is given
pub const CONFIG_CANDIDATES: &[&str] = &[
    "configs/default.yaml",
    "config.yaml",
    "code-telescope.yaml",
];

/// Providers `llm.provider` may name; `none` disables descriptions
pub const SUPPORTED_PROVIDERS: &[&str] = &["openai", "anthropic", "none"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub filesystem: FilesystemConfig,
    pub parser: ParserConfig,
    pub llm: LlmConfig,
    pub markdown: MarkdownConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesystemConfig {
    /// Matched against the file name
    pub include_patterns: Vec<String>,
    /// Matched against the relative path and the file name
    pub exclude_patterns: Vec<String>,
    pub max_depth: usize,
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            include_patterns: [
                "*.go", "*.js", "*.jsx", "*.mjs", "*.cjs", "*.ts", "*.tsx", "*.mts", "*.cts",
                "*.py", "*.pyw",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            exclude_patterns: [
                "*_test.go",
                "test_*.py",
                "**/test/**",
                "**/node_modules/**",
                "**/vendor/**",
                "**/dist/**",
                "**/build/**",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            max_depth: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    /// Describe private callables too
    pub parse_private_methods: bool,
    /// Files above this size (bytes) are skipped by the scanner
    pub max_file_size: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            parse_private_methods: false,
            max_file_size: 1_048_576,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub batch_size: usize,
    /// Seconds to wait between consecutive batch requests
    pub batch_delay: u64,
    pub max_context_length: usize,
    /// Falls back to the provider's environment variable when unset
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
    pub summarize_files: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
            batch_size: 5,
            batch_delay: 1,
            max_context_length: 8000,
            api_key: None,
            base_url: None,
            timeout_seconds: 30,
            summarize_files: false,
        }
    }
}

impl LlmConfig {
    /// Environment variable consulted for the provider's key
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self.provider.as_str() {
            "openai" => Some("OPENAI_API_KEY"),
            "anthropic" => Some("ANTHROPIC_API_KEY"),
            _ => None,
        }
    }

    /// Configured key, else the provider's environment variable
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.api_key_env_var()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|k| !k.trim().is_empty())
            })
    }

    pub fn is_disabled(&self) -> bool {
        self.provider == "none"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkdownConfig {
    pub include_toc: bool,
    pub include_file_info: bool,
    pub max_method_description_length: usize,
    pub group_methods_by_type: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            include_toc: true,
            include_file_info: true,
            max_method_description_length: 200,
            group_methods_by_type: true,
        }
    }
}

impl Config {
    /// Load and validate a YAML config file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // An empty file deserializes to `null`
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Explicit path if given, else the first existing candidate under
    /// `base_dir`, else defaults
    pub fn discover(explicit: Option<&Path>, base_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        match find_config_file(base_dir) {
            Some(path) => {
                info!("Using configuration file {}", path.display());
                Self::load_from_path(path)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unsupported llm.provider '{}' (expected one of: {})",
                self.llm.provider,
                SUPPORTED_PROVIDERS.join(", ")
            )));
        }
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be within [0, 1], got {}",
                self.llm.temperature
            )));
        }
        if self.llm.batch_size < 1 {
            return Err(ConfigError::Invalid(
                "llm.batch_size must be at least 1".to_string(),
            ));
        }
        if self.llm.max_tokens < 1 {
            return Err(ConfigError::Invalid(
                "llm.max_tokens must be at least 1".to_string(),
            ));
        }
        if self.filesystem.max_depth < 1 {
            return Err(ConfigError::Invalid(
                "filesystem.max_depth must be at least 1".to_string(),
            ));
        }

        for pattern in self
            .filesystem
            .include_patterns
            .iter()
            .chain(&self.filesystem.exclude_patterns)
        {
            glob::Pattern::new(pattern).map_err(|e| {
                ConfigError::Invalid(format!("invalid file pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}

fn find_config_file(base_dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| base_dir.join(candidate))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.batch_size, 5);
        assert_eq!(config.llm.max_context_length, 8000);
        assert_eq!(config.parser.max_file_size, 1_048_576);
        assert_eq!(config.filesystem.max_depth, 10);
        assert!(config.markdown.include_toc);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "llm:\n  provider: anthropic\n  batch_size: 3\nmarkdown:\n  include_toc: false\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.batch_size, 3);
        assert_eq!(config.llm.temperature, 0.3);
        assert!(!config.markdown.include_toc);
        assert!(config.markdown.include_file_info);
        assert_eq!(config.filesystem, FilesystemConfig::default());
    }

    #[test]
    fn empty_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap(), Config::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        config.llm.provider = "cohere".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.llm.temperature = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filesystem.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filesystem.exclude_patterns.push("[unclosed".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.provider = "none".to_string();
        assert!(config.validate().is_ok());
        assert!(config.llm.is_disabled());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "llm: [unterminated\n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::discover(Some(&dir.path().join("absent.yaml")), dir.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn discovery_order() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::discover(None, dir.path()).unwrap(), Config::default());

        fs::write(dir.path().join("code-telescope.yaml"), "llm:\n  batch_size: 9\n").unwrap();
        assert_eq!(Config::discover(None, dir.path()).unwrap().llm.batch_size, 9);

        fs::write(dir.path().join("config.yaml"), "llm:\n  batch_size: 7\n").unwrap();
        assert_eq!(Config::discover(None, dir.path()).unwrap().llm.batch_size, 7);

        fs::create_dir(dir.path().join("configs")).unwrap();
        fs::write(dir.path().join("configs/default.yaml"), "llm:\n  batch_size: 2\n").unwrap();
        assert_eq!(Config::discover(None, dir.path()).unwrap().llm.batch_size, 2);
    }

    #[test]
    fn explicit_api_key_wins() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("sk-test"));
        assert_eq!(config.api_key_env_var(), Some("OPENAI_API_KEY"));

        let none = LlmConfig {
            provider: "none".to_string(),
            ..Default::default()
        };
        assert_eq!(none.api_key_env_var(), None);
    }
}
