//! Configuration management for Quire.
//!
//! Parses `quire.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Expansion
//!
//! Path values support home directory and environment variable expansion:
//!
//! - `~/...` - expands to the home directory
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `content.dir`
//! - `manifest.output`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override manifest output path.
    pub manifest_output: Option<PathBuf>,
    /// Override title sorting.
    pub sort_by_title: Option<bool>,
    /// Override category grouping.
    pub group_by_category: Option<bool>,
    /// Override description inclusion.
    pub include_description: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "quire.toml";

/// Default content directory, relative to the project directory.
const DEFAULT_CONTENT_DIR: &str = "content";

/// Default manifest path, relative to the project directory.
const DEFAULT_MANIFEST_OUTPUT: &str = ".quire/manifest.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Navigation configuration.
    pub navigation: NavigationConfig,
    /// Manifest configuration (paths are relative strings from TOML).
    manifest: ManifestConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved manifest configuration (set after loading).
    #[serde(skip)]
    pub manifest_resolved: ManifestConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    dir: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Content root scanned for `.mdx`/`.tsx` files.
    pub dir: PathBuf,
    /// Project directory (the directory of the config file).
    pub project_dir: PathBuf,
}

/// Navigation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Sort items by title.
    pub sort_by_title: bool,
    /// Group flat navigation by category.
    pub group_by_category: bool,
    /// Include front-matter descriptions.
    pub include_description: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            sort_by_title: true,
            group_by_category: false,
            include_description: false,
        }
    }
}

/// Raw manifest configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ManifestConfigRaw {
    output: Option<String>,
}

/// Resolved manifest configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ManifestConfig {
    /// Manifest file path.
    pub output: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quire.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()?;
        Self::load_in(&cwd, config_path, cli_settings)
    }

    /// Same as [`Config::load`], with discovery and defaults based on `cwd`.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load_in(
        cwd: &Path,
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config(cwd) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(cwd)
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_dir) = &settings.content_dir {
            self.content_resolved.dir.clone_from(content_dir);
        }
        if let Some(output) = &settings.manifest_output {
            self.manifest_resolved.output.clone_from(output);
        }
        if let Some(sort_by_title) = settings.sort_by_title {
            self.navigation.sort_by_title = sort_by_title;
        }
        if let Some(group_by_category) = settings.group_by_category {
            self.navigation.group_by_category = group_by_category;
        }
        if let Some(include_description) = settings.include_description {
            self.navigation.include_description = include_description;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            navigation: NavigationConfig::default(),
            manifest: ManifestConfigRaw::default(),
            content_resolved: ContentConfig {
                dir: base.join(DEFAULT_CONTENT_DIR),
                project_dir: base.to_path_buf(),
            },
            manifest_resolved: ManifestConfig {
                output: base.join(DEFAULT_MANIFEST_OUTPUT),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand before validation so empty expansions are caught
        config.expand_values()?;
        config.validate()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.content.dir {
            require_non_empty(dir, "content.dir")?;
        }
        if let Some(output) = &self.manifest.output {
            require_non_empty(output, "manifest.output")?;
        }
        Ok(())
    }

    /// Expand `~` and environment variable references in path values.
    fn expand_values(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.content.dir {
            self.content.dir = Some(expand::expand_value(dir, "content.dir")?);
        }
        if let Some(ref output) = self.manifest.output {
            self.manifest.output = Some(expand::expand_value(output, "manifest.output")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Absolute values (including expanded `~` paths) are kept as they are.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content_resolved = ContentConfig {
            dir: resolve(self.content.dir.as_deref(), DEFAULT_CONTENT_DIR),
            project_dir: config_dir.to_path_buf(),
        };
        self.manifest_resolved = ManifestConfig {
            output: resolve(self.manifest.output.as_deref(), DEFAULT_MANIFEST_OUTPUT),
        };
    }
}
