//! Configuration File Loading
//!
//! Handles loading and saving configuration files from various locations
//! with support for multiple formats and fallback mechanisms.

use super::Config;
use crate::error::{Error, Result};
use crate::platform::Platform;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SCRIPTDECK_CONFIG";

/// Configuration file loader
pub struct ConfigLoader {
    /// File named by `SCRIPTDECK_CONFIG`, loaded as is
    explicit_path: Option<PathBuf>,
    /// Search paths for configuration files (without extension)
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats
    supported_formats: Vec<ConfigFormat>,
    /// Current configuration file path (if loaded)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to the default config if none exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            explicit_path: env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Load configuration with default options
    pub fn load() -> Result<Config> {
        Self::load_with_options(LoadOptions::default())
    }

    /// Load configuration with custom options
    pub fn load_with_options(options: LoadOptions) -> Result<Config> {
        let mut loader = Self::new();
        loader.load_from_search_paths(&options)
    }

    /// Load configuration from an explicit file; the format follows the extension
    pub fn load_from_path(path: &Path) -> Result<Config> {
        let loader = Self::new();
        let format = super::utils::get_config_format(path).unwrap_or(ConfigFormat::Toml);
        let config = loader
            .load_config_file(path, format)
            .map_err(|e| match e {
                Error::Io(io) => Error::ConfigLoadFailed {
                    path: path.to_path_buf(),
                    reason: io.to_string(),
                },
                other => other,
            })?;
        loader.validate_config(&config)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load the explicit file if one is set, otherwise search the configured paths
    ///
    /// An explicit file that is missing or broken is an error, never a fallback.
    pub fn load_from_search_paths(&mut self, options: &LoadOptions) -> Result<Config> {
        if let Some(path) = self.explicit_path.clone() {
            let config = Self::load_from_path(&path)?;
            self.current_path = Some(path);
            return Ok(config);
        }

        if let Some((path, config)) = self.find_and_load_config()? {
            info!("Configuration loaded from {}", path.display());
            self.current_path = Some(path);

            if options.validate {
                self.validate_config(&config)?;
            }

            return Ok(config);
        }

        if options.create_default {
            debug!("No configuration file found, using defaults");
            let config = Config::default();
            if options.validate {
                self.validate_config(&config)?;
            }
            Ok(config)
        } else {
            Err(Error::ConfigNotFound)
        }
    }

    /// Save configuration to the current path or default location
    pub fn save(&self, config: &Config) -> Result<PathBuf> {
        let path = self
            .current_path
            .clone()
            .unwrap_or_else(Self::default_config_path);

        self.save_to_path(config, &path)?;
        Ok(path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::ConfigSaveFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let format = super::utils::get_config_format(path).unwrap_or(ConfigFormat::Toml);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content).map_err(|e| Error::ConfigSaveFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Result<Option<(PathBuf, Config)>> {
        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = self.get_config_path_for_format(path, *format);

                if config_path.exists() {
                    match self.load_config_file(&config_path, *format) {
                        Ok(config) => return Ok(Some((config_path, config))),
                        Err(e) => {
                            // Keep searching; a broken file should not hide a later one
                            warn!(
                                "Failed to load config from {}: {}",
                                config_path.display(),
                                e
                            );
                            continue;
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    /// Load a specific configuration file
    fn load_config_file(&self, path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path)?;

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            }),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Get configuration file path for a specific format
    fn get_config_path_for_format(&self, base_path: &Path, format: ConfigFormat) -> PathBuf {
        base_path.with_extension(format.extension())
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current working directory, next to the scripts folder
        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join("scriptdeck"));
        }

        if let Ok(config_dir) = Platform::paths().config_dir() {
            paths.push(config_dir.join("scriptdeck").join("config"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".scriptdeck").join("config"));
        }

        paths
    }

    /// Where `save` writes when no file was loaded
    pub fn default_config_path() -> PathBuf {
        Platform::paths()
            .config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("scriptdeck")
            .join("config.toml")
    }

    /// Validate configuration
    pub fn validate_config(&self, config: &Config) -> Result<()> {
        if config.paths.scripts_dir.as_os_str().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "paths.scripts_dir".to_string(),
                reason: "Scripts folder cannot be empty".to_string(),
            });
        }

        if config.paths.logs_dir.as_os_str().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "paths.logs_dir".to_string(),
                reason: "Logs folder cannot be empty".to_string(),
            });
        }

        if config.interpreter.program.as_os_str().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "interpreter.program".to_string(),
                reason: "Interpreter program cannot be empty".to_string(),
            });
        }

        let extension = config.interpreter.extension.trim();
        if extension.is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "interpreter.extension".to_string(),
                reason: "Script extension cannot be empty".to_string(),
            });
        }

        if extension.starts_with('.') || extension.contains(['/', '\\']) {
            return Err(Error::ConfigValidationFailed {
                field: "interpreter.extension".to_string(),
                reason: "Script extension must be a bare suffix such as 'ps1'".to_string(),
            });
        }

        Ok(())
    }

    /// Get the current configuration file path
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Clear all search paths and add a single path
    pub fn set_search_path(&mut self, path: PathBuf) {
        self.explicit_path = None;
        self.search_paths = vec![path];
    }

    /// Load exactly `path` instead of searching
    pub fn set_explicit_path(&mut self, path: PathBuf) {
        self.explicit_path = Some(path);
    }

    /// The explicit file, if any
    pub fn explicit_path(&self) -> Option<&Path> {
        self.explicit_path.as_deref()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
