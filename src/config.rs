//! Configuration management for humboldt.
//!
//! This module handles the layered configuration system with the following
//! precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{HumboldtError, Result};

/// Command-line arguments for humboldt
#[derive(Parser, Debug)]
#[command(name = "humboldt")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Content root directory all relative declaration paths resolve against
    pub content_root: PathBuf,

    /// Path to a JSON declaration table (built-in table when omitted)
    #[arg(short, long, env = "HUMBOLDT_DECLARATIONS")]
    pub declarations: Option<PathBuf>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "HUMBOLDT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HUMBOLDT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Print the client configuration snippet for one dataset and exit
    #[arg(long, value_name = "KEY")]
    pub dump: Option<String>,
}

/// Data loading configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Content root directory
    #[serde(default)]
    pub content_root: Option<PathBuf>,

    /// Path to a JSON declaration table
    #[serde(default)]
    pub declarations: Option<PathBuf>,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence.
    ///
    /// Returns the merged config together with the parsed arguments, since
    /// `--dump` only makes sense at the CLI layer.
    pub fn load() -> Result<(Self, Args)> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args))
    }

    /// Build the merged config for already-parsed arguments.
    pub fn from_args(args: &Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        config.data.content_root = Some(args.content_root.clone());
        if args.declarations.is_some() {
            config.data.declarations = args.declarations.clone();
        }
        config.log_level = args.log_level.clone();

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.data.content_root.is_some() {
            self.data.content_root = other.data.content_root;
        }
        if other.data.declarations.is_some() {
            self.data.declarations = other.data.declarations;
        }
        self.log_level = other.log_level;
    }

    /// The configured content root.
    pub fn content_root(&self) -> Result<&PathBuf> {
        self.data
            .content_root
            .as_ref()
            .ok_or_else(|| HumboldtError::Config {
                message: "No content root configured".to_string(),
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let root = self.content_root()?;
        if !root.is_dir() {
            return Err(HumboldtError::Config {
                message: format!("Content root {} is not a directory", root.display()),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(HumboldtError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            log_level: default_log_level(),
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    "info".to_string()
}
