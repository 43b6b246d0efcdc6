//! Configuration management for layerbudget
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.layerbudget/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{AllocatorError, Result};
use crate::solver::SolverChoice;

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub dynamic: DynamicConfig,
    #[serde(default)]
    pub exhaustive: ExhaustiveConfig,
}

/// Solver selection and scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Solver used when the caller does not pick one
    pub default: SolverChoice,
    /// Auto mode enumerates below this many configurations
    pub auto_threshold: u64,
    pub parallel: bool,
    /// Worker threads; 0 uses every CPU
    pub workers: usize,
}

/// DP discretization limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicConfig {
    /// Finest grid tried is 10^-max_decimals
    pub max_decimals: u32,
    /// Upper bound on cells per DP row. The DP keeps every row, 24 bytes
    /// per cell, so memory is roughly `layers × max_budget_cells × 24`.
    pub max_budget_cells: u64,
}

/// Enumeration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhaustiveConfig {
    /// Configurations visited between cancellation checks
    pub cancel_check_interval: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            default: SolverChoice::Auto,
            auto_threshold: 10_000,
            parallel: true,
            workers: 0,
        }
    }
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            max_decimals: 6,
            max_budget_cells: 1_000_000,
        }
    }
}

impl Default for ExhaustiveConfig {
    fn default() -> Self {
        Self {
            cancel_check_interval: 4096,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AllocatorError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AllocatorError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location or fall back to built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".layerbudget").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.solver.auto_threshold == 0 {
            return Err(AllocatorError::ConfigError(
                "auto_threshold must be greater than 0".to_string(),
            ));
        }

        if self.dynamic.max_decimals > 12 {
            return Err(AllocatorError::ConfigError(
                "max_decimals must be at most 12".to_string(),
            ));
        }

        if self.dynamic.max_budget_cells == 0 {
            return Err(AllocatorError::ConfigError(
                "max_budget_cells must be greater than 0".to_string(),
            ));
        }

        if self.exhaustive.cancel_check_interval == 0 {
            return Err(AllocatorError::ConfigError(
                "cancel_check_interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Worker count with 0 resolved to the CPU count
    pub fn worker_threads(&self) -> usize {
        if self.solver.workers == 0 {
            num_cpus::get()
        } else {
            self.solver.workers
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AllocatorError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AllocatorError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AllocatorError::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}
