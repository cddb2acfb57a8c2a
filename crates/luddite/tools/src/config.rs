// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Tool configuration
//!
//! Loaded from a TOML file given with `--config` or `$LUDDITE_CONFIG`.
//! Command-line flags are applied on top by the subcommands.

use anyhow::{Context, Result};
use luddite_compiler::CompilerConfig;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "LUDDITE_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub compiler: CompilerConfig,
    pub output: OutputConfig,
}

/// Where compiled tables go when no output path is given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for default output paths; next to the grammar when unset
    pub directory: Option<PathBuf>,
    pub resource_extension: String,
    pub c_calls_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { directory: None, resource_extension: "lexres".to_string(), c_calls_extension: "c".to_string() }
    }
}

impl ToolConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Pick the configuration: the CLI path, then `$LUDDITE_CONFIG`, then defaults
    pub fn resolve_config(cli_config: Option<PathBuf>) -> Result<Self> {
        Self::resolve_from(cli_config, std::env::var_os(CONFIG_ENV))
    }

    pub fn resolve_from(cli_config: Option<PathBuf>, env_config: Option<OsString>) -> Result<Self> {
        let config = if let Some(config_path) = cli_config {
            Self::load_from_file(config_path)?
        } else if let Some(env_config) = env_config.filter(|value| !value.is_empty()) {
            Self::load_from_file(PathBuf::from(env_config))?
        } else {
            Self::default()
        };

        config.compiler.validate().map_err(anyhow::Error::msg).context("Invalid compiler configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luddite_compiler::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ToolConfig = toml::from_str("[compiler]\noutput_format = \"c-calls\"\n").unwrap();
        assert_eq!(config.compiler.output_format, OutputFormat::CCalls);
        assert_eq!(config.compiler.scratch_chunk_size, 128);
        assert_eq!(config.output.resource_extension, "lexres");
    }

    #[test]
    fn test_cli_path_wins_over_env() {
        let dir = TempDir::new().unwrap();
        let cli = dir.path().join("cli.toml");
        let env = dir.path().join("env.toml");
        std::fs::write(&cli, "[compiler]\nscratch_chunk_size = 16\n").unwrap();
        std::fs::write(&env, "[compiler]\nscratch_chunk_size = 32\n").unwrap();

        let config = ToolConfig::resolve_from(Some(cli), Some(env.clone().into_os_string())).unwrap();
        assert_eq!(config.compiler.scratch_chunk_size, 16);
        let config = ToolConfig::resolve_from(None, Some(env.into_os_string())).unwrap();
        assert_eq!(config.compiler.scratch_chunk_size, 32);
        assert_eq!(ToolConfig::resolve_from(None, None).unwrap(), ToolConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[compiler]\npattern_substitution_limit = 0\n").unwrap();
        assert!(ToolConfig::resolve_from(Some(path), None).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("luddite.toml");
        let mut config = ToolConfig::default();
        config.compiler.warnings_as_errors = true;
        config.save_to_file(&path).unwrap();
        assert_eq!(ToolConfig::load_from_file(&path).unwrap(), config);
    }
}
