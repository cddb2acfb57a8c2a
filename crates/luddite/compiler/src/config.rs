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

//! Configuration for table compilation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering of the emitted table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Line-oriented resource stream
    #[default]
    Resource,
    /// C function replaying builder calls
    CCalls,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Resource => f.write_str("resource"),
            OutputFormat::CCalls => f.write_str("c-calls"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "resource" | "res" => Ok(OutputFormat::Resource),
            "c-calls" | "ccalls" | "c" => Ok(OutputFormat::CCalls),
            other => Err(format!("Unknown output format '{other}' (expected resource or c-calls)")),
        }
    }
}

/// Configuration for a compilation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// How the table is rendered
    pub output_format: OutputFormat,

    /// Maximum number of `$NAME` expansion passes per regex
    pub pattern_substitution_limit: usize,

    /// Maximum bytes staged by one scratch-buffer record
    pub scratch_chunk_size: usize,

    /// Whether to append `\z` transitions to states that can take one
    pub synthesize_eof: bool,

    /// Whether any warning fails the run
    pub warnings_as_errors: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Resource,
            pattern_substitution_limit: 10,
            scratch_chunk_size: 128,
            synthesize_eof: true,
            warnings_as_errors: false,
        }
    }
}

impl CompilerConfig {
    /// Configuration that fails on any warning
    pub fn strict() -> Self {
        Self { warnings_as_errors: true, ..Default::default() }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_pattern_substitution_limit(mut self, limit: usize) -> Self {
        self.pattern_substitution_limit = limit;
        self
    }

    pub fn with_scratch_chunk_size(mut self, size: usize) -> Self {
        self.scratch_chunk_size = size;
        self
    }

    pub fn with_eof_synthesis(mut self, enabled: bool) -> Self {
        self.synthesize_eof = enabled;
        self
    }

    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.pattern_substitution_limit == 0 {
            return Err("Pattern substitution limit must be greater than 0".to_string());
        }

        // A chunk must hold any single UTF-8 character
        if self.scratch_chunk_size < 4 {
            return Err("Scratch chunk size must be at least 4 bytes".to_string());
        }

        Ok(())
    }
}
