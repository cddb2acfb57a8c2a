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

//! `luddite compile`: grammar tree to lexer table

use crate::config::ToolConfig;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use luddite_compiler::{CompilationPipeline, OutputFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Arguments for the compile command
#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    /// Grammar tree (JSON)
    #[arg(value_name = "GRAMMAR")]
    pub grammar: PathBuf,

    /// Output file; derived from the grammar name when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write language-detection metadata to this JSON file
    #[arg(long, value_name = "FILE")]
    pub detection_info: Option<PathBuf>,

    /// Fail on any warning
    #[arg(long)]
    pub strict: bool,

    /// Do not append end-of-buffer transitions
    #[arg(long)]
    pub no_eof_synthesis: bool,
}

/// Output format selection for CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Resource,
    CCalls,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Resource => OutputFormat::Resource,
            FormatArg::CCalls => OutputFormat::CCalls,
        }
    }
}

/// What a successful compile wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSummary {
    pub language: String,
    pub output: PathBuf,
    pub detection_info: Option<PathBuf>,
    pub states: usize,
    pub transitions: usize,
    pub warnings: usize,
}

/// Execute the compile command
pub fn run_compile(args: &CompileArgs) -> Result<CompileSummary> {
    let mut config = ToolConfig::resolve_config(args.config.clone())?;
    if let Some(format) = args.format {
        config.compiler.output_format = format.into();
    }
    if args.strict {
        config.compiler.warnings_as_errors = true;
    }
    if args.no_eof_synthesis {
        config.compiler.synthesize_eof = false;
    }
    debug!(?config, "Resolved configuration");

    let source = fs::read_to_string(&args.grammar)
        .with_context(|| format!("Failed to read grammar {}", args.grammar.display()))?;
    let pipeline = CompilationPipeline::new(config.compiler.clone())?;
    let output = pipeline
        .compile_json(&source)
        .with_context(|| format!("Failed to compile {}", args.grammar.display()))?;

    for diagnostic in &output.diagnostics {
        warn!("{}: {diagnostic}", args.grammar.display());
    }
    for (stage, elapsed) in &output.stage_times {
        debug!(stage, ?elapsed, "Stage time");
    }

    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => default_output_path(&args.grammar, &config),
    };
    fs::write(&output_path, &output.text).with_context(|| format!("Failed to write {}", output_path.display()))?;

    if let Some(path) = &args.detection_info {
        let json = serde_json::to_string_pretty(&output.detection)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let summary = CompileSummary {
        language: output.table.language.clone(),
        output: output_path,
        detection_info: args.detection_info.clone(),
        states: output.table.states.len(),
        transitions: output.table.transition_count(),
        warnings: output.diagnostics.len(),
    };
    info!(
        language = %summary.language,
        states = summary.states,
        transitions = summary.transitions,
        output = %summary.output.display(),
        "Wrote {} table",
        config.compiler.output_format
    );
    Ok(summary)
}

/// `<dir>/<grammar stem>.<extension>` for the configured format
pub fn default_output_path(grammar: &Path, config: &ToolConfig) -> PathBuf {
    let extension = match config.compiler.output_format {
        OutputFormat::Resource => &config.output.resource_extension,
        OutputFormat::CCalls => &config.output.c_calls_extension,
    };
    let stem = grammar.file_stem().unwrap_or(grammar.as_os_str());
    let directory = match &config.output.directory {
        Some(directory) => directory.as_path(),
        None => grammar.parent().unwrap_or(Path::new("")),
    };
    directory.join(stem).with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_conversion() {
        assert_eq!(OutputFormat::from(FormatArg::Resource), OutputFormat::Resource);
        assert_eq!(OutputFormat::from(FormatArg::CCalls), OutputFormat::CCalls);
    }

    #[test]
    fn test_default_output_path() {
        let mut config = ToolConfig::default();
        assert_eq!(
            default_output_path(Path::new("grammars/rhtml.json"), &config),
            PathBuf::from("grammars/rhtml.lexres")
        );
        config.compiler.output_format = OutputFormat::CCalls;
        config.output.directory = Some(PathBuf::from("out"));
        assert_eq!(default_output_path(Path::new("grammars/rhtml.json"), &config), PathBuf::from("out/rhtml.c"));
    }
}
