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

//! Compilation pipeline
//!
//! Runs the stages in order on a fresh session: process tree, semantic
//! check, emit. A failing stage stops the run.

use crate::analyzer::SemanticAnalyzer;
use crate::config::CompilerConfig;
use crate::diagnostics::Diagnostic;
use crate::emitter::TableEmitter;
use crate::error::{CompileError, CompileResult};
use crate::grammar::Grammar;
use crate::processor::TreeProcessor;
use crate::session::{CompilerSession, DetectionInfo};
use luddite_common::{CompiledTable, Family};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Everything a successful run produces
#[derive(Debug, Clone)]
pub struct CompilationOutput {
    pub table: CompiledTable,
    /// Rendered in the configured output format
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
    pub detection: DetectionInfo,
    pub stage_times: HashMap<&'static str, Duration>,
}

/// Grammar-to-table compiler
pub struct CompilationPipeline {
    config: CompilerConfig,
}

impl CompilationPipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: CompilerConfig) -> CompileResult<Self> {
        config.validate().map_err(CompileError::Configuration)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a grammar tree
    pub fn compile(&self, grammar: &Grammar) -> CompileResult<CompilationOutput> {
        let mut session = CompilerSession::new();
        let mut stage_times = HashMap::new();

        let started = Instant::now();
        TreeProcessor::new(&mut session)
            .with_eof_synthesis(self.config.synthesize_eof)
            .process_tree(&grammar.nodes, Family::Markup)?;
        stage_times.insert("process", started.elapsed());
        info!(states = session.state_count(), "Processed grammar tree");

        let started = Instant::now();
        SemanticAnalyzer::new(&session).semantic_check()?;
        stage_times.insert("analyze", started.elapsed());

        let started = Instant::now();
        let emitted = TableEmitter::new(self.config.clone()).emit(&mut session)?;
        stage_times.insert("emit", started.elapsed());

        let (diagnostics, detection) = session.into_reports();
        if self.config.warnings_as_errors && !diagnostics.is_empty() {
            warn!(count = diagnostics.len(), "Warnings treated as errors");
            return Err(CompileError::WarningsAsErrors(diagnostics.len()));
        }

        Ok(CompilationOutput {
            table: emitted.table,
            text: emitted.text,
            diagnostics: diagnostics.into_vec(),
            detection,
            stage_times,
        })
    }

    /// Compile a grammar tree given as JSON
    pub fn compile_json(&self, text: &str) -> CompileResult<CompilationOutput> {
        let grammar = Grammar::from_json(text)?;
        self.compile(&grammar)
    }
}

/// Compile with a one-off pipeline
pub fn compile(grammar: &Grammar, config: &CompilerConfig) -> CompileResult<CompilationOutput> {
    CompilationPipeline::new(config.clone())?.compile(grammar)
}
