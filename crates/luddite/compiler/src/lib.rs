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

//! Luddite Compiler Library
//!
//! Compiles a parsed UDL grammar into the transition table read by the
//! runtime lexer. The stages are:
//!
//! - `processor`: records grammar declarations on a `CompilerSession`
//! - `analyzer`: semantic checks over the session
//! - `emitter`: builds and renders the `CompiledTable`
//! - `pipeline`: runs the stages in order

pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod grammar;
pub mod pipeline;
pub mod processor;
pub mod session;

pub use analyzer::SemanticAnalyzer;
pub use config::{CompilerConfig, OutputFormat};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use emitter::{EmittedTable, TableEmitter};
pub use error::{CompileError, CompileResult, GrammarError, GrammarResult, TransitionError};
pub use grammar::Grammar;
pub use pipeline::{CompilationOutput, CompilationPipeline, compile};
pub use processor::TreeProcessor;
pub use session::{CompilerSession, DetectionInfo};
