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

//! Error types for grammar compilation

use crate::grammar::PaintMode;
use luddite_common::{Family, TableFormatError};
use thiserror::Error;

/// Command combinations a single transition cannot carry
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("a transition cannot both push and pop the state stack")]
    PushAndPop,

    #[error("at most one push, pop or replace command is allowed")]
    MultipleStackOps,

    #[error("at most one delimiter command is allowed")]
    MultipleDelimiterOps,

    #[error("at most one at_eol command is allowed")]
    MultipleAtEol,

    #[error("more than one paint({0:?}) command")]
    DuplicatePaint(PaintMode),
}

/// Fatal problems with the grammar definition itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("Unknown family '{0}' (expected one of markup, css, csl, ssl, tpl)")]
    UnknownFamily(String),

    #[error("State '{0}' is referenced but never defined in any state block")]
    DanglingState(String),

    #[error("State '{0}' has more than one state block")]
    DuplicateStateBlock(String),

    #[error("Pattern '{name}' in family {family} redefined: '{existing}' vs '{new}'")]
    ConflictingPattern { family: Family, name: String, existing: String, new: String },

    #[error("Language name declared twice: '{existing}' vs '{new}'")]
    ConflictingLanguage { existing: String, new: String },

    #[error("Sublanguage of family {family} declared twice: '{existing}' vs '{new}'")]
    ConflictingSublanguage { family: Family, existing: String, new: String },

    #[error("Family {family} has look-back tests but no {missing} declaration")]
    LookBackWithoutStyle { family: Family, missing: &'static str },

    #[error("Family {0} has a keyword list but no keyword_style declaration")]
    KeywordsWithoutStyle(Family),

    #[error("No language name was declared")]
    MissingLanguage,

    #[error("Unknown style '{style}' used by {context}")]
    UnknownStyle { style: String, context: String },

    #[error("Invalid transition in state '{state}': {reason}")]
    InvalidTransition { state: String, reason: TransitionError },

    #[error("Semantic check failed:\n{}", format_failures(.0))]
    SemanticCheck(Vec<GrammarError>),
}

fn format_failures(failures: &[GrammarError]) -> String {
    failures.iter().map(|f| format!("  - {f}")).collect::<Vec<_>>().join("\n")
}

impl GrammarError {
    /// Individual failures, flattening a semantic-check batch
    pub fn failures(&self) -> Vec<&GrammarError> {
        match self {
            GrammarError::SemanticCheck(inner) => inner.iter().collect(),
            other => vec![other],
        }
    }
}

/// Result type for grammar processing operations
pub type GrammarResult<T> = Result<T, GrammarError>;

/// Errors that can stop a compilation run
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("Failed to load grammar: {0}")]
    GrammarLoad(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Table format error: {0}")]
    Table(#[from] TableFormatError),

    #[error("{0} warning(s) treated as errors")]
    WarningsAsErrors(usize),
}

/// Result type for compilation runs
pub type CompileResult<T> = Result<T, CompileError>;
