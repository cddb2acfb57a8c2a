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

//! Non-fatal build diagnostics
//!
//! Warnings never stop table emission on their own. Each one is logged when
//! recorded and kept on the session so callers can report or escalate them.

use luddite_common::Family;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Category of a build warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A state got no synthetic end-of-buffer transition
    EofSynthesisSkipped,
    /// A `$NAME` reference in a regex names no pattern
    UnresolvedPatternVariable,
    /// Pattern expansion was still changing when the iteration limit hit
    PatternSubstitutionLimit,
    /// A later declaration lost to an earlier one
    IgnoredDeclaration,
}

/// One recorded warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub family: Option<Family>,
    pub state: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.state, self.family) {
            (Some(state), _) => write!(f, "state {state}: {}", self.message),
            (None, Some(family)) => write!(f, "family {family}: {}", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

/// Ordered collection of warnings
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and mirror it to the log
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(kind = ?diagnostic.kind, "{diagnostic}");
        self.items.push(diagnostic);
    }

    /// Record a warning about a state
    pub fn state_warning(&mut self, kind: DiagnosticKind, state: &str, message: impl Into<String>) {
        self.push(Diagnostic { kind, message: message.into(), family: None, state: Some(state.to_string()) });
    }

    /// Record a warning about a family
    pub fn family_warning(&mut self, kind: DiagnosticKind, family: Family, message: impl Into<String>) {
        self.push(Diagnostic { kind, message: message.into(), family: Some(family), state: None });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Number of warnings of one kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
