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

//! Compiled transition table
//!
//! This module holds the fully resolved table a UDL grammar compiles to, and
//! the line-oriented wire format used to hand it to the runtime lexer:
//!
//! - `tag`: record tag constants shared by writer and reader
//! - `record`: one typed record per tag, plus table-to-record flattening
//! - `writer`: resource-stream and C-call-sequence renderers
//! - `reader`: resource-stream decoder back into a `CompiledTable`

pub mod reader;
pub mod record;
pub mod tag;
pub mod writer;

pub use reader::TableReader;
pub use record::{RecordBuilder, TableRecord};
pub use tag::TableTag;
pub use writer::{CallSequenceWriter, ResourceWriter, TableWriter};

use crate::family::Family;
use crate::style::StyleId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interned lexer state identifier. Allocation starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wire format version triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl TableVersion {
    /// Version written by this crate
    pub const CURRENT: TableVersion = TableVersion { major: 1, minor: 1, patch: 0 };
}

impl fmt::Display for TableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The complete table for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledTable {
    pub version: TableVersion,
    pub language: String,
    pub families: Vec<TableFamily>,
    /// Sorted by style
    pub unique_states: Vec<UniqueState>,
    /// Sorted by state id
    pub states: Vec<CompiledState>,
}

impl CompiledTable {
    /// Create an empty table for a language
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            version: TableVersion::CURRENT,
            language: language.into(),
            families: Vec::new(),
            unique_states: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Look up a family entry
    pub fn family(&self, family: Family) -> Option<&TableFamily> {
        self.families.iter().find(|f| f.family == family)
    }

    /// Look up a state block
    pub fn state(&self, id: StateId) -> Option<&CompiledState> {
        self.states.binary_search_by_key(&id, |s| s.id).ok().map(|index| &self.states[index])
    }

    /// Reverse lookup from a style to the one state it identifies
    pub fn unique_state_for_style(&self, style: StyleId) -> Option<StateId> {
        self.unique_states
            .binary_search_by_key(&style, |u| u.style)
            .ok()
            .map(|index| self.unique_states[index].state)
    }

    /// Total number of transitions across all states
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }
}

/// Per-family section of the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFamily {
    pub family: Family,
    pub initial_state: Option<StateId>,
    pub sublanguage: Option<String>,
    pub keyword_styles: Option<KeywordStyles>,
    pub keywords: Vec<String>,
    pub flippers: Vec<Flipper>,
    pub look_back: Option<LookBackTable>,
}

impl TableFamily {
    /// Create an empty family section
    pub fn new(family: Family) -> Self {
        Self {
            family,
            initial_state: None,
            sublanguage: None,
            keyword_styles: None,
            keywords: Vec::new(),
            flippers: Vec::new(),
            look_back: None,
        }
    }
}

/// Styles used for keyword promotion: identifiers painted with
/// `identifier` that appear in the keyword list are repainted `keyword`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordStyles {
    pub identifier: StyleId,
    pub keyword: StyleId,
}

/// Fold toggle: text painted with `style` changes the fold level by `value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flipper {
    pub text: String,
    pub style: StyleId,
    pub value: i32,
}

/// Look-back tests for one family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookBackTable {
    pub start_style: StyleId,
    pub end_style: StyleId,
    pub tests: Vec<LookBackTest>,
    pub default_action: TestAction,
}

/// Single look-back test, applied to the previous token painted `style`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookBackTest {
    pub style: StyleId,
    pub action: TestAction,
    pub selector: Selector,
}

/// Which tokens of the tested style a look-back test applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    #[default]
    All,
    Words(Vec<String>),
    Strings(Vec<String>),
}

/// Outcome of a look-back test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestAction {
    #[default]
    Accept,
    Reject,
    Skip,
}

impl TestAction {
    pub fn code(self) -> u8 {
        match self {
            TestAction::Accept => 1,
            TestAction::Reject => 2,
            TestAction::Skip => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TestAction::Accept),
            2 => Some(TestAction::Reject),
            3 => Some(TestAction::Skip),
            _ => None,
        }
    }
}

/// A style that identifies exactly one state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueState {
    pub style: StyleId,
    pub state: StateId,
}

/// Transition block of one state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledState {
    pub id: StateId,
    pub family: Family,
    /// Declaration order; the runtime takes the first match
    pub transitions: Vec<CompiledTransition>,
}

/// What a transition matches at the current position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    Literal(String),
    Regex { pattern: String, ignore_case: bool },
    Delimiter,
    Empty,
    Eof,
}

impl MatchKind {
    pub fn code(&self) -> u8 {
        match self {
            MatchKind::Literal(_) => 1,
            MatchKind::Regex { .. } => 2,
            MatchKind::Delimiter => 3,
            MatchKind::Empty => 4,
            MatchKind::Eof => 5,
        }
    }

    /// String payload carried through the scratch buffer, if any
    pub fn payload(&self) -> Option<&str> {
        match self {
            MatchKind::Literal(text) => Some(text),
            MatchKind::Regex { pattern, .. } => Some(pattern),
            _ => None,
        }
    }
}

/// State stack manipulation performed by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackOp {
    Push(StateId),
    Pop,
    Replace(StateId),
}

/// Delimiter register manipulation performed by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelimiterOp {
    /// Capture group `group` becomes the delimiter; `opposite` maps
    /// opening brackets to their closing counterpart
    Set { group: u32, opposite: bool },
    Clear,
    Keep,
}

/// Fully resolved transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledTransition {
    pub matcher: MatchKind,
    pub upto_style: Option<StyleId>,
    pub include_style: Option<StyleId>,
    pub redo: bool,
    pub target: Option<StateId>,
    pub token_check: bool,
    pub no_keyword: bool,
    pub stack_op: Option<StackOp>,
    pub eol_target: Option<StateId>,
    pub delimiter_op: Option<DelimiterOp>,
}

impl CompiledTransition {
    /// Transition with no commands for the given matcher
    pub fn new(matcher: MatchKind) -> Self {
        Self {
            matcher,
            upto_style: None,
            include_style: None,
            redo: false,
            target: None,
            token_check: false,
            no_keyword: false,
            stack_op: None,
            eol_target: None,
            delimiter_op: None,
        }
    }

    /// Whether the runtime case-folds the match
    pub fn ignore_case(&self) -> bool {
        matches!(self.matcher, MatchKind::Regex { ignore_case: true, .. })
    }
}
