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

//! Typed wire records
//!
//! A `CompiledTable` is flattened into a sequence of `TableRecord`s before it
//! is rendered by a writer, and the reader decodes lines back into records.

use super::tag::TableTag;
use super::{
    CompiledTable, CompiledTransition, DelimiterOp, KeywordStyles, MatchKind, Selector, StackOp, StateId, TableVersion,
    TestAction, UniqueState,
};
use crate::error::{TableFormatError, TableResult};
use crate::family::Family;
use crate::style::StyleId;

/// Default maximum number of bytes staged by one scratch-buffer record
pub const DEFAULT_CHUNK_SIZE: usize = 128;

/// Fixed part of an appended transition; the match payload, if any, is
/// taken from the scratch buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionHeader {
    pub match_code: u8,
    pub upto_style: Option<StyleId>,
    pub include_style: Option<StyleId>,
    pub redo: bool,
    pub target: Option<StateId>,
    pub token_check: bool,
    pub ignore_case: bool,
    pub no_keyword: bool,
}

impl TransitionHeader {
    fn from_transition(transition: &CompiledTransition) -> Self {
        Self {
            match_code: transition.matcher.code(),
            upto_style: transition.upto_style,
            include_style: transition.include_style,
            redo: transition.redo,
            target: transition.target,
            token_check: transition.token_check,
            ignore_case: transition.ignore_case(),
            no_keyword: transition.no_keyword,
        }
    }

    /// Whether this transition kind carries a scratch-buffer payload
    pub fn has_payload(&self) -> bool {
        matches!(self.match_code, 1 | 2)
    }
}

/// One line of the table stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRecord {
    Version(TableVersion),
    ScratchBufferStart(String),
    ScratchBufferAppend(String),
    Language,
    FamilyInfo { family: Family, initial_state: Option<StateId> },
    FamilySublanguage { family: Family },
    FamilyColor { family: Family, styles: KeywordStyles },
    FamilyKeyword { family: Family },
    FlipperCount { family: Family, count: usize },
    FamilyOperator { family: Family, index: usize, value: i32 },
    FamilyStyle { family: Family, index: usize, style: StyleId },
    LookBackCreate { family: Family },
    LookBackInit { family: Family, start_style: StyleId, end_style: StyleId },
    LookBackCount { family: Family, count: usize },
    LookBackGet { family: Family, index: usize },
    LookBackActionStyle { family: Family, index: usize, action: TestAction, style: StyleId },
    LookBackWordlist { family: Family, index: usize },
    LookBackStrings { family: Family, index: usize },
    LookBackTest { family: Family, index: usize },
    LookBackDefault { family: Family, action: TestAction },
    UniqueState(UniqueState),
    TransitionBlockCreate { state: StateId, family: Family },
    TransitionBlockGet { state: StateId },
    TransitionAppend(TransitionHeader),
    PushState(StateId),
    PopState,
    ReplaceState(StateId),
    EolTransition(StateId),
    DelimiterSet { group: u32, opposite: bool },
    DelimiterClear,
    DelimiterKeep,
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> String {
    if value { "1".to_string() } else { "0".to_string() }
}

impl TableRecord {
    /// Tag of this record
    pub fn tag(&self) -> TableTag {
        use TableRecord::*;
        match self {
            Version(_) => TableTag::Version,
            ScratchBufferStart(_) => TableTag::ScratchBufferStart,
            ScratchBufferAppend(_) => TableTag::ScratchBufferAppend,
            Language => TableTag::Language,
            FamilyInfo { .. } => TableTag::FamilyInfo,
            FamilySublanguage { .. } => TableTag::FamilySublanguage,
            FamilyColor { .. } => TableTag::FamilyColor,
            FamilyKeyword { .. } => TableTag::FamilyKeyword,
            FlipperCount { .. } => TableTag::FlipperCount,
            FamilyOperator { .. } => TableTag::FamilyOperator,
            FamilyStyle { .. } => TableTag::FamilyStyle,
            LookBackCreate { .. } => TableTag::LookBackCreate,
            LookBackInit { .. } => TableTag::LookBackInit,
            LookBackCount { .. } => TableTag::LookBackCount,
            LookBackGet { .. } => TableTag::LookBackGet,
            LookBackActionStyle { .. } => TableTag::LookBackActionStyle,
            LookBackWordlist { .. } => TableTag::LookBackWordlist,
            LookBackStrings { .. } => TableTag::LookBackStrings,
            LookBackTest { .. } => TableTag::LookBackTest,
            LookBackDefault { .. } => TableTag::LookBackDefault,
            UniqueState(_) => TableTag::UniqueState,
            TransitionBlockCreate { .. } => TableTag::TransitionBlockCreate,
            TransitionBlockGet { .. } => TableTag::TransitionBlockGet,
            TransitionAppend(_) => TableTag::TransitionAppend,
            PushState(_) => TableTag::PushState,
            PopState => TableTag::PopState,
            ReplaceState(_) => TableTag::ReplaceState,
            EolTransition(_) => TableTag::EolTransition,
            DelimiterSet { .. } => TableTag::DelimiterSet,
            DelimiterClear => TableTag::DelimiterClear,
            DelimiterKeep => TableTag::DelimiterKeep,
        }
    }

    /// Scratch-buffer text carried by this record
    pub fn text(&self) -> Option<&str> {
        match self {
            TableRecord::ScratchBufferStart(text) | TableRecord::ScratchBufferAppend(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric fields in wire order. Scratch records have none; their text
    /// is rendered separately by each writer.
    pub fn fields(&self) -> Vec<String> {
        use TableRecord::*;
        match self {
            Version(v) => vec![v.major.to_string(), v.minor.to_string(), v.patch.to_string()],
            ScratchBufferStart(_) | ScratchBufferAppend(_) | Language => Vec::new(),
            FamilyInfo { family, initial_state } => vec![family.code().to_string(), opt(*initial_state)],
            FamilySublanguage { family } | FamilyKeyword { family } | LookBackCreate { family } => {
                vec![family.code().to_string()]
            }
            FamilyColor { family, styles } => {
                vec![family.code().to_string(), styles.identifier.to_string(), styles.keyword.to_string()]
            }
            FlipperCount { family, count } | LookBackCount { family, count } => {
                vec![family.code().to_string(), count.to_string()]
            }
            FamilyOperator { family, index, value } => {
                vec![family.code().to_string(), index.to_string(), value.to_string()]
            }
            FamilyStyle { family, index, style } => {
                vec![family.code().to_string(), index.to_string(), style.to_string()]
            }
            LookBackInit { family, start_style, end_style } => {
                vec![family.code().to_string(), start_style.to_string(), end_style.to_string()]
            }
            LookBackGet { family, index }
            | LookBackWordlist { family, index }
            | LookBackStrings { family, index }
            | LookBackTest { family, index } => vec![family.code().to_string(), index.to_string()],
            LookBackActionStyle { family, index, action, style } => vec![
                family.code().to_string(),
                index.to_string(),
                action.code().to_string(),
                style.to_string(),
            ],
            LookBackDefault { family, action } => vec![family.code().to_string(), action.code().to_string()],
            UniqueState(u) => vec![u.style.to_string(), u.state.to_string()],
            TransitionBlockCreate { state, family } => vec![state.to_string(), family.code().to_string()],
            TransitionBlockGet { state } => vec![state.to_string()],
            TransitionAppend(h) => vec![
                h.match_code.to_string(),
                opt(h.upto_style),
                opt(h.include_style),
                flag(h.redo),
                opt(h.target),
                flag(h.token_check),
                flag(h.ignore_case),
                flag(h.no_keyword),
            ],
            PushState(state) | ReplaceState(state) | EolTransition(state) => vec![state.to_string()],
            PopState | DelimiterClear | DelimiterKeep => Vec::new(),
            DelimiterSet { group, opposite } => vec![group.to_string(), flag(*opposite)],
        }
    }

    /// Decode the numeric fields of a non-scratch record. Fields past the
    /// ones this version knows about are ignored.
    pub fn decode(tag: TableTag, fields: &[&str], line: usize) -> TableResult<Self> {
        let f = FieldCursor { fields, line };
        use TableTag as T;
        let record = match tag {
            T::Version => TableRecord::Version(TableVersion {
                major: f.number(0, "major")?,
                minor: f.number(1, "minor")?,
                patch: f.number(2, "patch")?,
            }),
            T::ScratchBufferStart | T::ScratchBufferAppend => {
                return Err(f.malformed("scratch records are decoded by the reader"));
            }
            T::Language => TableRecord::Language,
            T::FamilyInfo => TableRecord::FamilyInfo { family: f.family(0)?, initial_state: f.opt_state(1)? },
            T::FamilySublanguage => TableRecord::FamilySublanguage { family: f.family(0)? },
            T::FamilyColor => TableRecord::FamilyColor {
                family: f.family(0)?,
                styles: KeywordStyles { identifier: f.number(1, "identifier style")?, keyword: f.number(2, "keyword style")? },
            },
            T::FamilyKeyword => TableRecord::FamilyKeyword { family: f.family(0)? },
            T::FlipperCount => TableRecord::FlipperCount { family: f.family(0)?, count: f.number(1, "count")? },
            T::FamilyOperator => TableRecord::FamilyOperator {
                family: f.family(0)?,
                index: f.number(1, "index")?,
                value: f.number(2, "value")?,
            },
            T::FamilyStyle => TableRecord::FamilyStyle {
                family: f.family(0)?,
                index: f.number(1, "index")?,
                style: f.number(2, "style")?,
            },
            T::LookBackCreate => TableRecord::LookBackCreate { family: f.family(0)? },
            T::LookBackInit => TableRecord::LookBackInit {
                family: f.family(0)?,
                start_style: f.number(1, "start style")?,
                end_style: f.number(2, "end style")?,
            },
            T::LookBackCount => TableRecord::LookBackCount { family: f.family(0)?, count: f.number(1, "count")? },
            T::LookBackGet => TableRecord::LookBackGet { family: f.family(0)?, index: f.number(1, "index")? },
            T::LookBackActionStyle => TableRecord::LookBackActionStyle {
                family: f.family(0)?,
                index: f.number(1, "index")?,
                action: f.action(2)?,
                style: f.number(3, "style")?,
            },
            T::LookBackWordlist => TableRecord::LookBackWordlist { family: f.family(0)?, index: f.number(1, "index")? },
            T::LookBackStrings => TableRecord::LookBackStrings { family: f.family(0)?, index: f.number(1, "index")? },
            T::LookBackTest => TableRecord::LookBackTest { family: f.family(0)?, index: f.number(1, "index")? },
            T::LookBackDefault => TableRecord::LookBackDefault { family: f.family(0)?, action: f.action(1)? },
            T::UniqueState => TableRecord::UniqueState(UniqueState { style: f.number(0, "style")?, state: f.state(1)? }),
            T::TransitionBlockCreate => TableRecord::TransitionBlockCreate { state: f.state(0)?, family: f.family(1)? },
            T::TransitionBlockGet => TableRecord::TransitionBlockGet { state: f.state(0)? },
            T::TransitionAppend => TableRecord::TransitionAppend(TransitionHeader {
                match_code: f.number(0, "match type")?,
                upto_style: f.opt_number(1, "upto style")?,
                include_style: f.opt_number(2, "include style")?,
                redo: f.flag(3)?,
                target: f.opt_state(4)?,
                token_check: f.flag(5)?,
                ignore_case: f.flag(6)?,
                no_keyword: f.flag(7)?,
            }),
            T::PushState => TableRecord::PushState(f.state(0)?),
            T::PopState => TableRecord::PopState,
            T::ReplaceState => TableRecord::ReplaceState(f.state(0)?),
            T::EolTransition => TableRecord::EolTransition(f.state(0)?),
            T::DelimiterSet => TableRecord::DelimiterSet { group: f.number(0, "group")?, opposite: f.flag(1)? },
            T::DelimiterClear => TableRecord::DelimiterClear,
            T::DelimiterKeep => TableRecord::DelimiterKeep,
        };
        Ok(record)
    }
}

/// Positional field access with line-aware errors
struct FieldCursor<'a> {
    fields: &'a [&'a str],
    line: usize,
}

impl FieldCursor<'_> {
    fn malformed(&self, reason: impl Into<String>) -> TableFormatError {
        TableFormatError::MalformedRecord { line: self.line, reason: reason.into() }
    }

    fn raw(&self, index: usize, what: &str) -> TableResult<&str> {
        self.fields
            .get(index)
            .map(|s| s.trim())
            .ok_or_else(|| self.malformed(format!("missing {what} field")))
    }

    fn number<T: std::str::FromStr>(&self, index: usize, what: &str) -> TableResult<T> {
        let raw = self.raw(index, what)?;
        raw.parse().map_err(|_| self.malformed(format!("invalid {what} '{raw}'")))
    }

    fn opt_number<T: std::str::FromStr>(&self, index: usize, what: &str) -> TableResult<Option<T>> {
        if self.raw(index, what)?.is_empty() {
            return Ok(None);
        }
        self.number(index, what).map(Some)
    }

    fn flag(&self, index: usize) -> TableResult<bool> {
        match self.raw(index, "flag")? {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(self.malformed(format!("invalid flag '{other}'"))),
        }
    }

    fn family(&self, index: usize) -> TableResult<Family> {
        let code: u8 = self.number(index, "family")?;
        Family::from_code(code).ok_or_else(|| self.malformed(format!("unknown family code {code}")))
    }

    fn state(&self, index: usize) -> TableResult<StateId> {
        self.number(index, "state").map(StateId)
    }

    fn opt_state(&self, index: usize) -> TableResult<Option<StateId>> {
        self.opt_number(index, "state").map(|s| s.map(StateId))
    }

    fn action(&self, index: usize) -> TableResult<TestAction> {
        let code: u8 = self.number(index, "action")?;
        TestAction::from_code(code).ok_or_else(|| self.malformed(format!("unknown test action {code}")))
    }
}

/// Flattens a `CompiledTable` into wire records
pub struct RecordBuilder {
    records: Vec<TableRecord>,
    chunk_size: usize,
}

impl RecordBuilder {
    /// Create a builder staging strings in chunks of at most `chunk_size` bytes
    pub fn new(chunk_size: usize) -> Self {
        Self { records: Vec::new(), chunk_size: chunk_size.max(4) }
    }

    /// Flatten a table with the default chunk size
    pub fn flatten(table: &CompiledTable) -> Vec<TableRecord> {
        Self::new(DEFAULT_CHUNK_SIZE).build(table)
    }

    /// Flatten a table in stream order
    pub fn build(mut self, table: &CompiledTable) -> Vec<TableRecord> {
        self.records.push(TableRecord::Version(table.version));
        self.stage(&table.language);
        self.records.push(TableRecord::Language);

        for family in &table.families {
            let f = family.family;
            self.records.push(TableRecord::FamilyInfo { family: f, initial_state: family.initial_state });
            if let Some(sublanguage) = &family.sublanguage {
                self.stage(sublanguage);
                self.records.push(TableRecord::FamilySublanguage { family: f });
            }
            if let Some(styles) = family.keyword_styles {
                self.records.push(TableRecord::FamilyColor { family: f, styles });
            }
            for keyword in &family.keywords {
                self.stage(keyword);
                self.records.push(TableRecord::FamilyKeyword { family: f });
            }
            if !family.flippers.is_empty() {
                self.records.push(TableRecord::FlipperCount { family: f, count: family.flippers.len() });
                for (index, flipper) in family.flippers.iter().enumerate() {
                    self.stage(&flipper.text);
                    self.records.push(TableRecord::FamilyOperator { family: f, index, value: flipper.value });
                    self.records.push(TableRecord::FamilyStyle { family: f, index, style: flipper.style });
                }
            }
            if let Some(look_back) = &family.look_back {
                self.records.push(TableRecord::LookBackCreate { family: f });
                self.records.push(TableRecord::LookBackInit {
                    family: f,
                    start_style: look_back.start_style,
                    end_style: look_back.end_style,
                });
                self.records.push(TableRecord::LookBackCount { family: f, count: look_back.tests.len() });
                for (index, test) in look_back.tests.iter().enumerate() {
                    self.records.push(TableRecord::LookBackGet { family: f, index });
                    self.records.push(TableRecord::LookBackActionStyle {
                        family: f,
                        index,
                        action: test.action,
                        style: test.style,
                    });
                    match &test.selector {
                        Selector::All => {}
                        Selector::Words(words) => {
                            for word in words {
                                self.stage(word);
                                self.records.push(TableRecord::LookBackWordlist { family: f, index });
                            }
                        }
                        Selector::Strings(strings) => {
                            for s in strings {
                                self.stage(s);
                                self.records.push(TableRecord::LookBackStrings { family: f, index });
                            }
                        }
                    }
                    self.records.push(TableRecord::LookBackTest { family: f, index });
                }
                self.records.push(TableRecord::LookBackDefault { family: f, action: look_back.default_action });
            }
        }

        for unique in &table.unique_states {
            self.records.push(TableRecord::UniqueState(*unique));
        }

        for state in &table.states {
            self.records.push(TableRecord::TransitionBlockCreate { state: state.id, family: state.family });
        }
        for state in &table.states {
            self.records.push(TableRecord::TransitionBlockGet { state: state.id });
            for transition in &state.transitions {
                self.transition(transition);
            }
        }

        self.records
    }

    fn transition(&mut self, transition: &CompiledTransition) {
        if let Some(payload) = transition.matcher.payload() {
            self.stage(payload);
        }
        self.records.push(TableRecord::TransitionAppend(TransitionHeader::from_transition(transition)));
        match transition.stack_op {
            Some(StackOp::Push(state)) => self.records.push(TableRecord::PushState(state)),
            Some(StackOp::Pop) => self.records.push(TableRecord::PopState),
            Some(StackOp::Replace(state)) => self.records.push(TableRecord::ReplaceState(state)),
            None => {}
        }
        if let Some(state) = transition.eol_target {
            self.records.push(TableRecord::EolTransition(state));
        }
        match transition.delimiter_op {
            Some(DelimiterOp::Set { group, opposite }) => {
                self.records.push(TableRecord::DelimiterSet { group, opposite });
            }
            Some(DelimiterOp::Clear) => self.records.push(TableRecord::DelimiterClear),
            Some(DelimiterOp::Keep) => self.records.push(TableRecord::DelimiterKeep),
            None => {}
        }
    }

    /// Stage a string through the scratch buffer, splitting on char boundaries
    fn stage(&mut self, text: &str) {
        let mut chunks = split_chunks(text, self.chunk_size).into_iter();
        let first = chunks.next().unwrap_or_default();
        self.records.push(TableRecord::ScratchBufferStart(first.to_string()));
        for chunk in chunks {
            self.records.push(TableRecord::ScratchBufferAppend(chunk.to_string()));
        }
    }
}

fn split_chunks(text: &str, max_bytes: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = rest.len().min(max_bytes);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Rebuild the match kind of an appended transition from its header and payload
pub fn match_kind_from_header(header: &TransitionHeader, payload: Option<String>, line: usize) -> TableResult<MatchKind> {
    let missing = || TableFormatError::EmptyScratchBuffer { line };
    let kind = match header.match_code {
        1 => MatchKind::Literal(payload.ok_or_else(missing)?),
        2 => MatchKind::Regex { pattern: payload.ok_or_else(missing)?, ignore_case: header.ignore_case },
        3 => MatchKind::Delimiter,
        4 => MatchKind::Empty,
        5 => MatchKind::Eof,
        other => {
            return Err(TableFormatError::MalformedRecord { line, reason: format!("unknown match type {other}") });
        }
    };
    Ok(kind)
}
