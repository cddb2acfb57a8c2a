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

//! Resource-stream decoder
//!
//! Reads the text produced by `ResourceWriter` back into a `CompiledTable`.
//! A stream from a newer minor version may carry tags this reader does not
//! know; those records are skipped. Fields past the ones a record defines
//! are ignored for the same reason.

use super::record::{TableRecord, TransitionHeader, match_kind_from_header};
use super::tag::TableTag;
use super::writer::unescape_chunk;
use super::{
    CompiledState, CompiledTable, CompiledTransition, DelimiterOp, Flipper, LookBackTable, LookBackTest, Selector,
    StackOp, TableFamily, TableVersion, TestAction,
};
use crate::error::{TableFormatError, TableResult};
use crate::family::Family;
use tracing::debug;

/// Decoder for the resource stream
#[derive(Debug, Clone)]
pub struct TableReader {
    supported: TableVersion,
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableReader {
    pub fn new() -> Self {
        Self { supported: TableVersion::CURRENT }
    }

    /// Reader that claims a different supported version
    pub fn with_supported_version(mut self, version: TableVersion) -> Self {
        self.supported = version;
        self
    }

    /// Decode the stream into records, in stream order
    pub fn parse_records(&self, text: &str) -> TableResult<Vec<TableRecord>> {
        Ok(self.parse_lines(text)?.into_iter().map(|(_, record)| record).collect())
    }

    /// Decode the stream into records tagged with their line numbers
    fn parse_lines(&self, text: &str) -> TableResult<Vec<(usize, TableRecord)>> {
        let mut records = Vec::new();
        let mut stream_version: Option<TableVersion> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line = index + 1;
            let raw_line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if raw_line.trim().is_empty() {
                continue;
            }

            let (tag_text, rest) = match raw_line.split_once(':') {
                Some((tag, rest)) => (tag, Some(rest)),
                None => (raw_line, None),
            };
            let code: u8 = tag_text.trim().parse().map_err(|_| TableFormatError::MalformedRecord {
                line,
                reason: format!("invalid tag '{tag_text}'"),
            })?;

            let Some(tag) = TableTag::from_code(code) else {
                match stream_version {
                    None => return Err(TableFormatError::MissingVersion(code)),
                    Some(version) if version.minor > self.supported.minor => {
                        debug!(tag = code, line, "Skipping record from newer table format");
                        continue;
                    }
                    Some(_) => return Err(TableFormatError::UnknownTag { tag: code, line }),
                }
            };

            let record = match tag {
                TableTag::ScratchBufferStart | TableTag::ScratchBufferAppend => {
                    let chunk = decode_chunk(rest.unwrap_or(""), line)?;
                    if tag == TableTag::ScratchBufferStart {
                        TableRecord::ScratchBufferStart(chunk)
                    } else {
                        TableRecord::ScratchBufferAppend(chunk)
                    }
                }
                _ => {
                    let fields: Vec<&str> = rest.map(|r| r.split(':').collect()).unwrap_or_default();
                    TableRecord::decode(tag, &fields, line)?
                }
            };

            match (&record, stream_version) {
                (TableRecord::Version(version), None) => {
                    if version.major != self.supported.major {
                        return Err(TableFormatError::UnsupportedVersion {
                            found: version.major,
                            supported: self.supported.major,
                        });
                    }
                    stream_version = Some(*version);
                }
                (_, None) => return Err(TableFormatError::MissingVersion(code)),
                (TableRecord::Version(_), Some(_)) => {
                    return Err(TableFormatError::OutOfOrder { line, what: "a second version record".into() });
                }
                _ => {}
            }
            records.push((line, record));
        }

        if records.is_empty() {
            return Err(TableFormatError::EmptyStream);
        }
        Ok(records)
    }

    /// Decode the stream into a table
    pub fn read(&self, text: &str) -> TableResult<CompiledTable> {
        let mut assembler = Assembler::default();
        for (line, record) in self.parse_lines(text)? {
            assembler.apply(record, line)?;
        }
        Ok(assembler.finish())
    }
}

fn decode_chunk(rest: &str, line: usize) -> TableResult<String> {
    let mut parts = rest.splitn(2, ':');
    let declared_text = parts.next().unwrap_or("");
    let declared: usize = declared_text.trim().parse().map_err(|_| TableFormatError::MalformedRecord {
        line,
        reason: format!("invalid chunk length '{declared_text}'"),
    })?;
    let chunk = unescape_chunk(parts.next().unwrap_or(""));
    if chunk.len() != declared {
        return Err(TableFormatError::ChunkLengthMismatch { line, declared, actual: chunk.len() });
    }
    Ok(chunk)
}

/// Incremental table construction from records
#[derive(Default)]
struct Assembler {
    table: Option<CompiledTable>,
    scratch: Option<String>,
    families: Vec<TableFamily>,
    states: Vec<CompiledState>,
    current: Option<usize>,
}

impl Assembler {
    fn table(&mut self) -> &mut CompiledTable {
        self.table.get_or_insert_with(|| CompiledTable::new(String::new()))
    }

    fn take_scratch(&mut self, line: usize) -> TableResult<String> {
        self.scratch.take().ok_or(TableFormatError::EmptyScratchBuffer { line })
    }

    fn family(&mut self, family: Family, line: usize) -> TableResult<&mut TableFamily> {
        self.families
            .iter_mut()
            .find(|f| f.family == family)
            .ok_or_else(|| TableFormatError::OutOfOrder { line, what: format!("family {family}") })
    }

    fn look_back(&mut self, family: Family, line: usize) -> TableResult<&mut LookBackTable> {
        self.family(family, line)?
            .look_back
            .as_mut()
            .ok_or_else(|| TableFormatError::OutOfOrder { line, what: format!("look-back tests of {family}") })
    }

    fn look_back_test(&mut self, family: Family, index: usize, line: usize) -> TableResult<&mut LookBackTest> {
        self.look_back(family, line)?
            .tests
            .get_mut(index)
            .ok_or_else(|| TableFormatError::OutOfOrder { line, what: format!("look-back test {index}") })
    }

    fn last_transition(&mut self, line: usize) -> TableResult<&mut CompiledTransition> {
        self.current
            .and_then(|index| self.states.get_mut(index))
            .and_then(|state| state.transitions.last_mut())
            .ok_or_else(|| TableFormatError::OutOfOrder { line, what: "a transition".into() })
    }

    fn apply(&mut self, record: TableRecord, line: usize) -> TableResult<()> {
        use TableRecord as R;
        match record {
            R::Version(version) => self.table().version = version,
            R::ScratchBufferStart(text) => self.scratch = Some(text),
            R::ScratchBufferAppend(text) => match self.scratch.as_mut() {
                Some(buffer) => buffer.push_str(&text),
                None => return Err(TableFormatError::OutOfOrder { line, what: "a scratch buffer".into() }),
            },
            R::Language => {
                let language = self.take_scratch(line)?;
                self.table().language = language;
            }
            R::FamilyInfo { family, initial_state } => {
                if let Some(existing) = self.families.iter_mut().find(|f| f.family == family) {
                    existing.initial_state = initial_state;
                } else {
                    let mut entry = TableFamily::new(family);
                    entry.initial_state = initial_state;
                    self.families.push(entry);
                }
            }
            R::FamilySublanguage { family } => {
                let name = self.take_scratch(line)?;
                self.family(family, line)?.sublanguage = Some(name);
            }
            R::FamilyColor { family, styles } => self.family(family, line)?.keyword_styles = Some(styles),
            R::FamilyKeyword { family } => {
                let keyword = self.take_scratch(line)?;
                self.family(family, line)?.keywords.push(keyword);
            }
            R::FlipperCount { family, count } => self.family(family, line)?.flippers.reserve(count),
            R::FamilyOperator { family, index, value } => {
                let text = self.take_scratch(line)?;
                let entry = self.family(family, line)?;
                if index != entry.flippers.len() {
                    return Err(TableFormatError::OutOfOrder { line, what: format!("flipper {index}") });
                }
                entry.flippers.push(Flipper { text, style: 0, value });
            }
            R::FamilyStyle { family, index, style } => {
                let entry = self.family(family, line)?;
                let flipper = entry
                    .flippers
                    .get_mut(index)
                    .ok_or_else(|| TableFormatError::OutOfOrder { line, what: format!("flipper {index}") })?;
                flipper.style = style;
            }
            R::LookBackCreate { family } => {
                self.family(family, line)?.look_back = Some(LookBackTable {
                    start_style: 0,
                    end_style: 0,
                    tests: Vec::new(),
                    default_action: TestAction::Accept,
                });
            }
            R::LookBackInit { family, start_style, end_style } => {
                let look_back = self.look_back(family, line)?;
                look_back.start_style = start_style;
                look_back.end_style = end_style;
            }
            R::LookBackCount { family, count } => self.look_back(family, line)?.tests.reserve(count),
            R::LookBackGet { family, index } => {
                let look_back = self.look_back(family, line)?;
                if index > look_back.tests.len() {
                    return Err(TableFormatError::OutOfOrder { line, what: format!("look-back test {index}") });
                }
                if index == look_back.tests.len() {
                    look_back.tests.push(LookBackTest { style: 0, action: TestAction::Accept, selector: Selector::All });
                }
            }
            R::LookBackActionStyle { family, index, action, style } => {
                let test = self.look_back_test(family, index, line)?;
                test.action = action;
                test.style = style;
            }
            R::LookBackWordlist { family, index } => {
                let word = self.take_scratch(line)?;
                let test = self.look_back_test(family, index, line)?;
                match &mut test.selector {
                    Selector::Words(words) => words.push(word),
                    selector => *selector = Selector::Words(vec![word]),
                }
            }
            R::LookBackStrings { family, index } => {
                let text = self.take_scratch(line)?;
                let test = self.look_back_test(family, index, line)?;
                match &mut test.selector {
                    Selector::Strings(strings) => strings.push(text),
                    selector => *selector = Selector::Strings(vec![text]),
                }
            }
            R::LookBackTest { family, index } => {
                self.look_back_test(family, index, line)?;
            }
            R::LookBackDefault { family, action } => self.look_back(family, line)?.default_action = action,
            R::UniqueState(unique) => self.table().unique_states.push(unique),
            R::TransitionBlockCreate { state, family } => {
                if self.states.iter().any(|s| s.id == state) {
                    return Err(TableFormatError::MalformedRecord {
                        line,
                        reason: format!("state {state} created twice"),
                    });
                }
                self.states.push(CompiledState { id: state, family, transitions: Vec::new() });
            }
            R::TransitionBlockGet { state } => {
                let index = self
                    .states
                    .iter()
                    .position(|s| s.id == state)
                    .ok_or_else(|| TableFormatError::OutOfOrder { line, what: format!("state {state}") })?;
                self.current = Some(index);
            }
            R::TransitionAppend(header) => self.append_transition(header, line)?,
            R::PushState(state) => self.last_transition(line)?.stack_op = Some(StackOp::Push(state)),
            R::PopState => self.last_transition(line)?.stack_op = Some(StackOp::Pop),
            R::ReplaceState(state) => self.last_transition(line)?.stack_op = Some(StackOp::Replace(state)),
            R::EolTransition(state) => self.last_transition(line)?.eol_target = Some(state),
            R::DelimiterSet { group, opposite } => {
                self.last_transition(line)?.delimiter_op = Some(DelimiterOp::Set { group, opposite });
            }
            R::DelimiterClear => self.last_transition(line)?.delimiter_op = Some(DelimiterOp::Clear),
            R::DelimiterKeep => self.last_transition(line)?.delimiter_op = Some(DelimiterOp::Keep),
        }
        Ok(())
    }

    fn append_transition(&mut self, header: TransitionHeader, line: usize) -> TableResult<()> {
        let payload = if header.has_payload() { Some(self.take_scratch(line)?) } else { None };
        let matcher = match_kind_from_header(&header, payload, line)?;
        let state = self
            .current
            .and_then(|index| self.states.get_mut(index))
            .ok_or_else(|| TableFormatError::OutOfOrder { line, what: "a transition block".into() })?;
        let mut transition = CompiledTransition::new(matcher);
        transition.upto_style = header.upto_style;
        transition.include_style = header.include_style;
        transition.redo = header.redo;
        transition.target = header.target;
        transition.token_check = header.token_check;
        transition.no_keyword = header.no_keyword;
        state.transitions.push(transition);
        Ok(())
    }

    fn finish(mut self) -> CompiledTable {
        let mut table = self.table.take().unwrap_or_else(|| CompiledTable::new(String::new()));
        table.families = self.families;
        self.states.sort_by_key(|s| s.id);
        table.states = self.states;
        table.unique_states.sort_by_key(|u| u.style);
        table
    }
}
