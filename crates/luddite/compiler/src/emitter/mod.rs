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

//! Table emission
//!
//! Turns a checked session into a `CompiledTable` and renders it:
//!
//! - `scratch`: quote stripping and selective unescaping of string payloads
//! - `patterns`: `$NAME` expansion inside regex transitions
//! - `unique`: the style-to-state reverse map

pub mod patterns;
pub mod scratch;
pub mod unique;

pub use patterns::{Expansion, expand_patterns};
pub use scratch::{stage_payload, unescape_payload};
pub use unique::unique_states;

use crate::config::{CompilerConfig, OutputFormat};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{GrammarError, GrammarResult};
use crate::grammar::PaintMode;
use crate::session::{Command, CompilerSession, FamilyInfo, Transition};
use luddite_common::table::{CallSequenceWriter, ResourceWriter, TableWriter};
use luddite_common::{
    CompiledState, CompiledTable, CompiledTransition, DelimiterOp, Family, Flipper, KeywordStyles, LookBackTable,
    LookBackTest, MatchKind, Selector, StackOp, StyleId, StyleRef, TableFamily,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Emitted artifact: the table and its rendered text
#[derive(Debug, Clone)]
pub struct EmittedTable {
    pub table: CompiledTable,
    pub text: String,
}

fn resolve(style: &StyleRef, context: impl FnOnce() -> String) -> GrammarResult<StyleId> {
    style.resolve().ok_or_else(|| GrammarError::UnknownStyle { style: style.to_string(), context: context() })
}

fn stage_all(items: &[String]) -> Vec<String> {
    items.iter().map(|item| stage_payload(item)).collect()
}

/// Builds and renders the transition table
pub struct TableEmitter {
    config: CompilerConfig,
}

impl TableEmitter {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Build the table and render it in the configured format
    pub fn emit(&self, session: &mut CompilerSession) -> GrammarResult<EmittedTable> {
        let table = self.build_table(session)?;
        let text = self.render(&table);
        info!(
            format = %self.config.output_format,
            states = table.states.len(),
            transitions = table.transition_count(),
            bytes = text.len(),
            "Emitted transition table"
        );
        Ok(EmittedTable { table, text })
    }

    /// Render a table in the configured format
    pub fn render(&self, table: &CompiledTable) -> String {
        let chunk_size = self.config.scratch_chunk_size;
        match self.config.output_format {
            OutputFormat::Resource => ResourceWriter::new().write_table(table, chunk_size),
            OutputFormat::CCalls => CallSequenceWriter::new(&table.language).write_table(table, chunk_size),
        }
    }

    /// Resolve the session into a table
    pub fn build_table(&self, session: &mut CompilerSession) -> GrammarResult<CompiledTable> {
        let language = session.language().ok_or(GrammarError::MissingLanguage)?;
        let mut table = CompiledTable::new(stage_payload(language));

        for info in session.families() {
            table.families.push(self.build_family(info)?);
        }

        let mut warnings = Vec::new();
        for (id, transitions) in session.blocks() {
            let family = session.family_owner(id)?;
            let state_name = session.state_name(id).unwrap_or("<unnamed>");
            let patterns = session.family_info(family).map(|info| &info.patterns);
            let mut compiled = Vec::with_capacity(transitions.len());
            for transition in transitions {
                compiled.push(self.build_transition(transition, state_name, patterns, &mut warnings)?);
            }
            debug!(state = state_name, %family, transitions = compiled.len(), "Compiled state");
            table.states.push(CompiledState { id, family, transitions: compiled });
        }
        for warning in warnings {
            session.diagnostics_mut().push(warning);
        }

        table.unique_states = unique_states(&table.states);
        Ok(table)
    }

    fn build_family(&self, info: &FamilyInfo) -> GrammarResult<TableFamily> {
        let family = info.family;
        let mut entry = TableFamily::new(family);
        entry.initial_state = info.initial;
        entry.sublanguage = info.sublanguage.as_deref().map(stage_payload);

        if let Some((identifier, keyword)) = &info.keyword_style {
            let context = || format!("keyword_style of {family}");
            entry.keyword_styles =
                Some(KeywordStyles { identifier: resolve(identifier, context)?, keyword: resolve(keyword, context)? });
        }
        entry.keywords = stage_all(&info.keywords);

        for flipper in &info.flippers {
            entry.flippers.push(Flipper {
                text: stage_payload(&flipper.text),
                style: resolve(&flipper.style, || format!("fold '{}' of {family}", flipper.text))?,
                value: flipper.value,
            });
        }

        if info.has_look_back() {
            entry.look_back = Some(self.build_look_back(info)?);
        }
        Ok(entry)
    }

    fn build_look_back(&self, info: &FamilyInfo) -> GrammarResult<LookBackTable> {
        let family = info.family;
        let required = |style: &Option<StyleRef>, missing: &'static str| -> GrammarResult<StyleId> {
            let style = style.as_ref().ok_or(GrammarError::LookBackWithoutStyle { family, missing })?;
            resolve(style, || format!("{missing} of {family}"))
        };
        let start_style = required(&info.start_style, "start_style")?;
        let end_style = required(&info.end_style, "end_style")?;

        let mut tests = Vec::with_capacity(info.look_back.len());
        for rule in &info.look_back {
            let selector = match &rule.selector {
                Selector::All => Selector::All,
                Selector::Words(words) => Selector::Words(stage_all(words)),
                Selector::Strings(strings) => Selector::Strings(stage_all(strings)),
            };
            tests.push(LookBackTest {
                style: resolve(&rule.style, || format!("token_check of {family}"))?,
                action: rule.action,
                selector,
            });
        }
        Ok(LookBackTable { start_style, end_style, tests, default_action: info.default_action.unwrap_or_default() })
    }

    fn build_transition(
        &self,
        transition: &Transition,
        state: &str,
        patterns: Option<&BTreeMap<String, String>>,
        warnings: &mut Vec<Diagnostic>,
    ) -> GrammarResult<CompiledTransition> {
        let matcher = match &transition.matcher {
            MatchKind::Literal(text) => MatchKind::Literal(stage_payload(text)),
            MatchKind::Regex { pattern, ignore_case } => {
                let expanded = self.expand(pattern, state, patterns, warnings);
                MatchKind::Regex { pattern: unescape_payload(&expanded), ignore_case: *ignore_case }
            }
            other => other.clone(),
        };

        let mut compiled = CompiledTransition::new(matcher);
        compiled.target = transition.target;
        compiled.token_check = transition.token_check;
        for command in &transition.commands {
            match command {
                Command::Paint { mode, style } => {
                    let id = resolve(style, || format!("state {state}"))?;
                    match mode {
                        PaintMode::Upto => compiled.upto_style = Some(id),
                        PaintMode::Include => compiled.include_style = Some(id),
                    }
                }
                Command::Push(target) => compiled.stack_op = Some(StackOp::Push(*target)),
                Command::Pop => compiled.stack_op = Some(StackOp::Pop),
                Command::Replace(target) => compiled.stack_op = Some(StackOp::Replace(*target)),
                Command::AtEol(target) => compiled.eol_target = Some(*target),
                Command::SetDelimiter { group, opposite } => {
                    compiled.delimiter_op = Some(DelimiterOp::Set { group: *group, opposite: *opposite });
                }
                Command::ClearDelimiter => compiled.delimiter_op = Some(DelimiterOp::Clear),
                Command::KeepDelimiter => compiled.delimiter_op = Some(DelimiterOp::Keep),
                Command::Redo => compiled.redo = true,
                Command::NoKeyword => compiled.no_keyword = true,
            }
        }
        Ok(compiled)
    }

    fn expand(
        &self,
        pattern: &str,
        state: &str,
        patterns: Option<&BTreeMap<String, String>>,
        warnings: &mut Vec<Diagnostic>,
    ) -> String {
        let empty = BTreeMap::new();
        let expansion = expand_patterns(pattern, patterns.unwrap_or(&empty), self.config.pattern_substitution_limit);
        let warn = |kind, message: String| Diagnostic { kind, message, family: None, state: Some(state.to_string()) };
        for name in &expansion.unresolved {
            warnings.push(warn(
                DiagnosticKind::UnresolvedPatternVariable,
                format!("pattern variable ${name} is not defined; left literally in /{pattern}/"),
            ));
        }
        if expansion.limit_reached {
            warnings.push(warn(
                DiagnosticKind::PatternSubstitutionLimit,
                format!(
                    "pattern expansion of /{pattern}/ stopped after {} passes",
                    self.config.pattern_substitution_limit
                ),
            ));
        }
        expansion.pattern
    }
}

/// Families present in a table, in wire order
pub fn emitted_families(table: &CompiledTable) -> Vec<Family> {
    table.families.iter().map(|f| f.family).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::processor::TreeProcessor;
    use luddite_common::{StateId, TableReader, TestAction};
    use serde_json::json;

    fn session_for(value: serde_json::Value) -> CompilerSession {
        let grammar: Grammar = serde_json::from_value(value).unwrap();
        let mut session = CompilerSession::new();
        TreeProcessor::new(&mut session).process_tree(&grammar.nodes, Family::Markup).unwrap();
        session
    }

    #[test]
    fn test_regex_payload_keeps_control_escapes() {
        let mut session = session_for(json!([
            {"kind": "language", "name": "'Mini'"},
            {"kind": "family", "name": "ssl"},
            {"kind": "pattern", "name": "WS", "value": "'[ \\t]'"},
            {"kind": "state_block", "state": "IN_SSL_DEFAULT", "transitions": [
                {"match": {"type": "regex", "pattern": "$WS*[\\r\\n]"},
                 "commands": [{"command": "paint", "mode": "upto", "style": "SCE_UDL_SSL_DEFAULT"}]}
            ]}
        ]));
        let table = TableEmitter::new(CompilerConfig::default()).build_table(&mut session).unwrap();
        assert_eq!(table.language, "Mini");
        let state = &table.states[0];
        assert_eq!(state.family, Family::Ssl);
        assert_eq!(state.transitions[0].matcher, MatchKind::Regex { pattern: "[ \\t]*[\\r\\n]".into(), ignore_case: false });
        assert_eq!(state.transitions[0].upto_style, Some(31));
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn test_regex_keeps_enclosing_quotes() {
        let mut session = session_for(json!([
            {"kind": "language", "name": "Mini"},
            {"kind": "family", "name": "ssl"},
            {"kind": "state_block", "state": "IN_SSL_DEFAULT", "transitions": [
                {"match": {"type": "regex", "pattern": "\"[^\\\"]*\""},
                 "commands": [{"command": "paint", "mode": "include", "style": "SCE_UDL_SSL_STRING"}]},
                {"match": {"type": "regex", "pattern": "'[^']*'"},
                 "commands": [{"command": "paint", "mode": "include", "style": "SCE_UDL_SSL_STRING"}]},
                {"match": {"type": "string", "value": "'%>'"},
                 "commands": [{"command": "paint", "mode": "include", "style": "SCE_UDL_SSL_STRING"}]}
            ]}
        ]));
        let table = TableEmitter::new(CompilerConfig::default()).build_table(&mut session).unwrap();
        let payloads: Vec<_> = table.states[0].transitions.iter().take(3).map(|t| t.matcher.payload()).collect();
        assert_eq!(payloads, vec![Some("\"[^\"]*\""), Some("'[^']*'"), Some("%>")]);
    }

    #[test]
    fn test_unresolved_pattern_is_a_warning() {
        let mut session = session_for(json!([
            {"kind": "language", "name": "Mini"},
            {"kind": "state_block", "state": "S", "transitions": [
                {"match": {"type": "regex", "pattern": "$NOPE"},
                 "commands": [{"command": "paint", "mode": "upto", "style": 0}]}
            ]}
        ]));
        let table = TableEmitter::new(CompilerConfig::default()).build_table(&mut session).unwrap();
        assert_eq!(table.states[0].transitions[0].matcher.payload(), Some("$NOPE"));
        assert_eq!(session.diagnostics().count(DiagnosticKind::UnresolvedPatternVariable), 1);
    }

    #[test]
    fn test_family_sections() {
        let mut session = session_for(json!([
            {"kind": "language", "name": "Mini"},
            {"kind": "family", "name": "ssl"},
            {"kind": "sublanguage", "name": "Ruby"},
            {"kind": "initial", "state": "IN_SSL_DEFAULT"},
            {"kind": "keyword_list", "keywords": ["def", "'end'"]},
            {"kind": "keyword_style", "identifier_style": "SCE_UDL_SSL_IDENTIFIER", "keyword_style": "SCE_UDL_SSL_WORD"},
            {"kind": "fold", "text": "{", "style": "SCE_UDL_SSL_OPERATOR", "value": 1},
            {"kind": "start_style", "style": "SCE_UDL_SSL_DEFAULT"},
            {"kind": "end_style", "style": "SCE_UDL_SSL_VARIABLE"},
            {"kind": "token_check_block", "default_action": "reject", "tests": [
                {"style": "SCE_UDL_SSL_OPERATOR", "action": "accept", "selector": {"strings": [")"]}}
            ]},
            {"kind": "state_block", "state": "IN_SSL_DEFAULT", "transitions": [
                {"match": {"type": "string", "value": "#"}, "commands": [{"command": "paint", "mode": "upto", "style": 31}]}
            ]}
        ]));
        let table = TableEmitter::new(CompilerConfig::default()).build_table(&mut session).unwrap();
        assert_eq!(emitted_families(&table), vec![Family::Ssl]);
        let ssl = table.family(Family::Ssl).unwrap();
        assert_eq!(ssl.initial_state, Some(StateId(1)));
        assert_eq!(ssl.sublanguage.as_deref(), Some("Ruby"));
        assert_eq!(ssl.keywords, vec!["def".to_string(), "end".to_string()]);
        assert_eq!(ssl.keyword_styles, Some(KeywordStyles { identifier: 37, keyword: 36 }));
        assert_eq!(ssl.flippers, vec![Flipper { text: "{".into(), style: 38, value: 1 }]);
        let look_back = ssl.look_back.as_ref().unwrap();
        assert_eq!((look_back.start_style, look_back.end_style), (31, 40));
        assert_eq!(look_back.default_action, TestAction::Reject);
        assert_eq!(table.unique_state_for_style(31), Some(StateId(1)));
    }

    #[test]
    fn test_rendered_resource_reads_back() {
        let mut session = session_for(json!([
            {"kind": "language", "name": "Mini"},
            {"kind": "state_block", "state": "IN_M_DEFAULT", "transitions": [
                {"match": {"type": "string", "value": "<%"}, "target": "IN_M_DEFAULT",
                 "commands": [{"command": "paint", "mode": "upto", "style": 0},
                              {"command": "push", "state": "IN_M_DEFAULT"},
                              {"command": "set_opposite_delimiter", "group": 1}]}
            ]}
        ]));
        let emitted = TableEmitter::new(CompilerConfig::default()).emit(&mut session).unwrap();
        let read = TableReader::new().read(&emitted.text).unwrap();
        assert_eq!(read, emitted.table);
    }
}
