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

//! Grammar tree processing
//!
//! Walks the parsed grammar and records every declaration on the session.
//! Family switches apply to the declarations that follow them, including
//! those after the end of a nested module.

pub mod eof;

pub use eof::{EofOutcome, synthesize_eof};

use crate::diagnostics::DiagnosticKind;
use crate::error::{GrammarError, GrammarResult};
use crate::grammar::{CommandNode, GrammarNode, MatchNode, TransitionNode};
use crate::session::{Command, CompilerSession, FlipperDef, LookBackRule, Transition};
use luddite_common::{Family, MatchKind, StateId};
use tracing::debug;

/// Populates a `CompilerSession` from grammar nodes
pub struct TreeProcessor<'a> {
    session: &'a mut CompilerSession,
    synthesize_eof: bool,
}

impl<'a> TreeProcessor<'a> {
    pub fn new(session: &'a mut CompilerSession) -> Self {
        Self { session, synthesize_eof: true }
    }

    pub fn with_eof_synthesis(mut self, enabled: bool) -> Self {
        self.synthesize_eof = enabled;
        self
    }

    /// Process nodes with `family` active; returns the family active afterwards
    pub fn process_tree(&mut self, nodes: &[GrammarNode], family: Family) -> GrammarResult<Family> {
        let mut family = family;
        for node in nodes {
            family = self.process_node(node, family)?;
        }
        Ok(family)
    }

    fn process_node(&mut self, node: &GrammarNode, family: Family) -> GrammarResult<Family> {
        match node {
            GrammarNode::Module { children } => return self.process_tree(children, family),
            GrammarNode::Family { name } => match name.parse::<Family>() {
                Ok(next) => {
                    debug!(family = %next, "Switching family");
                    return Ok(next);
                }
                Err(_) => self.session.record_unknown_family(name),
            },
            GrammarNode::Pattern { name, value } => {
                if !self.session.family_info_mut(family).add_pattern(name, value)? {
                    debug!(%family, pattern = %name, "Identical pattern redefinition");
                }
            }
            GrammarNode::Initial { state } => {
                let id = self.session.reference_state(state);
                if !self.session.family_info_mut(family).set_initial(id) {
                    self.session.diagnostics_mut().family_warning(
                        DiagnosticKind::IgnoredDeclaration,
                        family,
                        format!("initial state '{state}' ignored; the first declaration wins"),
                    );
                }
            }
            GrammarNode::Language { name } => self.session.set_language(name)?,
            GrammarNode::Sublanguage { name } => self.session.family_info_mut(family).set_sublanguage(name)?,
            GrammarNode::StateBlock { state, transitions } => self.process_state_block(state, transitions, family)?,
            GrammarNode::KeywordList { keywords } => {
                self.session.family_info_mut(family).keywords.extend(keywords.iter().cloned());
            }
            GrammarNode::KeywordStyle { identifier_style, keyword_style } => {
                self.session.family_info_mut(family).keyword_style =
                    Some((identifier_style.clone(), keyword_style.clone()));
            }
            GrammarNode::TokenCheckBlock { tests, default_action } => {
                let info = self.session.family_info_mut(family);
                info.look_back.extend(tests.iter().map(|test| LookBackRule {
                    style: test.style.clone(),
                    action: test.action,
                    selector: test.selector.clone(),
                }));
                if default_action.is_some() {
                    info.default_action = *default_action;
                }
            }
            GrammarNode::StartStyle { style } => self.session.family_info_mut(family).start_style = Some(style.clone()),
            GrammarNode::EndStyle { style } => self.session.family_info_mut(family).end_style = Some(style.clone()),
            GrammarNode::Fold { text, style, value } => {
                self.session.family_info_mut(family).flippers.push(FlipperDef {
                    text: text.clone(),
                    style: style.clone(),
                    value: *value,
                });
            }
            GrammarNode::Namespace { value } => self.session.detection_mut().add_namespace(value),
            GrammarNode::PublicId { value } => self.session.detection_mut().add_public_id(value),
            GrammarNode::SystemId { value } => self.session.detection_mut().add_system_id(value),
        }
        Ok(family)
    }

    fn process_state_block(&mut self, state: &str, nodes: &[TransitionNode], family: Family) -> GrammarResult<()> {
        let id = self.session.intern_state_name(state);
        if self.session.has_block(id) {
            return Err(GrammarError::DuplicateStateBlock(state.to_string()));
        }
        self.session.set_family_owner(id, family);
        self.session.family_info_mut(family);

        let mut transitions = Vec::with_capacity(nodes.len() + 1);
        for node in nodes {
            transitions.push(self.build_transition(state, node)?);
        }

        if self.synthesize_eof {
            match synthesize_eof(&transitions) {
                EofOutcome::Synthesized(eof) => {
                    debug!(state, "Appending synthetic end-of-buffer transition");
                    transitions.push(eof);
                }
                EofOutcome::AlreadyHandled => {}
                EofOutcome::Skipped(reason) => {
                    self.session.diagnostics_mut().state_warning(DiagnosticKind::EofSynthesisSkipped, state, reason);
                }
            }
        }

        debug!(state, id = %id, %family, count = transitions.len(), "Recorded state block");
        self.session.insert_block(id, transitions);
        Ok(())
    }

    fn build_transition(&mut self, state: &str, node: &TransitionNode) -> GrammarResult<Transition> {
        let matcher = match &node.matcher {
            MatchNode::String { value } => MatchKind::Literal(value.clone()),
            MatchNode::Regex { pattern, ignore_case } => {
                MatchKind::Regex { pattern: pattern.clone(), ignore_case: *ignore_case }
            }
            MatchNode::Delimiter => MatchKind::Delimiter,
            MatchNode::Empty => MatchKind::Empty,
            MatchNode::Eof => MatchKind::Eof,
        };
        let target: Option<StateId> = node.target.as_deref().map(|name| self.session.reference_state(name));
        let commands = node.commands.iter().map(|command| self.build_command(command)).collect();

        Transition::new(matcher, target, node.token_check, commands)
            .map_err(|reason| GrammarError::InvalidTransition { state: state.to_string(), reason })
    }

    fn build_command(&mut self, command: &CommandNode) -> Command {
        match command {
            CommandNode::Paint { mode, style } => Command::Paint { mode: *mode, style: style.clone() },
            CommandNode::Push { state } => Command::Push(self.session.reference_state(state)),
            CommandNode::Pop => Command::Pop,
            CommandNode::Replace { state } => Command::Replace(self.session.reference_state(state)),
            CommandNode::AtEol { state } => Command::AtEol(self.session.reference_state(state)),
            CommandNode::SetDelimiter { group } => Command::SetDelimiter { group: *group, opposite: false },
            CommandNode::SetOppositeDelimiter { group } => Command::SetDelimiter { group: *group, opposite: true },
            CommandNode::ClearDelimiter => Command::ClearDelimiter,
            CommandNode::KeepDelimiter => Command::KeepDelimiter,
            CommandNode::Redo => Command::Redo,
            CommandNode::NoKeyword => Command::NoKeyword,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransitionError;
    use crate::grammar::{Grammar, PaintMode};
    use luddite_common::StyleRef;
    use serde_json::json;

    fn process(value: serde_json::Value) -> (CompilerSession, GrammarResult<Family>) {
        let grammar: Grammar = serde_json::from_value(value).unwrap();
        let mut session = CompilerSession::new();
        let result = TreeProcessor::new(&mut session).process_tree(&grammar.nodes, Family::Markup);
        (session, result)
    }

    #[test]
    fn test_family_switch_carries_out_of_module() {
        let (session, result) = process(json!([
            {"kind": "module", "children": [{"kind": "family", "name": "css"}]},
            {"kind": "state_block", "state": "IN_CSS_DEFAULT", "transitions": []}
        ]));
        assert_eq!(result.unwrap(), Family::Css);
        let id = session.state_id("IN_CSS_DEFAULT").unwrap();
        assert_eq!(session.family_owner(id), Ok(Family::Css));
    }

    #[test]
    fn test_unknown_family_keeps_context() {
        let (session, result) = process(json!([
            {"kind": "family", "name": "ssl"},
            {"kind": "family", "name": "cobol"}
        ]));
        assert_eq!(result.unwrap(), Family::Ssl);
        assert_eq!(session.unknown_families(), ["cobol".to_string()]);
    }

    #[test]
    fn test_duplicate_state_block_is_an_error() {
        let (_, result) = process(json!([
            {"kind": "state_block", "state": "IN_M_DEFAULT", "transitions": []},
            {"kind": "state_block", "state": "IN_M_DEFAULT", "transitions": []}
        ]));
        assert_eq!(result, Err(GrammarError::DuplicateStateBlock("IN_M_DEFAULT".into())));
    }

    #[test]
    fn test_conflicting_sublanguage() {
        let (_, result) = process(json!([
            {"kind": "family", "name": "ssl"},
            {"kind": "sublanguage", "name": "Ruby"},
            {"kind": "sublanguage", "name": "Ruby"},
            {"kind": "sublanguage", "name": "Python"}
        ]));
        assert!(matches!(result, Err(GrammarError::ConflictingSublanguage { family: Family::Ssl, .. })));
    }

    #[test]
    fn test_second_initial_is_ignored_with_warning() {
        let (session, result) = process(json!([
            {"kind": "initial", "state": "IN_M_DEFAULT"},
            {"kind": "initial", "state": "IN_M_OTHER"}
        ]));
        result.unwrap();
        let info = session.family_info(Family::Markup).unwrap();
        assert_eq!(info.initial, session.state_id("IN_M_DEFAULT"));
        assert_eq!(session.diagnostics().count(DiagnosticKind::IgnoredDeclaration), 1);
    }

    #[test]
    fn test_eof_synthesis_appends_transition() {
        let (session, result) = process(json!([
            {"kind": "state_block", "state": "IN_M_DEFAULT", "transitions": [
                {"match": {"type": "string", "value": "<"}, "target": "IN_M_TAG",
                 "commands": [{"command": "paint", "mode": "upto", "style": "SCE_UDL_M_DEFAULT"}]},
                {"match": {"type": "string", "value": "&"}, "target": "IN_M_ENTITY",
                 "commands": [{"command": "paint", "mode": "upto", "style": "SCE_UDL_M_DEFAULT"}]}
            ]}
        ]));
        result.unwrap();
        let id = session.state_id("IN_M_DEFAULT").unwrap();
        let block = session.block(id).unwrap();
        assert_eq!(block.len(), 3);
        assert!(block[2].matches_eof());
        assert_eq!(block[2].paint(PaintMode::Upto), Some(&StyleRef::from("SCE_UDL_M_DEFAULT")));
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn test_eof_synthesis_can_be_disabled() {
        let grammar: Grammar = serde_json::from_value(json!([
            {"kind": "state_block", "state": "S", "transitions": [
                {"match": {"type": "string", "value": "<"},
                 "commands": [{"command": "paint", "mode": "upto", "style": 0}]}
            ]}
        ]))
        .unwrap();
        let mut session = CompilerSession::new();
        TreeProcessor::new(&mut session).with_eof_synthesis(false).process_tree(&grammar.nodes, Family::Markup).unwrap();
        let id = session.state_id("S").unwrap();
        assert_eq!(session.block(id).unwrap().len(), 1);
    }

    #[test]
    fn test_push_and_pop_rejected_with_state_name() {
        let (_, result) = process(json!([
            {"kind": "state_block", "state": "IN_SSL_DEFAULT", "transitions": [
                {"match": {"type": "string", "value": "("},
                 "commands": [{"command": "push", "state": "IN_SSL_DEFAULT"}, {"command": "pop"}]}
            ]}
        ]));
        let Err(GrammarError::InvalidTransition { state, reason }) = result else {
            panic!("expected an invalid transition error");
        };
        assert_eq!(state, "IN_SSL_DEFAULT");
        assert_eq!(reason, TransitionError::PushAndPop);
    }
}
