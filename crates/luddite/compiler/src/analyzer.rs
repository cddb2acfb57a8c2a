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

//! Semantic checks over a processed grammar
//!
//! The checks run in a fixed order and every failure is collected, so one
//! run reports all problems with the grammar at once.

use crate::error::{GrammarError, GrammarResult};
use crate::session::CompilerSession;
use luddite_common::StyleRef;
use tracing::{debug, info};

/// Validates a populated session before emission
pub struct SemanticAnalyzer<'a> {
    session: &'a CompilerSession,
    failures: Vec<GrammarError>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(session: &'a CompilerSession) -> Self {
        Self { session, failures: Vec::new() }
    }

    /// Run every check; fails with all collected problems
    pub fn semantic_check(mut self) -> GrammarResult<()> {
        self.check_family_names();
        self.check_look_back_styles();
        self.check_keyword_styles();
        self.check_dangling_states();
        self.check_language();
        self.check_style_names();

        match self.failures.len() {
            0 => {
                info!(states = self.session.state_count(), "Semantic check passed");
                Ok(())
            }
            1 => Err(self.failures.remove(0)),
            _ => Err(GrammarError::SemanticCheck(self.failures)),
        }
    }

    fn check_family_names(&mut self) {
        for name in self.session.unknown_families() {
            self.failures.push(GrammarError::UnknownFamily(name.clone()));
        }
    }

    fn check_look_back_styles(&mut self) {
        for info in self.session.families().filter(|info| info.has_look_back()) {
            if info.start_style.is_none() {
                self.failures.push(GrammarError::LookBackWithoutStyle { family: info.family, missing: "start_style" });
            }
            if info.end_style.is_none() {
                self.failures.push(GrammarError::LookBackWithoutStyle { family: info.family, missing: "end_style" });
            }
        }
    }

    fn check_keyword_styles(&mut self) {
        for info in self.session.families() {
            if !info.keywords.is_empty() && info.keyword_style.is_none() {
                self.failures.push(GrammarError::KeywordsWithoutStyle(info.family));
            }
        }
    }

    fn check_dangling_states(&mut self) {
        for state in self.session.referenced_states() {
            if let Err(err) = self.session.family_owner(state) {
                debug!(state = %state, "Dangling state reference");
                self.failures.push(err);
            }
        }
    }

    fn check_language(&mut self) {
        if self.session.language().is_none() {
            self.failures.push(GrammarError::MissingLanguage);
        }
    }

    fn check_style_names(&mut self) {
        let mut unknown: Vec<(String, String)> = Vec::new();
        let mut note = |style: &StyleRef, context: String| {
            if style.resolve().is_none() {
                unknown.push((style.to_string(), context));
            }
        };

        for info in self.session.families() {
            for (style, context) in info.style_refs() {
                note(style, context);
            }
        }
        for (id, transitions) in self.session.blocks() {
            let state = self.session.state_name(id).unwrap_or("<unnamed>");
            for transition in transitions {
                for style in transition.style_refs() {
                    note(style, format!("state {state}"));
                }
            }
        }

        for (style, context) in unknown {
            self.failures.push(GrammarError::UnknownStyle { style, context });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::processor::TreeProcessor;
    use luddite_common::Family;
    use serde_json::json;

    fn check(value: serde_json::Value) -> GrammarResult<()> {
        let grammar: Grammar = serde_json::from_value(value).unwrap();
        let mut session = CompilerSession::new();
        TreeProcessor::new(&mut session).process_tree(&grammar.nodes, Family::Markup)?;
        SemanticAnalyzer::new(&session).semantic_check()
    }

    #[test]
    fn test_minimal_grammar_passes() {
        let result = check(json!([
            {"kind": "language", "name": "Mini"},
            {"kind": "state_block", "state": "IN_M_DEFAULT", "transitions": [
                {"match": {"type": "string", "value": "<"}, "target": "IN_M_DEFAULT",
                 "commands": [{"command": "paint", "mode": "upto", "style": "SCE_UDL_M_DEFAULT"}]}
            ]}
        ]));
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_dangling_state_named_in_error() {
        let err = check(json!([
            {"kind": "language", "name": "Mini"},
            {"kind": "state_block", "state": "IN_M_DEFAULT", "transitions": [
                {"match": {"type": "string", "value": "<"}, "target": "IN_M_TAG"}
            ]}
        ]))
        .unwrap_err();
        assert_eq!(err, GrammarError::DanglingState("IN_M_TAG".into()));
        assert!(err.to_string().contains("IN_M_TAG"));
    }

    #[test]
    fn test_all_failures_collected_in_order() {
        let err = check(json!([
            {"kind": "family", "name": "perl6"},
            {"kind": "family", "name": "ssl"},
            {"kind": "keyword_list", "keywords": ["def"]},
            {"kind": "token_check_block", "tests": [{"style": "SCE_UDL_SSL_DEFAULT", "action": "skip"}]},
            {"kind": "start_style", "style": "SCE_UDL_SSL_DEFAULT"}
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            GrammarError::SemanticCheck(vec![
                GrammarError::UnknownFamily("perl6".into()),
                GrammarError::LookBackWithoutStyle { family: Family::Ssl, missing: "end_style" },
                GrammarError::KeywordsWithoutStyle(Family::Ssl),
                GrammarError::MissingLanguage,
            ])
        );
    }

    #[test]
    fn test_unknown_style_name() {
        let err = check(json!([
            {"kind": "language", "name": "Mini"},
            {"kind": "state_block", "state": "S", "transitions": [
                {"match": {"type": "string", "value": "<"},
                 "commands": [{"command": "paint", "mode": "include", "style": "SCE_UDL_M_BOGUS"}]}
            ]}
        ]))
        .unwrap_err();
        assert!(matches!(err, GrammarError::UnknownStyle { ref style, .. } if style == "SCE_UDL_M_BOGUS"));
    }
}
