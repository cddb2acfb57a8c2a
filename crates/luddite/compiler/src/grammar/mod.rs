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

//! Parsed grammar tree
//!
//! The compiler does not read `.udl` source text. A separate parser produces
//! this tree, which is exchanged as JSON: every node is an object whose
//! `kind` field names the node type.

use luddite_common::{Selector, StyleRef, TestAction};
use serde::{Deserialize, Serialize};

use crate::error::CompileResult;

/// Root of a parsed grammar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grammar {
    pub nodes: Vec<GrammarNode>,
}

impl Grammar {
    pub fn new(nodes: Vec<GrammarNode>) -> Self {
        Self { nodes }
    }

    /// Parse a grammar tree from JSON
    pub fn from_json(text: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the tree as pretty-printed JSON
    pub fn to_json(&self) -> CompileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One grammar declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrammarNode {
    /// Included file or nested group of declarations
    Module { children: Vec<GrammarNode> },
    /// Named regex fragment for `$NAME` substitution
    Pattern { name: String, value: String },
    /// Switch the active family
    Family { name: String },
    /// Start state of the active family
    Initial { state: String },
    Language { name: String },
    Sublanguage { name: String },
    /// All transitions of one state
    StateBlock { state: String, transitions: Vec<TransitionNode> },
    KeywordList { keywords: Vec<String> },
    KeywordStyle { identifier_style: StyleRef, keyword_style: StyleRef },
    TokenCheckBlock {
        tests: Vec<TokenCheckNode>,
        #[serde(default)]
        default_action: Option<TestAction>,
    },
    StartStyle { style: StyleRef },
    EndStyle { style: StyleRef },
    Fold { text: String, style: StyleRef, value: i32 },
    Namespace { value: String },
    PublicId { value: String },
    SystemId { value: String },
}

/// One transition of a state block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionNode {
    #[serde(rename = "match")]
    pub matcher: MatchNode,
    #[serde(default)]
    pub token_check: bool,
    /// Destination state; absent means stay
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub commands: Vec<CommandNode>,
}

/// What a transition matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchNode {
    String {
        value: String,
    },
    Regex {
        pattern: String,
        #[serde(default)]
        ignore_case: bool,
    },
    Delimiter,
    Empty,
    Eof,
}

/// Paint command flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintMode {
    /// Paint text before the match
    Upto,
    /// Paint text through the end of the match
    Include,
}

/// Command attached to a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandNode {
    Paint { mode: PaintMode, style: StyleRef },
    Push { state: String },
    Pop,
    Replace { state: String },
    AtEol { state: String },
    SetDelimiter { group: u32 },
    SetOppositeDelimiter { group: u32 },
    ClearDelimiter,
    KeepDelimiter,
    Redo,
    NoKeyword,
}

/// One look-back test of a token-check block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenCheckNode {
    pub style: StyleRef,
    pub action: TestAction,
    #[serde(default)]
    pub selector: Selector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state_block() {
        let text = r#"[
            {"kind": "family", "name": "ssl"},
            {"kind": "state_block", "state": "IN_SSL_DEFAULT", "transitions": [
                {"match": {"type": "string", "value": "'#'"},
                 "target": "IN_SSL_COMMENT",
                 "commands": [{"command": "paint", "mode": "upto", "style": "SCE_UDL_SSL_DEFAULT"}]},
                {"match": {"type": "regex", "pattern": "\\d+", "ignore_case": true}, "token_check": true}
            ]}
        ]"#;
        let grammar = Grammar::from_json(text).unwrap();
        assert_eq!(grammar.nodes.len(), 2);
        let GrammarNode::StateBlock { transitions, .. } = &grammar.nodes[1] else {
            panic!("expected a state block");
        };
        assert_eq!(transitions[0].target.as_deref(), Some("IN_SSL_COMMENT"));
        assert_eq!(
            transitions[0].commands,
            vec![CommandNode::Paint { mode: PaintMode::Upto, style: StyleRef::from("SCE_UDL_SSL_DEFAULT") }]
        );
        assert!(transitions[1].token_check);
        assert_eq!(transitions[1].matcher, MatchNode::Regex { pattern: "\\d+".into(), ignore_case: true });
    }

    #[test]
    fn test_token_check_defaults() {
        let text = r#"[{"kind": "token_check_block", "tests": [
            {"style": "SCE_UDL_SSL_DEFAULT", "action": "skip"},
            {"style": 38, "action": "reject", "selector": {"strings": [")", "]"]}}
        ]}]"#;
        let grammar = Grammar::from_json(text).unwrap();
        let GrammarNode::TokenCheckBlock { tests, default_action } = &grammar.nodes[0] else {
            panic!("expected a token check block");
        };
        assert_eq!(*default_action, None);
        assert_eq!(tests[0].selector, Selector::All);
        assert_eq!(tests[1].style, StyleRef::Number(38));
        assert_eq!(tests[1].selector, Selector::Strings(vec![")".into(), "]".into()]));
    }

    #[test]
    fn test_unknown_node_kind_is_rejected() {
        assert!(Grammar::from_json(r#"[{"kind": "macro"}]"#).is_err());
    }
}
