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

//! Per-family declarations

use crate::error::{GrammarError, GrammarResult};
use luddite_common::{Family, Selector, StateId, StyleRef, TestAction};
use std::collections::BTreeMap;

/// Fold toggle as declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipperDef {
    pub text: String,
    pub style: StyleRef,
    pub value: i32,
}

/// Look-back test as declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookBackRule {
    pub style: StyleRef,
    pub action: TestAction,
    pub selector: Selector,
}

/// Everything a grammar declares for one family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyInfo {
    pub family: Family,
    /// Named regex fragments, quote-stripped
    pub patterns: BTreeMap<String, String>,
    pub initial: Option<StateId>,
    pub sublanguage: Option<String>,
    pub keywords: Vec<String>,
    /// Identifier style and keyword style
    pub keyword_style: Option<(StyleRef, StyleRef)>,
    pub look_back: Vec<LookBackRule>,
    pub default_action: Option<TestAction>,
    pub start_style: Option<StyleRef>,
    pub end_style: Option<StyleRef>,
    pub flippers: Vec<FlipperDef>,
}

impl FamilyInfo {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            patterns: BTreeMap::new(),
            initial: None,
            sublanguage: None,
            keywords: Vec::new(),
            keyword_style: None,
            look_back: Vec::new(),
            default_action: None,
            start_style: None,
            end_style: None,
            flippers: Vec::new(),
        }
    }

    /// Register a pattern. Returns false when an identical definition
    /// already existed.
    pub fn add_pattern(&mut self, name: &str, value: &str) -> GrammarResult<bool> {
        let value = strip_quotes(value);
        match self.patterns.get(name) {
            Some(existing) if existing == value => Ok(false),
            Some(existing) => Err(GrammarError::ConflictingPattern {
                family: self.family,
                name: name.to_string(),
                existing: existing.clone(),
                new: value.to_string(),
            }),
            None => {
                self.patterns.insert(name.to_string(), value.to_string());
                Ok(true)
            }
        }
    }

    /// Assign the sublanguage once; the same name again is accepted
    pub fn set_sublanguage(&mut self, name: &str) -> GrammarResult<()> {
        match &self.sublanguage {
            Some(existing) if existing != name => Err(GrammarError::ConflictingSublanguage {
                family: self.family,
                existing: existing.clone(),
                new: name.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.sublanguage = Some(name.to_string());
                Ok(())
            }
        }
    }

    /// Set the start state unless one is already set. Returns whether it took.
    pub fn set_initial(&mut self, state: StateId) -> bool {
        if self.initial.is_some() {
            return false;
        }
        self.initial = Some(state);
        true
    }

    pub fn has_look_back(&self) -> bool {
        !self.look_back.is_empty()
    }

    /// Every style reference this family declares, with a description
    pub fn style_refs(&self) -> Vec<(&StyleRef, String)> {
        let mut refs = Vec::new();
        if let Some((identifier, keyword)) = &self.keyword_style {
            refs.push((identifier, format!("keyword_style of {}", self.family)));
            refs.push((keyword, format!("keyword_style of {}", self.family)));
        }
        if let Some(style) = &self.start_style {
            refs.push((style, format!("start_style of {}", self.family)));
        }
        if let Some(style) = &self.end_style {
            refs.push((style, format!("end_style of {}", self.family)));
        }
        for rule in &self.look_back {
            refs.push((&rule.style, format!("token_check of {}", self.family)));
        }
        for flipper in &self.flippers {
            refs.push((&flipper.style, format!("fold '{}' of {}", flipper.text, self.family)));
        }
        refs
    }
}

/// Remove one layer of matching single or double quotes
pub fn strip_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_first_write_wins() {
        let mut info = FamilyInfo::new(Family::Ssl);
        assert!(info.add_pattern("NAME", "'[a-z]+'").unwrap());
        assert!(!info.add_pattern("NAME", "[a-z]+").unwrap());
        let err = info.add_pattern("NAME", "[A-Z]+").unwrap_err();
        assert!(matches!(err, GrammarError::ConflictingPattern { .. }));
        assert_eq!(info.patterns["NAME"], "[a-z]+");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'abc'"), "abc");
        assert_eq!(strip_quotes("\"abc\""), "abc");
        assert_eq!(strip_quotes("'abc\""), "'abc\"");
        assert_eq!(strip_quotes("'"), "'");
        assert_eq!(strip_quotes("''"), "");
    }

    #[test]
    fn test_initial_first_write_wins() {
        let mut info = FamilyInfo::new(Family::Markup);
        assert!(info.set_initial(StateId(3)));
        assert!(!info.set_initial(StateId(4)));
        assert_eq!(info.initial, Some(StateId(3)));
    }
}
