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

//! Ruby indent rules

use crate::language::{IndentLanguage, KeywordClass, StyleClass};
use luddite_common::StyleId;

pub const SCE_RB_DEFAULT: StyleId = 0;
pub const SCE_RB_ERROR: StyleId = 1;
pub const SCE_RB_COMMENTLINE: StyleId = 2;
pub const SCE_RB_POD: StyleId = 3;
pub const SCE_RB_NUMBER: StyleId = 4;
pub const SCE_RB_WORD: StyleId = 5;
pub const SCE_RB_STRING: StyleId = 6;
pub const SCE_RB_CHARACTER: StyleId = 7;
pub const SCE_RB_CLASSNAME: StyleId = 8;
pub const SCE_RB_DEFNAME: StyleId = 9;
pub const SCE_RB_OPERATOR: StyleId = 10;
pub const SCE_RB_IDENTIFIER: StyleId = 11;
pub const SCE_RB_REGEX: StyleId = 12;
pub const SCE_RB_GLOBAL: StyleId = 13;
pub const SCE_RB_SYMBOL: StyleId = 14;
pub const SCE_RB_MODULE_NAME: StyleId = 15;
pub const SCE_RB_INSTANCE_VAR: StyleId = 16;
pub const SCE_RB_CLASS_VAR: StyleId = 17;
pub const SCE_RB_BACKTICKS: StyleId = 18;
pub const SCE_RB_DATASECTION: StyleId = 19;
pub const SCE_RB_HERE_DELIM: StyleId = 20;
pub const SCE_RB_HERE_Q: StyleId = 21;
pub const SCE_RB_HERE_QQ: StyleId = 22;
pub const SCE_RB_HERE_QX: StyleId = 23;
pub const SCE_RB_STRING_Q: StyleId = 24;
pub const SCE_RB_STRING_QQ: StyleId = 25;
pub const SCE_RB_STRING_QX: StyleId = 26;
pub const SCE_RB_STRING_QR: StyleId = 27;
pub const SCE_RB_STRING_QW: StyleId = 28;
pub const SCE_RB_WORD_DEMOTED: StyleId = 29;

/// Ruby as lexed by the SCE_RB_* styles
#[derive(Debug, Clone, Copy, Default)]
pub struct RubyLanguage;

impl RubyLanguage {
    pub fn new() -> Self {
        Self
    }
}

impl IndentLanguage for RubyLanguage {
    fn name(&self) -> &str {
        "Ruby"
    }

    fn classify(&self, style: StyleId) -> StyleClass {
        match style {
            SCE_RB_DEFAULT => StyleClass::Default,
            SCE_RB_COMMENTLINE | SCE_RB_POD => StyleClass::Comment,
            SCE_RB_WORD => StyleClass::Keyword,
            SCE_RB_WORD_DEMOTED => StyleClass::ModifiedKeyword,
            SCE_RB_OPERATOR => StyleClass::Operator,
            SCE_RB_STRING | SCE_RB_CHARACTER | SCE_RB_REGEX | SCE_RB_BACKTICKS => StyleClass::String,
            SCE_RB_HERE_DELIM..=SCE_RB_STRING_QW => StyleClass::String,
            _ => StyleClass::Other,
        }
    }

    fn is_multiline_style(&self, style: StyleId) -> bool {
        matches!(
            style,
            SCE_RB_STRING | SCE_RB_CHARACTER | SCE_RB_REGEX | SCE_RB_BACKTICKS | SCE_RB_HERE_Q..=SCE_RB_STRING_QW
        )
    }

    fn keyword_class(&self, keyword: &str) -> Option<KeywordClass> {
        let class = match keyword {
            "end" => KeywordClass::Ender,
            "else" | "elsif" | "ensure" | "rescue" | "when" => KeywordClass::Slider,
            "break" | "redo" | "next" | "raise" | "retry" | "return" => KeywordClass::Dedenter,
            "begin" | "class" | "def" | "for" | "module" | "case" | "if" | "unless" | "until" | "while" => {
                KeywordClass::LimitedOpener
            }
            "do" => KeywordClass::EndingOpener,
            _ => return None,
        };
        Some(class)
    }

    fn is_looper(&self, keyword: &str) -> bool {
        matches!(keyword, "for" | "while" | "until")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_classes() {
        let ruby = RubyLanguage::new();
        assert_eq!(ruby.keyword_class("end"), Some(KeywordClass::Ender));
        assert_eq!(ruby.keyword_class("rescue"), Some(KeywordClass::Slider));
        assert_eq!(ruby.keyword_class("return"), Some(KeywordClass::Dedenter));
        assert_eq!(ruby.keyword_class("module"), Some(KeywordClass::LimitedOpener));
        assert_eq!(ruby.keyword_class("do"), Some(KeywordClass::EndingOpener));
        assert_eq!(ruby.keyword_class("puts"), None);
        assert!(ruby.is_looper("until"));
        assert!(!ruby.is_looper("if"));
    }

    #[test]
    fn test_style_classes() {
        let ruby = RubyLanguage::new();
        assert_eq!(ruby.classify(SCE_RB_POD), StyleClass::Comment);
        assert_eq!(ruby.classify(SCE_RB_WORD_DEMOTED), StyleClass::ModifiedKeyword);
        assert_eq!(ruby.classify(SCE_RB_HERE_DELIM), StyleClass::String);
        assert_eq!(ruby.classify(SCE_RB_IDENTIFIER), StyleClass::Other);
        assert!(ruby.is_multiline_style(SCE_RB_HERE_QQ));
        assert!(!ruby.is_multiline_style(SCE_RB_HERE_DELIM));
        assert!(ruby.is_statement_separator(SCE_RB_OPERATOR, ";"));
        assert!(!ruby.is_statement_separator(SCE_RB_STRING, ";"));
    }
}
