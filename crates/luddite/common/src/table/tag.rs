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

//! Record tags of the table wire format
//!
//! Each line of a resource stream starts with one of these codes. Codes are
//! grouped by area: header and scratch buffer (1-9), family data (10-19),
//! look-back tests (20-29), unique states (30-39), transitions (40-49).

use std::fmt;

/// Record kind of one wire-format line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TableTag {
    Version = 1,
    ScratchBufferStart = 2,
    ScratchBufferAppend = 3,
    Language = 4,

    FamilyInfo = 10,
    FamilySublanguage = 11,
    FamilyColor = 12,
    FamilyKeyword = 13,
    FlipperCount = 14,
    FamilyOperator = 15,
    FamilyStyle = 16,

    LookBackCreate = 20,
    LookBackInit = 21,
    LookBackCount = 22,
    LookBackGet = 23,
    LookBackActionStyle = 24,
    LookBackWordlist = 25,
    LookBackStrings = 26,
    LookBackTest = 27,
    LookBackDefault = 28,

    UniqueState = 30,

    TransitionBlockCreate = 40,
    TransitionBlockGet = 41,
    TransitionAppend = 42,
    PushState = 43,
    PopState = 44,
    ReplaceState = 45,
    EolTransition = 46,
    DelimiterSet = 47,
    DelimiterClear = 48,
    DelimiterKeep = 49,
}

impl TableTag {
    /// Numeric code written on the wire
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code
    pub fn from_code(code: u8) -> Option<Self> {
        use TableTag::*;
        let tag = match code {
            1 => Version,
            2 => ScratchBufferStart,
            3 => ScratchBufferAppend,
            4 => Language,
            10 => FamilyInfo,
            11 => FamilySublanguage,
            12 => FamilyColor,
            13 => FamilyKeyword,
            14 => FlipperCount,
            15 => FamilyOperator,
            16 => FamilyStyle,
            20 => LookBackCreate,
            21 => LookBackInit,
            22 => LookBackCount,
            23 => LookBackGet,
            24 => LookBackActionStyle,
            25 => LookBackWordlist,
            26 => LookBackStrings,
            27 => LookBackTest,
            28 => LookBackDefault,
            30 => UniqueState,
            40 => TransitionBlockCreate,
            41 => TransitionBlockGet,
            42 => TransitionAppend,
            43 => PushState,
            44 => PopState,
            45 => ReplaceState,
            46 => EolTransition,
            47 => DelimiterSet,
            48 => DelimiterClear,
            49 => DelimiterKeep,
            _ => return None,
        };
        Some(tag)
    }

    /// Builder method name used by the C-call-sequence output
    pub fn call_name(self) -> &'static str {
        use TableTag::*;
        match self {
            Version => "setVersion",
            ScratchBufferStart => "scratchBufferStart",
            ScratchBufferAppend => "scratchBufferAppend",
            Language => "setLanguage",
            FamilyInfo => "setFamilyInfo",
            FamilySublanguage => "setFamilySublanguage",
            FamilyColor => "setFamilyColor",
            FamilyKeyword => "addFamilyKeyword",
            FlipperCount => "setFlipperCount",
            FamilyOperator => "setFamilyOperator",
            FamilyStyle => "setFamilyStyle",
            LookBackCreate => "createLookBackTests",
            LookBackInit => "initLookBackTests",
            LookBackCount => "setLookBackTestCount",
            LookBackGet => "getLookBackTest",
            LookBackActionStyle => "setLookBackActionStyle",
            LookBackWordlist => "addLookBackWord",
            LookBackStrings => "addLookBackString",
            LookBackTest => "finishLookBackTest",
            LookBackDefault => "setLookBackDefault",
            UniqueState => "addUniqueState",
            TransitionBlockCreate => "createTransitionBlock",
            TransitionBlockGet => "getTransitionBlock",
            TransitionAppend => "appendTransition",
            PushState => "setPushState",
            PopState => "setPopState",
            ReplaceState => "setReplaceState",
            EolTransition => "setEolTransition",
            DelimiterSet => "setDelimiter",
            DelimiterClear => "clearDelimiter",
            DelimiterKeep => "keepDelimiter",
        }
    }

    /// Whether the record consumes the staged scratch buffer
    pub fn takes_scratch(self) -> bool {
        matches!(
            self,
            TableTag::Language
                | TableTag::FamilySublanguage
                | TableTag::FamilyKeyword
                | TableTag::FamilyOperator
                | TableTag::LookBackWordlist
                | TableTag::LookBackStrings
        )
    }
}

impl fmt::Display for TableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.call_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_decodes_to_itself() {
        for code in 0..=u8::MAX {
            if let Some(tag) = TableTag::from_code(code) {
                assert_eq!(tag.code(), code);
            }
        }
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(TableTag::from_code(0), None);
        assert_eq!(TableTag::from_code(5), None);
        assert_eq!(TableTag::from_code(50), None);
    }
}
