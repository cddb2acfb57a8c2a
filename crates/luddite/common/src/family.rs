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

//! Lexer state families
//!
//! A UDL grammar partitions its lexer states into five fixed regions. The
//! numeric codes are part of the table wire format and must stay stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five top-level language regions of a UDL grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Markup,
    Css,
    Csl,
    Ssl,
    Template,
}

impl Family {
    /// All families in wire-code order
    pub const ALL: [Family; 5] = [Family::Markup, Family::Css, Family::Csl, Family::Ssl, Family::Template];

    /// Wire code of this family
    pub fn code(self) -> u8 {
        match self {
            Family::Markup => 0,
            Family::Css => 1,
            Family::Csl => 2,
            Family::Ssl => 3,
            Family::Template => 4,
        }
    }

    /// Look up a family by its wire code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Name as written in grammars
    pub fn name(self) -> &'static str {
        match self {
            Family::Markup => "markup",
            Family::Css => "css",
            Family::Csl => "csl",
            Family::Ssl => "ssl",
            Family::Template => "tpl",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a family name is not one of the known five
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown family name '{0}'")]
pub struct UnknownFamily(pub String);

impl FromStr for Family {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markup" | "m" => Ok(Family::Markup),
            "css" => Ok(Family::Css),
            "csl" => Ok(Family::Csl),
            "ssl" => Ok(Family::Ssl),
            "tpl" | "template" => Ok(Family::Template),
            _ => Err(UnknownFamily(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for family in Family::ALL {
            assert_eq!(Family::from_code(family.code()), Some(family));
        }
        assert_eq!(Family::from_code(5), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("SSL".parse::<Family>().unwrap(), Family::Ssl);
        assert_eq!("template".parse::<Family>().unwrap(), Family::Template);
        assert_eq!("tpl".parse::<Family>().unwrap(), Family::Template);
        assert!("javascript".parse::<Family>().is_err());
    }
}
