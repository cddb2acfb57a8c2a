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

//! UDL style constants
//!
//! Grammars paint text with named styles; the runtime lexer works with the
//! numeric values. The table below is shared by both sides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric rendering style
pub type StyleId = u8;

/// Named UDL styles and their numeric values
pub const UDL_STYLES: &[(&str, StyleId)] = &[
    ("SCE_UDL_M_DEFAULT", 0),
    ("SCE_UDL_M_STAGO", 1),
    ("SCE_UDL_M_TAGNAME", 2),
    ("SCE_UDL_M_TAGSPACE", 3),
    ("SCE_UDL_M_ATTRNAME", 4),
    ("SCE_UDL_M_OPERATOR", 5),
    ("SCE_UDL_M_STAGC", 6),
    ("SCE_UDL_M_EMP_TAGC", 7),
    ("SCE_UDL_M_STRING", 8),
    ("SCE_UDL_M_ETAGO", 9),
    ("SCE_UDL_M_ETAGC", 10),
    ("SCE_UDL_M_ENTITY", 11),
    ("SCE_UDL_M_PI", 12),
    ("SCE_UDL_M_CDATA", 13),
    ("SCE_UDL_M_COMMENT", 14),
    ("SCE_UDL_CSS_DEFAULT", 15),
    ("SCE_UDL_CSS_COMMENT", 16),
    ("SCE_UDL_CSS_NUMBER", 17),
    ("SCE_UDL_CSS_STRING", 18),
    ("SCE_UDL_CSS_WORD", 19),
    ("SCE_UDL_CSS_IDENTIFIER", 20),
    ("SCE_UDL_CSS_OPERATOR", 21),
    ("SCE_UDL_CSL_DEFAULT", 22),
    ("SCE_UDL_CSL_COMMENT", 23),
    ("SCE_UDL_CSL_COMMENTBLOCK", 24),
    ("SCE_UDL_CSL_NUMBER", 25),
    ("SCE_UDL_CSL_STRING", 26),
    ("SCE_UDL_CSL_WORD", 27),
    ("SCE_UDL_CSL_IDENTIFIER", 28),
    ("SCE_UDL_CSL_OPERATOR", 29),
    ("SCE_UDL_CSL_REGEX", 30),
    ("SCE_UDL_SSL_DEFAULT", 31),
    ("SCE_UDL_SSL_COMMENT", 32),
    ("SCE_UDL_SSL_COMMENTBLOCK", 33),
    ("SCE_UDL_SSL_NUMBER", 34),
    ("SCE_UDL_SSL_STRING", 35),
    ("SCE_UDL_SSL_WORD", 36),
    ("SCE_UDL_SSL_IDENTIFIER", 37),
    ("SCE_UDL_SSL_OPERATOR", 38),
    ("SCE_UDL_SSL_REGEX", 39),
    ("SCE_UDL_SSL_VARIABLE", 40),
    ("SCE_UDL_TPL_DEFAULT", 41),
    ("SCE_UDL_TPL_COMMENT", 42),
    ("SCE_UDL_TPL_COMMENTBLOCK", 43),
    ("SCE_UDL_TPL_NUMBER", 44),
    ("SCE_UDL_TPL_STRING", 45),
    ("SCE_UDL_TPL_WORD", 46),
    ("SCE_UDL_TPL_IDENTIFIER", 47),
    ("SCE_UDL_TPL_OPERATOR", 48),
    ("SCE_UDL_TPL_VARIABLE", 49),
];

/// Resolve a style name to its numeric value
pub fn style_by_name(name: &str) -> Option<StyleId> {
    UDL_STYLES.iter().find(|(n, _)| *n == name).map(|(_, id)| *id)
}

/// Name of a numeric style, if it is a known UDL style
pub fn style_name(id: StyleId) -> Option<&'static str> {
    UDL_STYLES.iter().find(|(_, v)| *v == id).map(|(n, _)| *n)
}

/// A style as written in a grammar: a UDL style name or a bare number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleRef {
    Number(StyleId),
    Name(String),
}

impl StyleRef {
    /// Numeric value of this style, or `None` for an unknown name
    pub fn resolve(&self) -> Option<StyleId> {
        match self {
            StyleRef::Number(id) => Some(*id),
            StyleRef::Name(name) => style_by_name(name),
        }
    }
}

impl From<&str> for StyleRef {
    fn from(name: &str) -> Self {
        StyleRef::Name(name.to_string())
    }
}

impl fmt::Display for StyleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleRef::Number(id) => write!(f, "{id}"),
            StyleRef::Name(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_lookup() {
        assert_eq!(style_by_name("SCE_UDL_SSL_DEFAULT"), Some(31));
        assert_eq!(style_by_name("SCE_UDL_TPL_VARIABLE"), Some(49));
        assert_eq!(style_name(21), Some("SCE_UDL_CSS_OPERATOR"));
        assert_eq!(style_by_name("SCE_UDL_SSL_NOPE"), None);
    }

    #[test]
    fn test_style_values_are_dense() {
        for (index, (_, id)) in UDL_STYLES.iter().enumerate() {
            assert_eq!(index, *id as usize);
        }
    }

    #[test]
    fn test_style_ref_resolve() {
        assert_eq!(StyleRef::from("SCE_UDL_M_COMMENT").resolve(), Some(14));
        assert_eq!(StyleRef::Number(7).resolve(), Some(7));
        assert_eq!(StyleRef::from("bogus").resolve(), None);
    }
}
