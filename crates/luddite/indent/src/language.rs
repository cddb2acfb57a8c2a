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

//! Language rules consulted by the indent engine

use luddite_common::StyleId;

/// Coarse class of a lexer style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    /// Whitespace and plain code
    Default,
    /// Comments and embedded documentation, never significant
    Comment,
    Keyword,
    /// A keyword used as a statement modifier (`foo if bar`)
    ModifiedKeyword,
    Operator,
    String,
    /// Identifiers, numbers and everything else
    Other,
}

/// Role a keyword plays in the indent delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordClass {
    /// Closes a block (`end`)
    Ender,
    /// Continues a block at the opener's level (`else`, `when`)
    Slider,
    /// Leaves the current block (`return`, `break`)
    Dedenter,
    /// Opens a block closed by an ender (`def`, `if`)
    LimitedOpener,
    /// Opens a block unless it follows a loop header (`do`)
    EndingOpener,
}

/// Style and keyword knowledge for one language
pub trait IndentLanguage {
    fn name(&self) -> &str;

    /// Class of a lexer style
    fn classify(&self, style: StyleId) -> StyleClass;

    /// Whether a run of this style may span lines
    fn is_multiline_style(&self, style: StyleId) -> bool;

    fn keyword_class(&self, keyword: &str) -> Option<KeywordClass>;

    /// Loop headers whose `do` is optional noise
    fn is_looper(&self, keyword: &str) -> bool;

    /// Token that ends a statement on the same line
    fn is_statement_separator(&self, style: StyleId, text: &str) -> bool {
        self.classify(style) == StyleClass::Operator && text == ";"
    }
}
