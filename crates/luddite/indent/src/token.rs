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

//! Line tokenization
//!
//! Tokens are re-derived from the buffer on every call and never cached.

use crate::buffer::BufferAccess;
use crate::language::{IndentLanguage, StyleClass};
use luddite_common::StyleId;

/// A styled run of text at an absolute buffer position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub style: StyleId,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }
}

/// Significant tokens of `start..end`
///
/// Runs of one style form a token, except that each operator character is a
/// token of its own. Comments are dropped, as is whitespace in the default
/// style.
pub fn line_tokens<B, L>(buffer: &B, language: &L, start: usize, end: usize) -> Vec<Token>
where
    B: BufferAccess + ?Sized,
    L: IndentLanguage + ?Sized,
{
    let text = buffer.text_range(start, end);
    let mut tokens: Vec<Token> = Vec::new();
    let mut current: Option<Token> = None;

    for (offset, ch) in text.char_indices() {
        let position = start + offset;
        let style = buffer.style_at(position);
        let class = language.classify(style);

        let skip = class == StyleClass::Comment || (class == StyleClass::Default && ch.is_whitespace());
        let single = class == StyleClass::Operator;
        let extends = !skip && !single && current.as_ref().is_some_and(|token| token.style == style);

        if extends {
            if let Some(token) = current.as_mut() {
                token.text.push(ch);
            }
            continue;
        }
        tokens.extend(current.take());
        if skip {
            continue;
        }
        let token = Token { style, text: ch.to_string(), position };
        if single {
            tokens.push(token);
        } else {
            current = Some(token);
        }
    }
    tokens.extend(current);
    tokens
}
