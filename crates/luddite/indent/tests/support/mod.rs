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

//! A rough Ruby styler for building test buffers
//!
//! Good enough for keywords, modifiers, comments, operators and quoted
//! strings that span lines. Escapes and heredocs are not handled.

use luddite_indent::StyledBuffer;
use luddite_indent::ruby::{
    SCE_RB_COMMENTLINE, SCE_RB_DEFAULT, SCE_RB_IDENTIFIER, SCE_RB_NUMBER, SCE_RB_OPERATOR, SCE_RB_STRING, SCE_RB_WORD,
    SCE_RB_WORD_DEMOTED,
};

const KEYWORDS: &[&str] = &[
    "begin", "break", "case", "class", "def", "do", "else", "elsif", "end", "ensure", "for", "if", "in", "module",
    "next", "nil", "raise", "redo", "rescue", "retry", "return", "then", "unless", "until", "when", "while", "yield",
];

const MODIFIERS: &[&str] = &["if", "unless", "while", "until", "rescue"];

pub fn ruby_buffer(text: &str) -> StyledBuffer {
    StyledBuffer::new(text, ruby_styles(text)).unwrap()
}

pub fn ruby_styles(text: &str) -> Vec<u8> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut styles = vec![SCE_RB_DEFAULT; text.len()];
    let mut paint = |from: usize, to: usize, style: u8| styles[from..to].fill(style);
    let byte_end = |index: usize| chars.get(index).map_or(text.len(), |(offset, _)| *offset);

    let mut index = 0;
    let mut line_has_code = false;
    while index < chars.len() {
        let (offset, ch) = chars[index];
        if ch == '\n' {
            line_has_code = false;
            index += 1;
            continue;
        }
        if ch == '#' {
            let end = (index..chars.len()).find(|i| chars[*i].1 == '\n').unwrap_or(chars.len());
            paint(offset, byte_end(end), SCE_RB_COMMENTLINE);
            index = end;
            continue;
        }
        if ch == '"' || ch == '\'' {
            let close = (index + 1..chars.len()).find(|i| chars[*i].1 == ch);
            let end = close.map_or(chars.len(), |i| i + 1);
            paint(offset, byte_end(end), SCE_RB_STRING);
            line_has_code = true;
            index = end;
            continue;
        }
        if ch.is_alphabetic() || ch == '_' {
            let end = (index..chars.len())
                .find(|i| {
                    let c = chars[*i].1;
                    !(c.is_alphanumeric() || c == '_' || c == '?' || c == '!')
                })
                .unwrap_or(chars.len());
            let word: String = chars[index..end].iter().map(|(_, c)| c).collect();
            let style = if !KEYWORDS.contains(&word.as_str()) {
                SCE_RB_IDENTIFIER
            } else if line_has_code && MODIFIERS.contains(&word.as_str()) {
                SCE_RB_WORD_DEMOTED
            } else {
                SCE_RB_WORD
            };
            paint(offset, byte_end(end), style);
            line_has_code = true;
            index = end;
            continue;
        }
        let style = if ch.is_ascii_digit() {
            SCE_RB_NUMBER
        } else if ch.is_whitespace() || ch == '\\' {
            SCE_RB_DEFAULT
        } else {
            SCE_RB_OPERATOR
        };
        paint(offset, byte_end(index + 1), style);
        if !ch.is_whitespace() {
            line_has_code = true;
        }
        index += 1;
    }
    styles
}
