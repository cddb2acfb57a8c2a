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

//! Host buffer primitives
//!
//! The engine only reads the buffer through `BufferAccess`. Positions are
//! byte offsets and lines are zero-based. `StyledBuffer` is an in-memory
//! implementation over a text and one style per byte.

use crate::error::{IndentError, IndentResult};
use luddite_common::StyleId;
use std::collections::HashMap;

/// Read-only view of a lexed editor buffer
pub trait BufferAccess {
    /// Length in bytes
    fn length(&self) -> usize;

    fn line_count(&self) -> usize;

    /// Text in `start..end`
    fn text_range(&self, start: usize, end: usize) -> String;

    fn line_from_position(&self, position: usize) -> usize;

    /// Position of the first byte of `line`
    fn position_from_line(&self, line: usize) -> usize;

    /// Position just before the end-of-line characters of `line`
    fn line_end_position(&self, line: usize) -> usize;

    /// Display column of `position`, with tabs expanded
    fn column(&self, position: usize) -> usize;

    /// Line heading the fold block that contains `line`
    fn fold_parent(&self, line: usize) -> Option<usize>;

    /// Position of the bracket matching the one at `position`
    fn brace_match(&self, position: usize) -> Option<usize>;

    fn style_at(&self, position: usize) -> StyleId;

    fn char_at(&self, position: usize) -> Option<char>;
}

/// Text plus per-byte styles
#[derive(Debug, Clone)]
pub struct StyledBuffer {
    text: String,
    styles: Vec<StyleId>,
    line_starts: Vec<usize>,
    tab_width: usize,
    fold_parents: HashMap<usize, Option<usize>>,
}

impl StyledBuffer {
    /// Create a buffer; `styles` must have one entry per byte of `text`
    pub fn new(text: impl Into<String>, styles: Vec<StyleId>) -> IndentResult<Self> {
        let text = text.into();
        if styles.len() != text.len() {
            return Err(IndentError::StyleLengthMismatch { bytes: text.len(), styles: styles.len() });
        }
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Ok(Self { text, styles, line_starts, tab_width: 8, fold_parents: HashMap::new() })
    }

    /// Build a buffer from consecutive styled runs
    pub fn from_runs<'a>(runs: impl IntoIterator<Item = (StyleId, &'a str)>) -> Self {
        let mut text = String::new();
        let mut styles = Vec::new();
        for (style, run) in runs {
            text.push_str(run);
            styles.extend(std::iter::repeat_n(style, run.len()));
        }
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self { text, styles, line_starts, tab_width: 8, fold_parents: HashMap::new() }
    }

    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.max(1);
        self
    }

    /// Override the fold parent of one line
    pub fn with_fold_parent(mut self, line: usize, parent: Option<usize>) -> Self {
        self.fold_parents.insert(line, parent);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text of `line` without its end-of-line characters
    pub fn line_text(&self, line: usize) -> &str {
        let start = self.position_from_line(line);
        let end = self.line_end_position(line);
        &self.text[start..end]
    }

    /// Indentation width of a line, or `None` when it is blank
    fn indent_of(&self, line: usize) -> Option<usize> {
        let text = self.line_text(line);
        let trimmed = text.trim_start_matches([' ', '\t']);
        if trimmed.is_empty() {
            return None;
        }
        let start = self.position_from_line(line);
        Some(self.column(start + text.len() - trimmed.len()))
    }
}

fn bracket_pair(ch: char) -> Option<(char, char, bool)> {
    match ch {
        '(' => Some(('(', ')', true)),
        '[' => Some(('[', ']', true)),
        '{' => Some(('{', '}', true)),
        ')' => Some(('(', ')', false)),
        ']' => Some(('[', ']', false)),
        '}' => Some(('{', '}', false)),
        _ => None,
    }
}

impl BufferAccess for StyledBuffer {
    fn length(&self) -> usize {
        self.text.len()
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn text_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.text.len());
        self.text.get(start.min(end)..end).unwrap_or_default().to_string()
    }

    fn line_from_position(&self, position: usize) -> usize {
        self.line_starts.partition_point(|start| *start <= position).saturating_sub(1)
    }

    fn position_from_line(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.text.len())
    }

    fn line_end_position(&self, line: usize) -> usize {
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        let start = self.position_from_line(line);
        if end > start && self.text.as_bytes()[end - 1] == b'\r' { end - 1 } else { end }
    }

    fn column(&self, position: usize) -> usize {
        let start = self.position_from_line(self.line_from_position(position));
        let mut column = 0;
        for ch in self.text_range(start, position).chars() {
            if ch == '\t' {
                column = (column / self.tab_width + 1) * self.tab_width;
            } else {
                column += 1;
            }
        }
        column
    }

    fn fold_parent(&self, line: usize) -> Option<usize> {
        if let Some(parent) = self.fold_parents.get(&line) {
            return *parent;
        }
        let own = self.indent_of(line).unwrap_or(usize::MAX);
        (0..line).rev().find(|candidate| self.indent_of(*candidate).is_some_and(|indent| indent < own))
    }

    fn brace_match(&self, position: usize) -> Option<usize> {
        let (open, close, forward) = bracket_pair(self.char_at(position)?)?;
        let style = self.style_at(position);
        let mut depth = 0usize;
        let same = |index: usize, ch: char| self.styles.get(index) == Some(&style) && (ch == open || ch == close);

        if forward {
            for (index, ch) in self.text[position..].char_indices().map(|(i, c)| (i + position, c)) {
                if !same(index, ch) {
                    continue;
                }
                if ch == open {
                    depth += 1;
                } else {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
            }
        } else {
            for (index, ch) in self.text[..=position].char_indices().rev() {
                if !same(index, ch) {
                    continue;
                }
                if ch == close {
                    depth += 1;
                } else {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
            }
        }
        None
    }

    fn style_at(&self, position: usize) -> StyleId {
        self.styles.get(position).copied().unwrap_or(0)
    }

    fn char_at(&self, position: usize) -> Option<char> {
        self.text.get(position..)?.chars().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> StyledBuffer {
        StyledBuffer::new(text, vec![0; text.len()]).unwrap()
    }

    #[test]
    fn test_line_geometry() {
        let buffer = plain("ab\r\ncd\n\nef");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.position_from_line(1), 4);
        assert_eq!(buffer.line_end_position(0), 2);
        assert_eq!(buffer.line_end_position(2), 7);
        assert_eq!(buffer.line_from_position(5), 1);
        assert_eq!(buffer.line_from_position(10), 3);
        assert_eq!(buffer.line_text(3), "ef");
    }

    #[test]
    fn test_column_expands_tabs() {
        let buffer = plain("\t x").with_tab_width(4);
        assert_eq!(buffer.column(2), 5);
    }

    #[test]
    fn test_style_length_checked() {
        assert_eq!(
            StyledBuffer::new("abc", vec![0; 2]).unwrap_err(),
            IndentError::StyleLengthMismatch { bytes: 3, styles: 2 }
        );
    }

    #[test]
    fn test_brace_match_respects_style() {
        // the middle ")" is styled as string and must be skipped
        let buffer = StyledBuffer::from_runs([(10, "("), (6, "\")\""), (10, ")")]);
        assert_eq!(buffer.brace_match(0), Some(4));
        assert_eq!(buffer.brace_match(4), Some(0));
        assert_eq!(plain("(()").brace_match(0), None);
        assert_eq!(plain("abc").brace_match(1), None);
    }

    #[test]
    fn test_fold_parent_from_indentation() {
        let buffer = plain("if x\n  foo\n\n  end\nbar");
        assert_eq!(buffer.fold_parent(1), Some(0));
        assert_eq!(buffer.fold_parent(3), Some(0));
        assert_eq!(buffer.fold_parent(2), Some(1));
        assert_eq!(buffer.fold_parent(4), None);
        assert_eq!(buffer.with_fold_parent(3, None).fold_parent(3), None);
    }
}
