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

//! Indent computation
//!
//! `IndentEngine` answers one question per keystroke: what whitespace should a
//! new line at this position start with. The work is split into:
//!
//! - `walk`: the backward walk over lines, producing a `Resolution`
//! - rendering of that resolution into whitespace, done here

mod walk;

pub use walk::{Resolution, ScanWindow, WalkState};

use crate::buffer::BufferAccess;
use crate::config::IndentConfig;
use crate::error::{IndentError, IndentResult};
use crate::language::IndentLanguage;
use crate::token::line_tokens;
use std::cmp::Ordering;
use tracing::debug;
use walk::Walker;

/// Computes indentation for one language
#[derive(Debug, Clone)]
pub struct IndentEngine<L> {
    language: L,
    config: IndentConfig,
}

impl<L: IndentLanguage> IndentEngine<L> {
    pub fn new(language: L, config: IndentConfig) -> IndentResult<Self> {
        config.validate().map_err(IndentError::Configuration)?;
        Ok(Self { language, config })
    }

    pub fn language(&self) -> &L {
        &self.language
    }

    pub fn config(&self) -> &IndentConfig {
        &self.config
    }

    /// Indentation for a new line at `position`
    ///
    /// Never fails: internal errors are logged at debug level and yield an
    /// empty string.
    pub fn compute_indent<B: BufferAccess + ?Sized>(&self, buffer: &B, position: usize) -> String {
        match self.try_compute_indent(buffer, position) {
            Ok(indent) => indent,
            Err(err) => {
                debug!(language = self.language.name(), position, error = %err, "indent computation failed");
                String::new()
            }
        }
    }

    /// Indentation for a new line at `position`, reporting internal errors
    pub fn try_compute_indent<B: BufferAccess + ?Sized>(&self, buffer: &B, position: usize) -> IndentResult<String> {
        let length = buffer.length();
        if position > length {
            return Err(IndentError::PositionOutOfRange { position, length });
        }

        let line = buffer.line_from_position(position);
        let min_line = line.saturating_sub(self.config.scan_window);
        let line_start = buffer.position_from_line(line);
        let walker = Walker::new(buffer, &self.language, min_line);

        if walker.is_continuation_text(line_start, position) {
            return Ok(self.continuation(buffer, &walker, line, min_line));
        }

        let tokens = line_tokens(buffer, &self.language, line_start, position);
        if tokens.is_empty() && line > min_line && walker.ends_with_continuation(line - 1) {
            return Ok(self.continuation(buffer, &walker, line - 1, min_line));
        }

        let start = walker.start(line, tokens);
        let resolution = walker.run(start)?;
        debug!(?resolution, line, "indent resolved");

        let cursor = (line, position);
        Ok(self.render(buffer, resolution, cursor, min_line))
    }

    /// Indentation for the line after `line`, which ends in a continuation
    fn continuation<B: BufferAccess + ?Sized>(
        &self,
        buffer: &B,
        walker: &Walker<'_, B, L>,
        line: usize,
        min_line: usize,
    ) -> String {
        if line > min_line && walker.ends_with_continuation(line - 1) {
            return self.existing_indent(buffer, line, None);
        }
        let columns = self.indent_width(buffer, line) + self.config.continuation_indent * self.config.indent_width;
        self.config.render(columns)
    }

    /// Turn a resolution into whitespace
    fn render<B: BufferAccess + ?Sized>(
        &self,
        buffer: &B,
        resolution: Resolution,
        cursor: (usize, usize),
        min_line: usize,
    ) -> String {
        let unit = self.config.indent_width;
        let cursor_on = |line: usize| (line == cursor.0).then_some(cursor.1);

        match resolution {
            Resolution::Align { line, column } => {
                let limit = self.indent_width(buffer, line) + unit;
                self.config.render(column.min(limit))
            }
            Resolution::WindowExhausted { line } => self.existing_indent(buffer, line, cursor_on(line)),
            Resolution::Delta { line, delta } => match delta.cmp(&0) {
                Ordering::Equal => self.existing_indent(buffer, line, cursor_on(line)),
                Ordering::Greater => {
                    let levels = delta.unsigned_abs() as usize;
                    self.config.render(self.indent_width(buffer, line) + levels * unit)
                }
                Ordering::Less => {
                    let mut target = line;
                    let mut delta = delta;
                    while delta < 0 {
                        match buffer.fold_parent(target) {
                            Some(parent) if parent < target && parent >= min_line => {
                                target = parent;
                                delta += 1;
                            }
                            _ => break,
                        }
                    }
                    self.existing_indent(buffer, target, cursor_on(target))
                }
            },
        }
    }

    /// Leading whitespace of `line`, cut at the cursor when it sits inside it
    fn existing_indent<B: BufferAccess + ?Sized>(&self, buffer: &B, line: usize, cursor: Option<usize>) -> String {
        let start = buffer.position_from_line(line);
        let end = cursor.unwrap_or_else(|| buffer.line_end_position(line));
        let text = buffer.text_range(start, end);
        let body = text.trim_start_matches([' ', '\t']);
        text[..text.len() - body.len()].to_string()
    }

    /// Display width of the leading whitespace of `line`
    fn indent_width<B: BufferAccess + ?Sized>(&self, buffer: &B, line: usize) -> usize {
        let start = buffer.position_from_line(line);
        let whitespace = self.existing_indent(buffer, line, None);
        buffer.column(start + whitespace.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::StyledBuffer;
    use crate::ruby::{RubyLanguage, SCE_RB_DEFAULT, SCE_RB_IDENTIFIER, SCE_RB_OPERATOR, SCE_RB_WORD};

    fn engine() -> IndentEngine<RubyLanguage> {
        IndentEngine::new(RubyLanguage, IndentConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = IndentEngine::new(RubyLanguage, IndentConfig::default().with_indent_width(0)).unwrap_err();
        assert!(matches!(err, IndentError::Configuration(_)));
    }

    #[test]
    fn test_position_past_end_degrades_to_empty() {
        let buffer = StyledBuffer::from_runs([(SCE_RB_WORD, "def")]);
        assert!(matches!(
            engine().try_compute_indent(&buffer, 10),
            Err(IndentError::PositionOutOfRange { position: 10, length: 3 })
        ));
        assert_eq!(engine().compute_indent(&buffer, 10), "");
    }

    #[test]
    fn test_opener_adds_one_level() {
        let buffer = StyledBuffer::from_runs([
            (SCE_RB_DEFAULT, "  "),
            (SCE_RB_WORD, "def"),
            (SCE_RB_DEFAULT, " "),
            (SCE_RB_IDENTIFIER, "foo"),
        ]);
        assert_eq!(engine().compute_indent(&buffer, buffer.length()), "      ");
    }

    #[test]
    fn test_delta_zero_truncated_at_cursor() {
        let buffer = StyledBuffer::from_runs([(SCE_RB_DEFAULT, "    "), (SCE_RB_IDENTIFIER, "x")]);
        assert_eq!(engine().compute_indent(&buffer, 2), "  ");
        assert_eq!(engine().compute_indent(&buffer, buffer.length()), "    ");
    }

    #[test]
    fn test_align_clamped_to_one_level() {
        let buffer = StyledBuffer::from_runs([
            (SCE_RB_IDENTIFIER, "result"),
            (SCE_RB_DEFAULT, " "),
            (SCE_RB_OPERATOR, "="),
            (SCE_RB_DEFAULT, " "),
            (SCE_RB_IDENTIFIER, "f"),
            (SCE_RB_OPERATOR, "("),
        ]);
        assert_eq!(engine().compute_indent(&buffer, buffer.length()), "    ");
    }

    #[test]
    fn test_inverted_brace_match_degrades() {
        struct Backwards(StyledBuffer);

        impl BufferAccess for Backwards {
            fn length(&self) -> usize {
                self.0.length()
            }
            fn line_count(&self) -> usize {
                self.0.line_count()
            }
            fn text_range(&self, start: usize, end: usize) -> String {
                self.0.text_range(start, end)
            }
            fn line_from_position(&self, position: usize) -> usize {
                self.0.line_from_position(position)
            }
            fn position_from_line(&self, line: usize) -> usize {
                self.0.position_from_line(line)
            }
            fn line_end_position(&self, line: usize) -> usize {
                self.0.line_end_position(line)
            }
            fn column(&self, position: usize) -> usize {
                self.0.column(position)
            }
            fn fold_parent(&self, line: usize) -> Option<usize> {
                self.0.fold_parent(line)
            }
            fn brace_match(&self, position: usize) -> Option<usize> {
                Some(position + 1)
            }
            fn style_at(&self, position: usize) -> u8 {
                self.0.style_at(position)
            }
            fn char_at(&self, position: usize) -> Option<char> {
                self.0.char_at(position)
            }
        }

        let buffer = Backwards(StyledBuffer::from_runs([(SCE_RB_DEFAULT, "  "), (SCE_RB_OPERATOR, ")")]));
        assert!(matches!(
            engine().try_compute_indent(&buffer, 3),
            Err(IndentError::BraceMismatch { closer: 2, opener: 3 })
        ));
        assert_eq!(engine().compute_indent(&buffer, 3), "");
    }
}
