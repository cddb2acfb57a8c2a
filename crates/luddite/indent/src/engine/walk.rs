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

//! Backward walk state machine
//!
//! The walk starts on the cursor line and moves to earlier lines only by
//! explicit jumps: to a continued line, to the opener of a closing bracket,
//! or to the start of a multi-line string. Every jump lands strictly before
//! the current position and never below `min_line`.

use crate::buffer::BufferAccess;
use crate::error::{IndentError, IndentResult};
use crate::language::{IndentLanguage, KeywordClass, StyleClass};
use crate::token::{Token, line_tokens};
use tracing::trace;

/// Tokens of one line still to be scanned, right to left
#[derive(Debug, Clone)]
pub struct ScanWindow {
    pub line: usize,
    pub tokens: Vec<Token>,
    /// Tokens `0..remaining` have not been scanned yet
    pub remaining: usize,
}

impl ScanWindow {
    fn whole(line: usize, tokens: Vec<Token>) -> Self {
        let remaining = tokens.len();
        Self { line, tokens, remaining }
    }

    /// Resume before the token at `position`
    fn before(line: usize, tokens: Vec<Token>, position: usize) -> Self {
        let remaining = tokens.iter().take_while(|token| token.position < position).count();
        Self { line, tokens, remaining }
    }
}

/// Where the walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Line up one column past an opening bracket
    Align { line: usize, column: usize },
    /// Indent relative to `line` by `delta` levels
    Delta { line: usize, delta: i32 },
    /// The scan window ran out at `line`
    WindowExhausted { line: usize },
}

#[derive(Debug, Clone)]
pub enum WalkState {
    ScanningLine(ScanWindow),
    ContinuationClimb { line: usize },
    BracketMatch { window: ScanWindow, closer: usize },
    Resolved(Resolution),
}

pub struct Walker<'a, B: ?Sized, L: ?Sized> {
    buffer: &'a B,
    language: &'a L,
    min_line: usize,
    delta: i32,
}

impl<'a, B, L> Walker<'a, B, L>
where
    B: BufferAccess + ?Sized,
    L: IndentLanguage + ?Sized,
{
    pub fn new(buffer: &'a B, language: &'a L, min_line: usize) -> Self {
        Self { buffer, language, min_line, delta: 0 }
    }

    /// Run the walk from `start` until it resolves
    pub fn run(mut self, start: WalkState) -> IndentResult<Resolution> {
        let mut state = start;
        loop {
            state = match state {
                WalkState::ScanningLine(window) => self.scan(window),
                WalkState::ContinuationClimb { line } => self.climb(line),
                WalkState::BracketMatch { window, closer } => self.match_bracket(window, closer)?,
                WalkState::Resolved(resolution) => return Ok(resolution),
            };
        }
    }

    /// Initial state for a cursor line whose text before the cursor is `tokens`
    pub fn start(&self, line: usize, tokens: Vec<Token>) -> WalkState {
        if !tokens.is_empty() {
            return WalkState::ScanningLine(ScanWindow::whole(line, tokens));
        }
        // blank or comment-only cursor line
        for candidate in (self.min_line..line).rev() {
            let tokens = self.tokens_of(candidate);
            if !tokens.is_empty() {
                return WalkState::ScanningLine(ScanWindow::whole(candidate, tokens));
            }
        }
        WalkState::Resolved(Resolution::WindowExhausted { line: self.min_line })
    }

    fn scan(&mut self, mut window: ScanWindow) -> WalkState {
        while window.remaining > 0 {
            let index = window.remaining - 1;
            window.remaining = index;
            let token = &window.tokens[index];
            let class = self.language.classify(token.style);
            let position = token.position;
            // operator tokens are single characters
            let symbol = if class == StyleClass::Operator { token.text.chars().next() } else { None };

            match class {
                StyleClass::Operator => match symbol {
                    Some(')' | ']') => {
                        return WalkState::BracketMatch { window, closer: position };
                    }
                    Some('(' | '[') => {
                        if index + 1 == window.tokens.len() {
                            let column = self.buffer.column(position) + 1;
                            return WalkState::Resolved(Resolution::Align { line: window.line, column });
                        }
                        self.delta += 1;
                    }
                    Some('{') => self.delta += 1,
                    Some('}') => self.delta -= 1,
                    _ => {}
                },
                StyleClass::Keyword => self.apply_keyword(&window.tokens, index),
                StyleClass::String if index == 0 => {
                    if let Some(state) = self.string_start(&window) {
                        return state;
                    }
                }
                _ => {}
            }
        }
        WalkState::ContinuationClimb { line: window.line }
    }

    fn apply_keyword(&mut self, tokens: &[Token], index: usize) {
        let token = &tokens[index];
        let Some(class) = self.language.keyword_class(&token.text) else {
            return;
        };
        match class {
            KeywordClass::Ender => self.delta -= 1,
            KeywordClass::Slider => {
                if index == 0 {
                    self.delta += 1;
                }
            }
            KeywordClass::Dedenter => {
                let modified = tokens[index + 1..]
                    .iter()
                    .any(|later| self.language.classify(later.style) == StyleClass::ModifiedKeyword);
                if !modified {
                    self.delta -= 1;
                }
            }
            KeywordClass::LimitedOpener => self.delta += 1,
            KeywordClass::EndingOpener => {
                if !self.follows_looper(&tokens[..index]) {
                    self.delta += 1;
                }
            }
        }
    }

    /// Whether the nearest indenting keyword before a `do` in the same statement is a loop header
    fn follows_looper(&self, before: &[Token]) -> bool {
        for token in before.iter().rev() {
            if self.language.is_statement_separator(token.style, &token.text) {
                return false;
            }
            let keyword = self.language.classify(token.style) == StyleClass::Keyword;
            if keyword && self.language.keyword_class(&token.text).is_some() {
                return self.language.is_looper(&token.text);
            }
        }
        false
    }

    /// Jump to the start of a multi-line string that ends on this line
    fn string_start(&self, window: &ScanWindow) -> Option<WalkState> {
        let token = &window.tokens[0];
        let line_start = self.buffer.position_from_line(window.line);
        if token.position != line_start || line_start == 0 || !self.language.is_multiline_style(token.style) {
            return None;
        }
        if self.buffer.style_at(line_start - 1) != token.style {
            return None;
        }

        let bound = self.buffer.position_from_line(self.min_line);
        let mut start = line_start - 1;
        while start > bound && self.buffer.style_at(start - 1) == token.style {
            start -= 1;
        }
        if start == bound && bound > 0 && self.buffer.style_at(bound - 1) == token.style {
            return Some(WalkState::Resolved(Resolution::WindowExhausted { line: self.min_line }));
        }

        let line = self.buffer.line_from_position(start);
        trace!(from = window.line, to = line, "multi-line string jump");
        Some(WalkState::ScanningLine(ScanWindow::before(line, self.tokens_of(line), start)))
    }

    fn match_bracket(&mut self, window: ScanWindow, closer: usize) -> IndentResult<WalkState> {
        let Some(opener) = self.buffer.brace_match(closer) else {
            // orphan closer
            return Ok(WalkState::ScanningLine(window));
        };
        if opener >= closer {
            return Err(IndentError::BraceMismatch { closer, opener });
        }

        let line = self.buffer.line_from_position(opener);
        if line == window.line {
            return Ok(WalkState::ScanningLine(ScanWindow::before(line, window.tokens, opener)));
        }
        if line < self.min_line {
            return Ok(WalkState::Resolved(Resolution::WindowExhausted { line: window.line }));
        }
        trace!(from = window.line, to = line, "bracket jump");
        Ok(WalkState::ScanningLine(ScanWindow::before(line, self.tokens_of(line), opener)))
    }

    fn climb(&self, line: usize) -> WalkState {
        if line > self.min_line && self.ends_with_continuation(line - 1) {
            return WalkState::ScanningLine(ScanWindow::whole(line - 1, self.tokens_of(line - 1)));
        }
        WalkState::Resolved(Resolution::Delta { line, delta: self.delta })
    }

    fn tokens_of(&self, line: usize) -> Vec<Token> {
        let start = self.buffer.position_from_line(line);
        let end = self.buffer.line_end_position(line);
        line_tokens(self.buffer, self.language, start, end)
    }

    /// Whether `line` ends with a backslash in the default style
    pub fn ends_with_continuation(&self, line: usize) -> bool {
        let start = self.buffer.position_from_line(line);
        let end = self.buffer.line_end_position(line);
        self.is_continuation_text(start, end)
    }

    /// Whether `start..end`, line ending aside, ends in a default-style backslash
    pub fn is_continuation_text(&self, start: usize, end: usize) -> bool {
        let text = self.buffer.text_range(start, end);
        let body = text.trim_end_matches(['\r', '\n']);
        if !body.ends_with('\\') {
            return false;
        }
        let offset = body.len() - 1;
        self.language.classify(self.buffer.style_at(start + offset)) == StyleClass::Default
    }
}
