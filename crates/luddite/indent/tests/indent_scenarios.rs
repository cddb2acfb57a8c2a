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

//! Indent scenarios over Ruby buffers

mod support;

use luddite_indent::{BufferAccess, IndentConfig, IndentEngine, RubyLanguage, StyledBuffer};
use proptest::prelude::*;
use std::cell::Cell;
use support::{ruby_buffer, ruby_styles};
use test_case::test_case;

fn indent_at_end(text: &str, config: IndentConfig) -> String {
    let buffer = ruby_buffer(text);
    IndentEngine::new(RubyLanguage, config).unwrap().compute_indent(&buffer, buffer.length())
}

#[test_case("def foo", "    " ; "def opens a block")]
#[test_case("  def foo", "      " ; "opener is relative to its own line")]
#[test_case("if x\n  end", "" ; "end returns to the fold parent")]
#[test_case("def foo\n  return", "" ; "dedenter leaves the block")]
#[test_case("def foo\n  return if done", "  " ; "modified dedenter keeps the level")]
#[test_case("if x\n  a\nelse", "    " ; "leading slider reopens")]
#[test_case("if a then b else", "    " ; "inner slider is ignored")]
#[test_case("case x\nwhen 1", "    " ; "when reopens")]
#[test_case("while x do", "    " ; "do after a looper is noise")]
#[test_case("items.each do |x|", "    " ; "do opens a block")]
#[test_case("for i in list do; list.each do", "        " ; "separator ends the looper search")]
#[test_case("x = {", "    " ; "brace opens")]
#[test_case("  x = 1 unless y", "  " ; "modifier keyword is not an opener")]
#[test_case("def foo\n\n", "    " ; "blank lines are skipped")]
#[test_case("def foo\n  # note", "    " ; "comment lines are skipped")]
#[test_case("\n\n", "" ; "empty buffer")]
fn test_keyword_delta(text: &str, expected: &str) {
    assert_eq!(indent_at_end(text, IndentConfig::default()), expected);
}

#[test_case("foo(", "    " ; "align clamped to one level")]
#[test_case("  foo(", "      " ; "align after indent")]
#[test_case("f [", "   " ; "align one past the bracket")]
#[test_case("foo(a,\n    b)", "" ; "closer jumps to the opener line")]
#[test_case("def foo(a,\n        b)", "    " ; "keywords before the opener still count")]
#[test_case("x = f(a) + g(b)", "" ; "same line pairs cancel")]
#[test_case("foo)", "" ; "orphan closer is ignored")]
#[test_case("  def bar)", "      " ; "orphan closer keeps the delta")]
fn test_brackets(text: &str, expected: &str) {
    assert_eq!(indent_at_end(text, IndentConfig::default()), expected);
}

#[test_case("foo \\", "    " ; "backslash opens a continuation")]
#[test_case("  if a && \\", "      " ; "continuation ignores keywords")]
#[test_case("x = 1 + \\\n    def \\", "    " ; "continuation keeps its indent")]
#[test_case("x = 1 + \\\n    2", "" ; "line after a continuation uses the logical start")]
#[test_case("s = \"a \\", "" ; "backslash inside a string is not a continuation")]
#[test_case("foo \\\n", "    " ; "blank line after a backslash continues")]
#[test_case("x = a + \\\n", "    " ; "blank line after an operator and backslash continues")]
#[test_case("foo \\\r\n", "    " ; "crlf after a backslash continues")]
#[test_case("  end \\\n", "      " ; "keywords before a backslash give no delta")]
#[test_case("x = 1 + \\\n    2 \\\n", "    " ; "blank line inside a continuation keeps its indent")]
#[test_case("foo \\ ", "" ; "trailing space after a backslash is not a continuation")]
fn test_continuation(text: &str, expected: &str) {
    assert_eq!(indent_at_end(text, IndentConfig::default()), expected);
}

#[test]
fn test_multiline_string_jumps_to_its_start() {
    assert_eq!(indent_at_end("def foo\n  s = \"abc\ndef\"", IndentConfig::default()), "  ");
    assert_eq!(indent_at_end("  x = \"abc\ndef\nghi\" + y", IndentConfig::default()), "  ");
}

#[test]
fn test_ruby_config_uses_two_spaces() {
    assert_eq!(indent_at_end("def foo", IndentConfig::ruby()), "  ");
    assert_eq!(indent_at_end("foo(", IndentConfig::ruby()), "  ");
}

#[test]
fn test_tabs() {
    let config = IndentConfig::default().with_tabs(true).with_tab_width(4);
    let buffer = ruby_buffer("\tdef foo").with_tab_width(4);
    let engine = IndentEngine::new(RubyLanguage, config).unwrap();
    assert_eq!(engine.compute_indent(&buffer, buffer.length()), "\t\t");
}

#[test]
fn test_cursor_mid_line() {
    let buffer = ruby_buffer("def foo\n  bar\nend");
    let engine = IndentEngine::new(RubyLanguage, IndentConfig::default()).unwrap();
    // cursor right after "def foo"
    assert_eq!(engine.compute_indent(&buffer, 7), "    ");
    // only whitespace before the cursor, so the line above decides
    assert_eq!(engine.compute_indent(&buffer, 9), "    ");
}

/// Records the lowest line the engine touched
struct RecordingBuffer {
    inner: StyledBuffer,
    lowest: Cell<usize>,
}

impl RecordingBuffer {
    fn new(inner: StyledBuffer) -> Self {
        Self { inner, lowest: Cell::new(usize::MAX) }
    }

    fn touch_line(&self, line: usize) {
        self.lowest.set(self.lowest.get().min(line));
    }

    fn touch(&self, position: usize) {
        self.touch_line(self.inner.line_from_position(position));
    }
}

impl BufferAccess for RecordingBuffer {
    fn length(&self) -> usize {
        self.inner.length()
    }

    fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    fn text_range(&self, start: usize, end: usize) -> String {
        self.touch(start);
        self.inner.text_range(start, end)
    }

    fn line_from_position(&self, position: usize) -> usize {
        self.touch(position);
        self.inner.line_from_position(position)
    }

    fn position_from_line(&self, line: usize) -> usize {
        self.touch_line(line);
        self.inner.position_from_line(line)
    }

    fn line_end_position(&self, line: usize) -> usize {
        self.touch_line(line);
        self.inner.line_end_position(line)
    }

    fn column(&self, position: usize) -> usize {
        self.touch(position);
        self.inner.column(position)
    }

    fn fold_parent(&self, line: usize) -> Option<usize> {
        self.touch_line(line);
        self.inner.fold_parent(line)
    }

    fn brace_match(&self, position: usize) -> Option<usize> {
        self.touch(position);
        self.inner.brace_match(position)
    }

    fn style_at(&self, position: usize) -> u8 {
        self.touch(position);
        self.inner.style_at(position)
    }

    fn char_at(&self, position: usize) -> Option<char> {
        self.touch(position);
        self.inner.char_at(position)
    }
}

#[test]
fn test_scan_stops_at_window() {
    let mut text = String::from("foo(\n");
    for _ in 1..499 {
        text.push_str("  a \\\n");
    }
    text.push_str("  b");
    let buffer = RecordingBuffer::new(ruby_buffer(&text));
    assert_eq!(buffer.line_count(), 500);

    let engine = IndentEngine::new(RubyLanguage, IndentConfig::default()).unwrap();
    let indent = engine.compute_indent(&buffer, buffer.length());
    assert_eq!(indent, "  ");
    assert!(buffer.lowest.get() >= 399, "walk touched line {}", buffer.lowest.get());
}

#[test]
fn test_closer_outside_window_stops() {
    let mut text = String::from("call(\n");
    for _ in 0..20 {
        text.push_str("  x,\n");
    }
    text.push_str("  y)");
    let buffer = ruby_buffer(&text);
    let engine = IndentEngine::new(RubyLanguage, IndentConfig::default().with_scan_window(5)).unwrap();
    assert_eq!(engine.compute_indent(&buffer, buffer.length()), "  ");
}

proptest! {
    #[test]
    fn prop_indent_is_whitespace(text in "[a-z ()\\[\\]{}#\"\\\\\n]{0,120}", cursor in 0usize..140) {
        let buffer = StyledBuffer::new(text.as_str(), ruby_styles(&text)).unwrap();
        let engine = IndentEngine::new(RubyLanguage, IndentConfig::default()).unwrap();
        let indent = engine.compute_indent(&buffer, cursor.min(text.len()));
        prop_assert!(indent.chars().all(|c| c == ' ' || c == '\t'));
    }
}
