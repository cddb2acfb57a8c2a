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

//! Table renderers
//!
//! Both writers consume the same record sequence. `ResourceWriter` produces
//! the line-oriented resource stream read back by `TableReader`;
//! `CallSequenceWriter` produces a C function that replays the records
//! against a table builder.

use super::record::{RecordBuilder, TableRecord};
use super::CompiledTable;

/// Renders wire records into text
pub trait TableWriter {
    /// Append one record
    fn write_record(&mut self, record: &TableRecord);

    /// Consume the writer and return the rendered text
    fn finish(self) -> String;

    /// Render a whole table
    fn write_table(mut self, table: &CompiledTable, chunk_size: usize) -> String
    where
        Self: Sized,
    {
        for record in RecordBuilder::new(chunk_size).build(table) {
            self.write_record(&record);
        }
        self.finish()
    }
}

/// Percent-escape the bytes that would break a line-oriented stream
pub fn escape_chunk(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            other => out.push(other),
        }
    }
    out
}

/// Reverse `escape_chunk`. Unrecognized `%` sequences are kept literally.
pub fn unescape_chunk(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(index) = rest.find('%') {
        out.push_str(&rest[..index]);
        let tail = &rest[index..];
        let decoded = match tail.get(..3) {
            Some("%25") => Some('%'),
            Some("%0D") | Some("%0d") => Some('\r'),
            Some("%0A") | Some("%0a") => Some('\n'),
            _ => None,
        };
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[3..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Line-oriented resource stream: `tag:field:field...`
#[derive(Debug, Default)]
pub struct ResourceWriter {
    buffer: String,
}

impl ResourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get read-only access to the rendered text
    pub fn buffer(&self) -> &str {
        &self.buffer
    }
}

impl TableWriter for ResourceWriter {
    fn write_record(&mut self, record: &TableRecord) {
        self.buffer.push_str(&record.tag().code().to_string());
        if let Some(text) = record.text() {
            self.buffer.push(':');
            self.buffer.push_str(&text.len().to_string());
            self.buffer.push(':');
            self.buffer.push_str(&escape_chunk(text));
        } else {
            for field in record.fields() {
                self.buffer.push(':');
                self.buffer.push_str(&field);
            }
        }
        self.buffer.push('\n');
    }

    fn finish(self) -> String {
        self.buffer
    }
}

/// C source that replays the records as builder calls
#[derive(Debug)]
pub struct CallSequenceWriter {
    buffer: String,
}

impl CallSequenceWriter {
    /// Start the loader function for `language`
    pub fn new(language: &str) -> Self {
        let mut buffer = String::new();
        buffer.push_str(&format!("void udl_load_{}(UdlTableBuilder *b)\n{{\n", c_identifier(language)));
        Self { buffer }
    }
}

impl TableWriter for CallSequenceWriter {
    fn write_record(&mut self, record: &TableRecord) {
        let args = match record.text() {
            Some(text) => format!("\"{}\"", c_string_escape(text)),
            None => record
                .fields()
                .into_iter()
                .map(|f| if f.is_empty() { "-1".to_string() } else { f })
                .collect::<Vec<_>>()
                .join(", "),
        };
        self.buffer.push_str(&format!("    b->{}({});\n", record.tag().call_name(), args));
    }

    fn finish(mut self) -> String {
        self.buffer.push_str("}\n");
        self.buffer
    }
}

/// Map a language name onto a C identifier
fn c_identifier(language: &str) -> String {
    let ident: String = language
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_digit()) { format!("_{ident}") } else { ident }
}

fn c_string_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(byte as char),
            other => out.push_str(&format!("\\{other:03o}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{StateId, TableVersion};

    #[test]
    fn test_escape_round_trip() {
        let text = "a%b\r\nc%0A";
        assert_eq!(escape_chunk(text), "a%25b%0D%0Ac%250A");
        assert_eq!(unescape_chunk(&escape_chunk(text)), text);
    }

    #[test]
    fn test_resource_line_layout() {
        let mut writer = ResourceWriter::new();
        writer.write_record(&TableRecord::Version(TableVersion::CURRENT));
        writer.write_record(&TableRecord::ScratchBufferStart("x:y".into()));
        writer.write_record(&TableRecord::PushState(StateId(3)));
        writer.write_record(&TableRecord::PopState);
        assert_eq!(writer.finish(), "1:1:1:0\n2:3:x:y\n43:3\n44\n");
    }

    #[test]
    fn test_call_sequence_wraps_records() {
        let mut writer = CallSequenceWriter::new("Ruby-HTML");
        writer.write_record(&TableRecord::ScratchBufferStart("say \"hi\"\n".into()));
        writer.write_record(&TableRecord::Language);
        let text = writer.finish();
        assert!(text.starts_with("void udl_load_ruby_html(UdlTableBuilder *b)\n{\n"));
        assert!(text.contains("    b->scratchBufferStart(\"say \\\"hi\\\"\\n\");\n"));
        assert!(text.contains("    b->setLanguage();\n"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_call_sequence_absent_values() {
        let mut writer = CallSequenceWriter::new("x");
        writer.write_record(&TableRecord::FamilyInfo { family: crate::Family::Ssl, initial_state: None });
        assert!(writer.finish().contains("b->setFamilyInfo(3, -1);"));
    }
}
