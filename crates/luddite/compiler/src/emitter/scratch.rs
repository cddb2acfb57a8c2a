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

//! Scratch-buffer payload preparation
//!
//! Strings reach the runtime through the scratch buffer. Quoted grammar
//! strings lose one layer of quoting first. Regex bodies keep any quote
//! characters they start or end with. Only `\\`, `\'` and `\"` are unescaped. Every other
//! backslash sequence is kept verbatim so regexes still see `\r`, `\n` and
//! friends.

use crate::session::family::strip_quotes;

/// Prepare a quoted grammar string for staging
pub fn stage_payload(text: &str) -> String {
    unescape_payload(strip_quotes(text))
}

/// Unescape quotes and backslashes, leaving any surrounding quotes in place
pub fn unescape_payload(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '\\' | '\'' | '"') {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("'<%'", "<%" ; "single quotes stripped")]
    #[test_case("\"'x'\"", "'x'" ; "only one quote layer")]
    #[test_case(r#"'a\\b'"#, r"a\b" ; "escaped backslash")]
    #[test_case(r#"'it\'s'"#, "it's" ; "escaped single quote")]
    #[test_case(r#"'say \"hi\"'"#, "say \"hi\"" ; "escaped double quotes")]
    #[test_case(r"[^\r\n]+", r"[^\r\n]+" ; "regex escapes untouched")]
    #[test_case(r"\\n", r"\n" ; "escaped backslash before letter")]
    #[test_case("abc\\", "abc\\" ; "trailing backslash kept")]
    fn test_stage_payload(raw: &str, staged: &str) {
        assert_eq!(stage_payload(raw), staged);
    }

    #[test_case("'[^']*'", "'[^']*'" ; "single quoted string regex")]
    #[test_case(r#""[^\"]*""#, r#""[^"]*""# ; "double quoted string regex")]
    #[test_case(r"[^\r\n]+", r"[^\r\n]+" ; "regex escapes untouched")]
    #[test_case(r"\\d", r"\d" ; "escaped backslash")]
    fn test_unescape_payload(raw: &str, unescaped: &str) {
        assert_eq!(unescape_payload(raw), unescaped);
    }
}
