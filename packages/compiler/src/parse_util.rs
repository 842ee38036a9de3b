//! Parse Utilities
//!
//! Source files, locations and spans shared by every parser in the crate.
//! Offsets are byte offsets into the source content; columns count chars.

use std::fmt;
use std::rc::Rc;

use crate::chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSourceFile {
    pub content: String,
    pub url: String,
}

impl ParseSourceFile {
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Rc<Self> {
        Rc::new(ParseSourceFile {
            content: content.into(),
            url: url.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLocation {
    pub file: Rc<ParseSourceFile>,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(file: Rc<ParseSourceFile>, offset: usize, line: usize, col: usize) -> Self {
        ParseLocation {
            file,
            offset,
            line,
            col,
        }
    }

    /// Moves the location by `delta` chars, tracking line and column.
    pub fn move_by(&self, delta: isize) -> ParseLocation {
        let source = self.file.content.as_str();
        let mut offset = self.offset;
        let mut line = self.line;
        let mut col = self.col;
        let mut delta = delta;

        while offset > 0 && delta < 0 {
            let ch = match source[..offset].chars().next_back() {
                Some(ch) => ch,
                None => break,
            };
            offset -= ch.len_utf8();
            delta += 1;
            if ch == chars::LF {
                line = line.saturating_sub(1);
                let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
                col = source[line_start..offset].chars().count();
            } else {
                col = col.saturating_sub(1);
            }
        }

        while offset < source.len() && delta > 0 {
            let ch = match source[offset..].chars().next() {
                Some(ch) => ch,
                None => break,
            };
            offset += ch.len_utf8();
            delta -= 1;
            if ch == chars::LF {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }

        ParseLocation::new(self.file.clone(), offset, line, col)
    }

    /// Source text around the location: up to `max_chars` chars or
    /// `max_lines` lines on each side.
    pub fn get_context(&self, max_chars: usize, max_lines: usize) -> (String, String) {
        let content = self.file.content.as_str();
        let at = self.offset.min(content.len());

        let mut start = at;
        let mut seen_chars = 0;
        let mut seen_lines = 0;
        for (i, ch) in content[..at].char_indices().rev() {
            if seen_chars >= max_chars {
                break;
            }
            if ch == chars::LF {
                seen_lines += 1;
                if seen_lines >= max_lines {
                    break;
                }
            }
            start = i;
            seen_chars += 1;
        }

        let mut end = at;
        seen_chars = 0;
        seen_lines = 0;
        for (i, ch) in content[at..].char_indices() {
            if seen_chars >= max_chars {
                break;
            }
            if ch == chars::LF {
                seen_lines += 1;
                if seen_lines >= max_lines {
                    break;
                }
            }
            end = at + i + ch.len_utf8();
            seen_chars += 1;
        }

        (content[start..at].to_string(), content[at..end].to_string())
    }
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.file.url, self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
    pub details: Option<String>,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        ParseSourceSpan {
            start,
            end,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// The covered source text.
    pub fn text(&self) -> &str {
        let content = self.start.file.content.as_str();
        content
            .get(self.start.offset..self.end.offset)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub span: ParseSourceSpan,
    pub msg: String,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(span: ParseSourceSpan, msg: impl Into<String>) -> Self {
        ParseError {
            span,
            msg: msg.into(),
            level: ParseErrorLevel::Error,
        }
    }

    pub fn warning(span: ParseSourceSpan, msg: impl Into<String>) -> Self {
        ParseError {
            span,
            msg: msg.into(),
            level: ParseErrorLevel::Warning,
        }
    }

    pub fn contextual_message(&self) -> String {
        let (before, after) = self.span.start.get_context(100, 3);
        let level = match self.level {
            ParseErrorLevel::Warning => "WARNING",
            ParseErrorLevel::Error => "ERROR",
        };
        format!("{} (\"{}[{} ->]{}\")", self.msg, before, level, after)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self
            .span
            .details
            .as_ref()
            .map(|d| format!(", {}", d))
            .unwrap_or_default();
        write!(f, "{}: {}{}", self.contextual_message(), self.span.start, details)
    }
}
