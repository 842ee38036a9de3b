//! Markup lexer tokens.

use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// `<name`, parts: `[name]`.
    TagOpenStart,
    TagOpenEnd,
    /// `/>`
    TagOpenEndVoid,
    /// A start tag cut short by EOF or a nested `<`.
    IncompleteTagOpen,
    /// `</name>`, parts: `[name]`.
    TagClose,
    /// Decoded text, parts: `[value]`.
    Text,
    CommentStart,
    /// Comment body, parts: `[value]`.
    RawText,
    CommentEnd,
    /// `<!...>` declarations, parts: `[content]`.
    DocType,
    AttrName,
    AttrQuote,
    /// Decoded attribute value; the span excludes the quotes.
    AttrValue,
    ExpansionFormStart,
    /// Switch value or ICU type, parts: `[value]`.
    ExpansionFormPart,
    ExpansionCaseValue,
    ExpansionCaseExpStart,
    ExpansionCaseExpEnd,
    ExpansionFormEnd,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub parts: Vec<String>,
    pub source_span: ParseSourceSpan,
}

impl Token {
    pub fn new(token_type: TokenType, parts: Vec<String>, source_span: ParseSourceSpan) -> Self {
        Token {
            token_type,
            parts,
            source_span,
        }
    }

    /// First part, or empty.
    pub fn value(&self) -> &str {
        self.parts.first().map(String::as_str).unwrap_or("")
    }
}
