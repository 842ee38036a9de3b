//! Markup Lexer
//!
//! Turns template source into a flat token stream. Entities are decoded in
//! text and attribute values, raw text elements (`<script>`, `<style>`,
//! `<textarea>`, `<title>`) are scanned up to their end tag, and ICU
//! expansion forms are tokenized when enabled. Lexing never fails: problems
//! are reported as [`ParseError`]s next to the tokens.

use std::rc::Rc;

use super::entities::{decode_named_entity, decode_numeric_entity};
use super::html_tags::get_html_tag_definition;
use super::tags::TagContentType;
use super::tokens::{Token, TokenType};
use crate::chars;
use crate::parse_util::{ParseError, ParseLocation, ParseSourceFile, ParseSourceSpan};

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizeOptions {
    /// Recognise `{value, type, case {...}}` ICU messages.
    pub tokenize_expansion_forms: bool,
}

#[derive(Debug, Clone)]
pub struct TokenizeResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<ParseError>,
}

pub fn tokenize(file: Rc<ParseSourceFile>, options: TokenizeOptions) -> TokenizeResult {
    Tokenizer::new(file, options).tokenize()
}

pub fn unexpected_character_error_msg(ch: char) -> String {
    let shown = if ch == chars::EOF {
        "EOF".to_string()
    } else {
        ch.to_string()
    };
    format!("Unexpected character \"{}\"", shown)
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    offset: usize,
    line: usize,
    col: usize,
}

struct Tokenizer {
    file: Rc<ParseSourceFile>,
    cursor: Cursor,
    tokenize_icu: bool,
    expansion_case_stack: Vec<TokenType>,
    tokens: Vec<Token>,
    errors: Vec<ParseError>,
}

impl Tokenizer {
    fn new(file: Rc<ParseSourceFile>, options: TokenizeOptions) -> Self {
        Tokenizer {
            file,
            cursor: Cursor {
                offset: 0,
                line: 0,
                col: 0,
            },
            tokenize_icu: options.tokenize_expansion_forms,
            expansion_case_stack: Vec::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn tokenize(mut self) -> TokenizeResult {
        while self.peek() != chars::EOF {
            let start = self.cursor;
            if self.starts_with("<!--") {
                self.consume_comment(start);
            } else if self.starts_with("<![CDATA[") {
                self.consume_cdata(start);
            } else if self.starts_with("<!") {
                self.consume_doc_type(start);
            } else if self.starts_with("</") && is_tag_name_start(self.peek_nth(2)) {
                self.consume_tag_close(start);
            } else if self.peek() == chars::LT && is_tag_name_start(self.peek_nth(1)) {
                self.consume_tag_open(start);
            } else if !(self.tokenize_icu && self.tokenize_expansion_form()) {
                self.consume_text();
            }
        }
        let end = self.cursor;
        self.emit(TokenType::Eof, vec![], end);

        TokenizeResult {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    // Cursor primitives

    fn rest(&self) -> &str {
        &self.file.content[self.cursor.offset..]
    }

    fn peek(&self) -> char {
        self.rest().chars().next().unwrap_or(chars::EOF)
    }

    fn peek_nth(&self, n: usize) -> char {
        self.rest().chars().nth(n).unwrap_or(chars::EOF)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn advance(&mut self) {
        let ch = self.peek();
        if ch == chars::EOF {
            return;
        }
        self.cursor.offset += ch.len_utf8();
        if ch == chars::LF {
            self.cursor.line += 1;
            self.cursor.col = 0;
        } else {
            self.cursor.col += 1;
        }
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek() != chars::EOF && chars::is_whitespace(self.peek()) {
            self.advance();
        }
    }

    fn location(&self, cursor: Cursor) -> ParseLocation {
        ParseLocation::new(self.file.clone(), cursor.offset, cursor.line, cursor.col)
    }

    fn span_from(&self, start: Cursor) -> ParseSourceSpan {
        ParseSourceSpan::new(self.location(start), self.location(self.cursor))
    }

    fn emit(&mut self, token_type: TokenType, parts: Vec<String>, start: Cursor) {
        let span = self.span_from(start);
        self.tokens.push(Token::new(token_type, parts, span));
    }

    fn error_here(&mut self, msg: String) {
        let here = self.cursor;
        let span = self.span_from(here);
        self.errors.push(ParseError::new(span, msg));
    }

    // Markup

    fn consume_comment(&mut self, start: Cursor) {
        self.advance_by(4);
        self.emit(TokenType::CommentStart, vec![], start);

        let body_start = self.cursor;
        let (body, terminated) = self.read_until("-->");
        self.emit(TokenType::RawText, vec![body], body_start);

        if terminated {
            let end_start = self.cursor;
            self.advance_by(3);
            self.emit(TokenType::CommentEnd, vec![], end_start);
        } else {
            self.error_here(unexpected_character_error_msg(chars::EOF));
        }
    }

    fn consume_cdata(&mut self, start: Cursor) {
        self.advance_by("<![CDATA[".len());
        let (body, terminated) = self.read_until("]]>");
        if terminated {
            self.advance_by(3);
        } else {
            self.error_here(unexpected_character_error_msg(chars::EOF));
        }
        self.emit(TokenType::Text, vec![body], start);
    }

    fn consume_doc_type(&mut self, start: Cursor) {
        self.advance_by(2);
        let (body, terminated) = self.read_until(">");
        if terminated {
            self.advance();
        }
        self.emit(TokenType::DocType, vec![body], start);
    }

    /// Reads up to (not including) `terminator`. Returns whether it was found.
    fn read_until(&mut self, terminator: &str) -> (String, bool) {
        let mut value = String::new();
        while self.peek() != chars::EOF {
            if self.starts_with(terminator) {
                return (value, true);
            }
            value.push(self.peek());
            self.advance();
        }
        (value, false)
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while !chars::is_name_end(self.peek()) {
            name.push(self.peek());
            self.advance();
        }
        name
    }

    fn consume_tag_close(&mut self, start: Cursor) {
        self.advance_by(2);
        let name = self.read_name();
        self.skip_whitespace();
        if self.peek() == chars::GT {
            self.advance();
        } else {
            let ch = self.peek();
            self.error_here(unexpected_character_error_msg(ch));
        }
        self.emit(TokenType::TagClose, vec![name], start);
    }

    fn consume_tag_open(&mut self, start: Cursor) {
        self.advance();
        let name = self.read_name();
        self.emit(TokenType::TagOpenStart, vec![name.clone()], start);

        loop {
            self.skip_whitespace();
            let end_start = self.cursor;
            let ch = self.peek();
            if ch == chars::GT {
                self.advance();
                self.emit(TokenType::TagOpenEnd, vec![], end_start);
                break;
            }
            if self.starts_with("/>") {
                self.advance_by(2);
                self.emit(TokenType::TagOpenEndVoid, vec![], end_start);
                return;
            }
            if ch == chars::EOF || ch == chars::LT {
                self.emit(TokenType::IncompleteTagOpen, vec![], end_start);
                return;
            }
            if ch == chars::SLASH || ch == chars::EQ || chars::is_quote(ch) {
                self.error_here(unexpected_character_error_msg(ch));
                self.advance();
                continue;
            }
            self.consume_attribute();
        }

        match get_html_tag_definition(&name).get_content_type(None) {
            TagContentType::RawText => self.consume_raw_text(&name, false),
            TagContentType::EscapableRawText => self.consume_raw_text(&name, true),
            TagContentType::ParsableData => {}
        }
    }

    fn consume_attribute(&mut self) {
        let name_start = self.cursor;
        let name = self.read_name();
        self.emit(TokenType::AttrName, vec![name], name_start);

        let before_eq = self.cursor;
        self.skip_whitespace();
        if self.peek() == chars::EQ {
            self.advance();
            self.skip_whitespace();
            self.consume_attribute_value();
        } else {
            self.cursor = before_eq;
        }
    }

    fn consume_attribute_value(&mut self) {
        let quote = self.peek();
        if quote == chars::SQ || quote == chars::DQ {
            let quote_start = self.cursor;
            self.advance();
            self.emit(TokenType::AttrQuote, vec![quote.to_string()], quote_start);

            let value_start = self.cursor;
            let mut value = String::new();
            while self.peek() != quote && self.peek() != chars::EOF {
                self.consume_char_or_entity(&mut value);
            }
            self.emit(TokenType::AttrValue, vec![value], value_start);

            if self.peek() == quote {
                let close_start = self.cursor;
                self.advance();
                self.emit(TokenType::AttrQuote, vec![quote.to_string()], close_start);
            } else {
                self.error_here(unexpected_character_error_msg(chars::EOF));
            }
        } else {
            let value_start = self.cursor;
            let mut value = String::new();
            while !chars::is_name_end(self.peek()) {
                self.consume_char_or_entity(&mut value);
            }
            self.emit(TokenType::AttrValue, vec![value], value_start);
        }
    }

    fn consume_raw_text(&mut self, tag_name: &str, decode_entities: bool) {
        let start = self.cursor;
        let mut value = String::new();
        while self.peek() != chars::EOF && !self.is_closing_tag(tag_name) {
            if decode_entities {
                self.consume_char_or_entity(&mut value);
            } else {
                value.push(self.peek());
                self.advance();
            }
        }
        if self.cursor.offset > start.offset {
            self.emit(TokenType::Text, vec![value], start);
        }
    }

    fn is_closing_tag(&self, tag_name: &str) -> bool {
        let rest = self.rest();
        let Some(after) = rest.strip_prefix("</") else {
            return false;
        };
        match after.get(..tag_name.len()) {
            Some(candidate) if candidate.eq_ignore_ascii_case(tag_name) => after[tag_name.len()..]
                .chars()
                .next()
                .map_or(true, chars::is_name_end),
            _ => false,
        }
    }

    // Text and entities

    fn is_tag_start(&self) -> bool {
        if self.peek() != chars::LT {
            return false;
        }
        let next = self.peek_nth(1);
        is_tag_name_start(next) || next == chars::SLASH || next == chars::BANG
    }

    fn is_text_end(&self) -> bool {
        if self.is_tag_start() || self.peek() == chars::EOF {
            return true;
        }
        if self.tokenize_icu {
            if self.is_expansion_form_start() {
                return true;
            }
            if self.peek() == chars::RBRACE && self.is_in_expansion_case() {
                return true;
            }
        }
        false
    }

    fn consume_text(&mut self) {
        let start = self.cursor;
        let mut value = String::new();
        let mut in_interpolation = false;

        loop {
            if self.peek() == chars::EOF {
                break;
            }
            if !in_interpolation && self.cursor.offset > start.offset && self.is_text_end() {
                break;
            }
            if self.starts_with("{{") {
                in_interpolation = true;
                value.push_str("{{");
                self.advance_by(2);
                continue;
            }
            if in_interpolation && self.starts_with("}}") {
                in_interpolation = false;
                value.push_str("}}");
                self.advance_by(2);
                continue;
            }
            self.consume_char_or_entity(&mut value);
        }

        self.emit(TokenType::Text, vec![value], start);
    }

    fn consume_char_or_entity(&mut self, value: &mut String) {
        if self.peek() == chars::AMPERSAND {
            self.consume_entity(value);
        } else {
            value.push(self.peek());
            self.advance();
        }
    }

    /// Decodes `&name;`, `&#123;` or `&#x7B;`. Anything that does not look
    /// like a complete reference is kept as a literal `&`.
    fn consume_entity(&mut self, value: &mut String) {
        let start = self.cursor;
        self.advance();

        let mut body = String::new();
        if self.peek() == chars::HASH {
            body.push(chars::HASH);
            self.advance();
            if self.peek() == 'x' || self.peek() == 'X' {
                body.push(self.peek());
                self.advance();
            }
        }
        while chars::is_ascii_letter(self.peek()) || chars::is_digit(self.peek()) {
            body.push(self.peek());
            self.advance();
        }

        let complete = self.peek() == chars::SEMICOLON && body.trim_start_matches('#').len() > 0;
        if !complete {
            self.cursor = start;
            self.advance();
            value.push(chars::AMPERSAND);
            return;
        }
        self.advance();

        let decoded = if body.starts_with('#') {
            decode_numeric_entity(&body)
        } else {
            decode_named_entity(&body)
        };
        match decoded {
            Some(ch) => value.push(ch),
            None => {
                let span = self.span_from(start);
                let msg = if body.starts_with('#') {
                    format!("Unable to parse entity \"&{};\"", body)
                } else {
                    format!(
                        "Unknown entity \"{}\" - use the \"&#<decimal>;\" or  \"&#x<hex>;\" syntax",
                        body
                    )
                };
                self.errors.push(ParseError::new(span, msg));
                value.push_str(&self.file.content[start.offset..self.cursor.offset]);
            }
        }
    }

    // ICU expansion forms

    fn tokenize_expansion_form(&mut self) -> bool {
        if self.is_expansion_form_start() {
            self.consume_expansion_form_start();
            return true;
        }
        if self.is_in_expansion_form() && is_expansion_case_start(self.peek()) {
            self.consume_expansion_case_start();
            return true;
        }
        if self.peek() == chars::RBRACE {
            if self.is_in_expansion_case() {
                self.consume_expansion_case_end();
                return true;
            }
            if self.is_in_expansion_form() {
                self.consume_expansion_form_end();
                return true;
            }
        }
        false
    }

    fn is_expansion_form_start(&self) -> bool {
        self.peek() == chars::LBRACE && !self.starts_with("{{")
    }

    fn is_in_expansion_form(&self) -> bool {
        self.expansion_case_stack.last() == Some(&TokenType::ExpansionFormStart)
    }

    fn is_in_expansion_case(&self) -> bool {
        self.expansion_case_stack.last() == Some(&TokenType::ExpansionCaseExpStart)
    }

    fn consume_expansion_form_start(&mut self) {
        let start = self.cursor;
        self.advance();
        self.emit(TokenType::ExpansionFormStart, vec![], start);
        self.expansion_case_stack.push(TokenType::ExpansionFormStart);

        for _ in 0..2 {
            self.skip_whitespace();
            let part_start = self.cursor;
            let (part, found) = self.read_until(",");
            self.emit(TokenType::ExpansionFormPart, vec![part.trim().to_string()], part_start);
            if found {
                self.advance();
            } else {
                self.error_here(unexpected_character_error_msg(chars::EOF));
                return;
            }
        }
        self.skip_whitespace();
    }

    fn consume_expansion_case_start(&mut self) {
        let start = self.cursor;
        let (value, _) = self.read_until("{");
        self.emit(TokenType::ExpansionCaseValue, vec![value.trim().to_string()], start);
        self.skip_whitespace();

        if self.peek() == chars::LBRACE {
            let exp_start = self.cursor;
            self.advance();
            self.emit(TokenType::ExpansionCaseExpStart, vec![], exp_start);
            self.expansion_case_stack.push(TokenType::ExpansionCaseExpStart);
        } else {
            let ch = self.peek();
            self.error_here(unexpected_character_error_msg(ch));
        }
    }

    fn consume_expansion_case_end(&mut self) {
        let start = self.cursor;
        self.advance();
        self.emit(TokenType::ExpansionCaseExpEnd, vec![], start);
        self.skip_whitespace();
        self.expansion_case_stack.pop();
    }

    fn consume_expansion_form_end(&mut self) {
        let start = self.cursor;
        self.advance();
        self.emit(TokenType::ExpansionFormEnd, vec![], start);
        self.expansion_case_stack.pop();
    }
}

fn is_tag_name_start(ch: char) -> bool {
    chars::is_ascii_letter(ch) || ch == chars::COLON
}

fn is_expansion_case_start(ch: char) -> bool {
    ch == chars::EQ || chars::is_ascii_letter(ch) || chars::is_digit(ch)
}
