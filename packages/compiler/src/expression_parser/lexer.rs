/**
 * Angular Expression Lexer
 *
 * Tokenizes binding expressions. Token offsets are byte offsets into the
 * scanned input.
 */
use crate::chars;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Character,
    Identifier,
    Keyword,
    String,
    Operator,
    Number,
    Error,
}

const KEYWORDS: &[&str] = &[
    "var",
    "let",
    "as",
    "null",
    "undefined",
    "true",
    "false",
    "if",
    "else",
    "this",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub index: usize,
    pub end: usize,
    pub token_type: TokenType,
    pub num_value: f64,
    pub str_value: String,
}

impl Token {
    pub fn new(
        index: usize,
        end: usize,
        token_type: TokenType,
        num_value: f64,
        str_value: String,
    ) -> Self {
        Token {
            index,
            end,
            token_type,
            num_value,
            str_value,
        }
    }

    pub fn is_character(&self, code: char) -> bool {
        self.token_type == TokenType::Character && self.str_value.starts_with(code)
    }

    pub fn is_number(&self) -> bool {
        self.token_type == TokenType::Number
    }

    pub fn is_string(&self) -> bool {
        self.token_type == TokenType::String
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.str_value == operator
    }

    pub fn is_identifier(&self) -> bool {
        self.token_type == TokenType::Identifier
    }

    pub fn is_keyword(&self) -> bool {
        self.token_type == TokenType::Keyword
    }

    pub fn is_keyword_of(&self, keyword: &str) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == keyword
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_type {
            TokenType::Number => write!(f, "{}", self.num_value),
            _ => write!(f, "{}", self.str_value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(text);
        let mut tokens = Vec::new();
        while let Some(token) = scanner.scan_token() {
            let is_error = token.is_error();
            tokens.push(token);
            if is_error {
                break;
            }
        }
        tokens
    }
}

struct Scanner<'a> {
    input: &'a str,
    index: usize,
    peek: char,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner {
            input,
            index: 0,
            peek: input.chars().next().unwrap_or(chars::EOF),
        }
    }

    fn at_end(&self) -> bool {
        self.index >= self.input.len()
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.index += self.peek.len_utf8();
        }
        self.peek = self.input[self.index..].chars().next().unwrap_or(chars::EOF);
    }

    fn char_after_peek(&self) -> char {
        let next = self.index + self.peek.len_utf8();
        self.input
            .get(next..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or(chars::EOF)
    }

    fn scan_token(&mut self) -> Option<Token> {
        while !self.at_end() && chars::is_whitespace(self.peek) {
            self.advance();
        }
        if self.at_end() {
            return None;
        }

        let start = self.index;
        let ch = self.peek;

        if chars::is_identifier_start(ch) {
            return Some(self.scan_identifier());
        }
        if chars::is_digit(ch) {
            return Some(self.scan_number(start));
        }

        let token = match ch {
            chars::PERIOD => {
                if chars::is_digit(self.char_after_peek()) {
                    self.scan_number(start)
                } else {
                    self.scan_character(start, ch)
                }
            }
            chars::LPAREN
            | chars::RPAREN
            | chars::LBRACE
            | chars::RBRACE
            | chars::LBRACKET
            | chars::RBRACKET
            | chars::COMMA
            | chars::COLON
            | chars::SEMICOLON => self.scan_character(start, ch),
            chars::SQ | chars::DQ => self.scan_string(),
            chars::PLUS | chars::MINUS | chars::STAR | chars::SLASH | chars::PERCENT
            | chars::CARET => self.scan_operator(start, ch),
            chars::QUESTION => self.scan_complex_operator(start, "?", chars::PERIOD, '.', None),
            chars::LT | chars::GT => self.scan_complex_operator(start, &ch.to_string(), chars::EQ, '=', None),
            chars::BANG | chars::EQ => {
                self.scan_complex_operator(start, &ch.to_string(), chars::EQ, '=', Some('='))
            }
            chars::AMPERSAND => self.scan_complex_operator(start, "&", chars::AMPERSAND, '&', None),
            chars::BAR => self.scan_complex_operator(start, "|", chars::BAR, '|', None),
            _ => self.error(format!("Unexpected character [{}]", ch), 0),
        };
        Some(token)
    }

    fn scan_character(&mut self, start: usize, code: char) -> Token {
        self.advance();
        Token::new(start, self.index, TokenType::Character, code as u32 as f64, code.to_string())
    }

    fn scan_operator(&mut self, start: usize, op: char) -> Token {
        self.advance();
        Token::new(start, self.index, TokenType::Operator, 0.0, op.to_string())
    }

    /// Scans `one`, optionally followed by `two` and then `three`
    /// (`!`, `!=`, `!==`).
    fn scan_complex_operator(
        &mut self,
        start: usize,
        one: &str,
        two_code: char,
        two: char,
        three: Option<char>,
    ) -> Token {
        self.advance();
        let mut text = one.to_string();
        if self.peek == two_code {
            self.advance();
            text.push(two);
            if let Some(three) = three {
                if self.peek == three {
                    self.advance();
                    text.push(three);
                }
            }
        }
        Token::new(start, self.index, TokenType::Operator, 0.0, text)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.index;
        self.advance();
        while chars::is_identifier_part(self.peek) {
            self.advance();
        }
        let text = &self.input[start..self.index];
        let token_type = if KEYWORDS.contains(&text) {
            TokenType::Keyword
        } else {
            TokenType::Identifier
        };
        Token::new(start, self.index, token_type, 0.0, text.to_string())
    }

    fn scan_number(&mut self, start: usize) -> Token {
        let mut simple = self.index == start && self.peek != chars::PERIOD;
        if self.index == start {
            self.advance();
        }
        loop {
            if chars::is_digit(self.peek) {
                // digits continue the literal
            } else if self.peek == chars::PERIOD {
                simple = false;
            } else if chars::is_exponent_start(self.peek) {
                self.advance();
                if chars::is_exponent_sign(self.peek) {
                    self.advance();
                }
                if !chars::is_digit(self.peek) {
                    return self.error("Invalid exponent".to_string(), -1);
                }
                simple = false;
            } else {
                break;
            }
            self.advance();
        }
        let text = &self.input[start..self.index];
        let value = if simple {
            text.parse::<i64>().map(|v| v as f64).unwrap_or(f64::NAN)
        } else {
            text.parse::<f64>().unwrap_or(f64::NAN)
        };
        Token::new(start, self.index, TokenType::Number, value, String::new())
    }

    fn scan_string(&mut self) -> Token {
        let start = self.index;
        let quote = self.peek;
        self.advance();

        let mut buffer = String::new();
        let mut marker = self.index;
        while self.peek != quote {
            if self.peek == chars::BACKSLASH {
                buffer.push_str(&self.input[marker..self.index]);
                self.advance();
                let unescaped = if self.peek == 'u' {
                    let hex_start = self.index + 1;
                    let hex = self.input.get(hex_start..hex_start + 4).unwrap_or("");
                    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                        Some(code) if hex.len() == 4 => {
                            for _ in 0..5 {
                                self.advance();
                            }
                            code
                        }
                        _ => return self.error(format!("Invalid unicode escape [\\u{}]", hex), 0),
                    }
                } else {
                    let escaped = unescape(self.peek);
                    self.advance();
                    escaped
                };
                buffer.push(unescaped);
                marker = self.index;
            } else if self.at_end() {
                return self.error("Unterminated quote".to_string(), 0);
            } else {
                self.advance();
            }
        }

        let last = &self.input[marker..self.index];
        self.advance();
        buffer.push_str(last);
        Token::new(start, self.index, TokenType::String, 0.0, buffer)
    }

    fn error(&mut self, message: String, offset: isize) -> Token {
        let position = (self.index as isize + offset).max(0) as usize;
        let message = format!(
            "Lexer Error: {} at column {} in expression [{}]",
            message, position, self.input
        );
        let index = self.index;
        Token::new(index, index, TokenType::Error, 0.0, message)
    }
}

fn unescape(code: char) -> char {
    match code {
        'n' => chars::LF,
        'f' => chars::FF,
        'r' => chars::CR,
        't' => chars::TAB,
        'v' => chars::VTAB,
        _ => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Vec<Token> {
        Lexer::new().tokenize(text)
    }

    #[test]
    fn test_tokenize_member_access() {
        let tokens = lex("j.k");
        assert_eq!(tokens.len(), 3);
        assert!(tokens[0].is_identifier());
        assert!(tokens[1].is_character('.'));
        assert_eq!(tokens[2].str_value, "k");
        assert_eq!((tokens[2].index, tokens[2].end), (2, 3));
    }

    #[test]
    fn test_tokenize_keywords_and_operators() {
        let tokens = lex("let a = b !== null && c?.d || !e");
        assert!(tokens[0].is_keyword_of("let"));
        assert!(tokens[2].is_operator("="));
        assert!(tokens[4].is_operator("!=="));
        assert!(tokens[5].is_keyword_of("null"));
        assert!(tokens[6].is_operator("&&"));
        assert!(tokens[8].is_operator("?."));
        assert!(tokens[10].is_operator("||"));
        assert!(tokens[11].is_operator("!"));
    }

    #[test]
    fn test_tokenize_numbers() {
        let tokens = lex("1 2.5 .5 1e3 2E-2");
        let values: Vec<f64> = tokens.iter().map(|t| t.num_value).collect();
        assert_eq!(values, vec![1.0, 2.5, 0.5, 1000.0, 0.02]);
        assert!(lex("1e")[0].is_error());
    }

    #[test]
    fn test_tokenize_strings() {
        let tokens = lex(r#"'a\'b' "c\nd" 'AB'"#);
        assert_eq!(tokens[0].str_value, "a'b");
        assert_eq!(tokens[1].str_value, "c\nd");
        assert_eq!(tokens[2].str_value, "AB");
        assert!(tokens[0].is_string());
    }

    #[test]
    fn test_report_errors() {
        let tokens = lex("'abc");
        assert!(tokens[0].is_error());
        assert!(tokens[0].str_value.starts_with("Lexer Error: Unterminated quote"));
        let tokens = lex("a # b");
        assert_eq!(
            tokens[1].str_value,
            "Lexer Error: Unexpected character [#] at column 2 in expression [a # b]"
        );
        assert_eq!(tokens.len(), 2);
    }
}
