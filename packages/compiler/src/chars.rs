//! Character classes shared by the markup lexer and the expression lexer.

#![allow(non_upper_case_globals)]

pub const EOF: char = '\0';
pub const TAB: char = '\t';
pub const LF: char = '\n';
pub const VTAB: char = '\x0B';
pub const FF: char = '\x0C';
pub const CR: char = '\r';
pub const SPACE: char = ' ';
pub const NBSP: char = '\u{00A0}';

pub const BANG: char = '!';
pub const DQ: char = '"';
pub const HASH: char = '#';
pub const DOLLAR: char = '$';
pub const PERCENT: char = '%';
pub const AMPERSAND: char = '&';
pub const SQ: char = '\'';
pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const STAR: char = '*';
pub const PLUS: char = '+';
pub const COMMA: char = ',';
pub const MINUS: char = '-';
pub const PERIOD: char = '.';
pub const SLASH: char = '/';
pub const COLON: char = ':';
pub const SEMICOLON: char = ';';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const QUESTION: char = '?';
pub const LBRACKET: char = '[';
pub const BACKSLASH: char = '\\';
pub const RBRACKET: char = ']';
pub const CARET: char = '^';
pub const UNDERSCORE: char = '_';
pub const BT: char = '`';
pub const LBRACE: char = '{';
pub const BAR: char = '|';
pub const RBRACE: char = '}';

/// Whitespace as the markup lexer sees it (every control character counts).
pub fn is_whitespace(ch: char) -> bool {
    (ch >= TAB && ch <= SPACE) || ch == NBSP
}

pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_ascii_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

pub fn is_ascii_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

pub fn is_new_line(ch: char) -> bool {
    ch == LF || ch == CR
}

pub fn is_quote(ch: char) -> bool {
    ch == SQ || ch == DQ || ch == BT
}

pub fn is_exponent_start(ch: char) -> bool {
    ch == 'e' || ch == 'E'
}

pub fn is_exponent_sign(ch: char) -> bool {
    ch == MINUS || ch == PLUS
}

pub fn is_identifier_start(ch: char) -> bool {
    is_ascii_letter(ch) || ch == UNDERSCORE || ch == DOLLAR
}

pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || is_digit(ch)
}

/// A tag or attribute name ends on whitespace or on any markup delimiter.
pub fn is_name_end(ch: char) -> bool {
    is_whitespace(ch)
        || ch == GT
        || ch == LT
        || ch == SLASH
        || ch == SQ
        || ch == DQ
        || ch == EQ
        || ch == EOF
}
