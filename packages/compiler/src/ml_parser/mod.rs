//! ML (Markup Language) Parser Module
//!
//! Lexes and parses HTML templates into the markup AST.

pub mod ast;
pub mod entities;
pub mod html_parser;
pub mod html_tags;
pub mod lexer;
pub mod parser;
pub mod tags;
pub mod tokens;

pub use ast::*;
pub use html_parser::HtmlParser;
pub use html_tags::{get_html_tag_definition, HtmlTagDefinition};
pub use lexer::{tokenize, TokenizeOptions, TokenizeResult};
pub use parser::{ParseTreeResult, Parser};
pub use tags::*;
pub use tokens::{Token, TokenType};
