/**
 * Expression Parser Module
 *
 * Lexer, AST and parser for binding expressions.
 */
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod serializer;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{Parser, SplitInterpolation, TemplateBindingParseResult};
pub use serializer::serialize;
