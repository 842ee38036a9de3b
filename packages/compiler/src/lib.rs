#![deny(clippy::all)]

/**
 * Angular Template Compiler
 *
 * The front end of the Angular template compiler: markup and expression
 * parsing, selector matching, the DOM schema and the template parser.
 */

pub mod chars;
pub mod compile_metadata;
pub mod directive_matching;
pub mod parse_util;

// Parser modules (mirrors Angular structure)
pub mod expression_parser;
pub mod ml_parser;
pub mod template_parser;

pub mod schema;

pub use compile_metadata::{
    CompileDirectiveMetadata, CompilePipeMetadata, CompileTypeMetadata, StaticSymbol,
};
pub use parse_util::{ParseError, ParseErrorLevel, ParseLocation, ParseSourceFile, ParseSourceSpan};
pub use template_parser::{TemplateParseResult, TemplateParser};
