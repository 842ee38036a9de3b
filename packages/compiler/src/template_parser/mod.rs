//! Template Parser Module
//!
//! Turns markup into the template AST using directive and pipe metadata.

pub mod binding_parser;
pub mod template_ast;
#[allow(clippy::module_inception)]
pub mod template_parser;
pub mod template_preparser;

pub use binding_parser::{BindingParser, BoundProperty};
pub use template_ast::*;
pub use template_parser::{create_element_css_selector, TemplateParseResult, TemplateParser};
