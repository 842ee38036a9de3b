#![deny(clippy::all)]

/**
 * Angular Language Service
 *
 * Editor queries over Angular templates: diagnostics, completions and
 * definitions, resolved against the metadata and types a host provides.
 */

pub mod ast_path;
pub mod completions;
pub mod config;
pub mod directive_types;
pub mod error;
pub mod expressions;
pub mod html_info;
pub mod html_path;
pub mod locate_symbol;
pub mod logging;
pub mod project;
pub mod service;
pub mod static_symbols;
pub mod symbols;
pub mod template_path;
pub mod types;
pub mod utils;

pub use config::{DiagnosticsAggregation, LanguageServiceConfig};
pub use directive_types::{infer_type_arguments, inferrencial_type, resolve_inferred_type};
pub use error::{EvaluationError, LanguageServiceError, ProjectError, ResolveError};
pub use project::ProjectHost;
pub use service::{DomTemplateParser, LanguageService, MarkupParser, TemplateAstParser};
pub use static_symbols::StaticTypes;
pub use symbols::{BuiltinType, Symbol, SymbolKind, SymbolQuery, SymbolTable};
pub use types::{
    Completion, CompletionKind, Definition, Diagnostic, LanguageServiceHost, Location,
    MetadataResolver, Span, TemplateSource,
};
