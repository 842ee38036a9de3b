//! Language Service Types
//!
//! Values exchanged with the host: template sources, diagnostics,
//! completions and definitions, plus the capabilities the host provides.

use std::rc::Rc;

use angular_compiler::ml_parser::ast::Node;
use angular_compiler::template_parser::TemplateAst;
use angular_compiler::{CompileDirectiveMetadata, CompilePipeMetadata, ParseError, StaticSymbol};
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::symbols::SymbolQuery;

/// A byte range `[start, end)` into one source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} is after its end {}", start, end);
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A template found by the host in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateSource {
    /// The template text.
    pub source: String,
    /// Version of the enclosing file; a change invalidates cached ASTs.
    pub version: String,
    /// Where the template text sits in the enclosing file.
    pub span: Span,
    /// The component declaring the template.
    pub type_: StaticSymbol,
}

/// Everything parsed from one template.
#[derive(Debug, Clone)]
pub struct AstResult {
    pub html_ast: Vec<Node>,
    pub template_ast: Vec<TemplateAst>,
    /// The component declaring the template.
    pub directive: CompileDirectiveMetadata,
    pub directives: Vec<CompileDirectiveMetadata>,
    pub pipes: Vec<CompilePipeMetadata>,
    /// Markup errors followed by template errors, relative to the template.
    pub parse_errors: Vec<ParseError>,
}

/// The template under a query position.
#[derive(Debug, Clone, Copy)]
pub struct TemplateInfo<'a> {
    pub file_name: &'a str,
    pub template: &'a TemplateSource,
    pub ast: &'a AstResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Element,
    Attribute,
    Entity,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub kind: CompletionKind,
    pub name: String,
    pub sort: String,
}

impl Completion {
    pub fn new(kind: CompletionKind, name: impl Into<String>, sort: impl Into<String>) -> Self {
        Completion {
            kind,
            name: name.into(),
            sort: sort.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file_name: String,
    pub span: Span,
}

pub type Definition = Vec<Location>;

/// Directive and pipe metadata lookups for declared types.
pub trait MetadataResolver {
    /// Metadata of a directive or component; `Ok(None)` when `type_` is not
    /// a directive.
    fn maybe_get_directive_metadata(
        &self,
        type_: &StaticSymbol,
    ) -> Result<Option<CompileDirectiveMetadata>, ResolveError>;

    /// Directives usable in the template of `type_`.
    fn get_view_directives_metadata(
        &self,
        type_: &StaticSymbol,
    ) -> Result<Vec<CompileDirectiveMetadata>, ResolveError>;

    /// Pipes usable in the template of `type_`.
    fn get_view_pipes_metadata(
        &self,
        type_: &StaticSymbol,
    ) -> Result<Vec<CompilePipeMetadata>, ResolveError>;
}

/// What the language service needs from its environment. File reads and
/// template discovery are the host's business.
pub trait LanguageServiceHost {
    fn resolver(&self) -> &dyn MetadataResolver;

    fn get_template_at(&self, file_name: &str, position: usize) -> Option<TemplateSource>;

    fn get_templates(&self, file_name: &str) -> Option<Vec<TemplateSource>>;

    /// Version of `file_name`. When reported, the template list of an
    /// unchanged file is served from cache.
    fn get_script_version(&self, _file_name: &str) -> Option<String> {
        None
    }

    /// Type information for symbols visible in `file_name`.
    fn get_symbol_query(&self, _file_name: &str) -> Option<Rc<dyn SymbolQuery>> {
        None
    }
}
