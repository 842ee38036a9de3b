//! Language Service
//!
//! The facade editors talk to. Templates are found through the host,
//! parsed once per file version and kept until the host reports a new
//! version; position queries then run against the cached ASTs.

use std::collections::HashMap;
use std::rc::Rc;

use angular_compiler::directive_matching::SelectorError;
use angular_compiler::expression_parser::Parser;
use angular_compiler::ml_parser::{HtmlParser, ParseTreeResult};
use angular_compiler::schema::{DomElementSchemaRegistry, SchemaMetadata};
use angular_compiler::{
    CompileDirectiveMetadata, CompilePipeMetadata, TemplateParseResult, TemplateParser,
};
use indexmap::IndexMap;

use crate::completions::get_template_completions;
use crate::config::{DiagnosticsAggregation, LanguageServiceConfig};
use crate::error::LanguageServiceError;
use crate::expressions::SymbolInfo;
use crate::locate_symbol::locate_symbol;
use crate::types::{
    AstResult, Completion, Definition, Diagnostic, LanguageServiceHost, TemplateInfo,
    TemplateSource,
};
use crate::utils::{offset_span, span_of_source};

/// Parses template markup.
pub trait MarkupParser {
    fn parse(&self, source: &str, url: &str) -> ParseTreeResult;
}

impl MarkupParser for HtmlParser {
    fn parse(&self, source: &str, url: &str) -> ParseTreeResult {
        HtmlParser::parse(self, source, url)
    }
}

/// Resolves parsed markup against the directives and pipes in scope.
pub trait TemplateAstParser {
    fn parse(
        &self,
        html: &ParseTreeResult,
        component: &CompileDirectiveMetadata,
        directives: &[CompileDirectiveMetadata],
        pipes: &[CompilePipeMetadata],
        schemas: &[SchemaMetadata],
    ) -> Result<TemplateParseResult, SelectorError>;
}

/// [`TemplateParser`] over the DOM schema.
#[derive(Default)]
pub struct DomTemplateParser {
    registry: DomElementSchemaRegistry,
}

impl DomTemplateParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateAstParser for DomTemplateParser {
    fn parse(
        &self,
        html: &ParseTreeResult,
        component: &CompileDirectiveMetadata,
        directives: &[CompileDirectiveMetadata],
        pipes: &[CompilePipeMetadata],
        schemas: &[SchemaMetadata],
    ) -> Result<TemplateParseResult, SelectorError> {
        TemplateParser::new(Parser::new(), &self.registry)
            .try_parse_html(html, component, directives, pipes, schemas)
    }
}

/// `Ok(None)` when the declaring type is not a directive.
type AstOutcome = Result<Option<Rc<AstResult>>, LanguageServiceError>;

/// Templates of one file at one version.
struct TemplateReferences {
    version: String,
    templates: Option<Vec<TemplateSource>>,
}

/// Parsed templates of one file at one version.
struct FileAsts {
    version: String,
    asts: IndexMap<TemplateSource, AstOutcome>,
}

pub struct LanguageService<H: LanguageServiceHost> {
    host: H,
    config: LanguageServiceConfig,
    markup_parser: Box<dyn MarkupParser>,
    template_parser: Box<dyn TemplateAstParser>,
    template_references: HashMap<String, TemplateReferences>,
    ast_cache: HashMap<String, FileAsts>,
}

impl<H: LanguageServiceHost> LanguageService<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, LanguageServiceConfig::default())
    }

    pub fn with_config(host: H, config: LanguageServiceConfig) -> Self {
        Self::with_parsers(
            host,
            config,
            Box::new(HtmlParser::new()),
            Box::new(DomTemplateParser::new()),
        )
    }

    pub fn with_parsers(
        host: H,
        config: LanguageServiceConfig,
        markup_parser: Box<dyn MarkupParser>,
        template_parser: Box<dyn TemplateAstParser>,
    ) -> Self {
        LanguageService {
            host,
            config,
            markup_parser,
            template_parser,
            template_references: HashMap::new(),
            ast_cache: HashMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Changes to the host take effect through the versions it reports.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &LanguageServiceConfig {
        &self.config
    }

    /// Parse errors of the templates in `file_name`, relative to the file.
    ///
    /// `None` when the file has no templates. With
    /// [`DiagnosticsAggregation::LastTemplate`] each template replaces the
    /// diagnostics of the one before it.
    pub fn get_diagnostics(&mut self, file_name: &str) -> Option<Vec<Diagnostic>> {
        let templates = self.get_templates(file_name)?;
        if templates.is_empty() {
            return None;
        }

        let mut results: Option<Vec<Diagnostic>> = None;
        for template in &templates {
            let diagnostics = match self.get_template_ast(file_name, template) {
                Ok(Some(ast)) => ast
                    .parse_errors
                    .iter()
                    .map(|error| Diagnostic {
                        span: offset_span(span_of_source(&error.span), template.span.start),
                        message: error.msg.clone(),
                    })
                    .collect(),
                Ok(None) => Vec::new(),
                Err(error) => vec![Diagnostic {
                    span: template.span,
                    message: error.to_string(),
                }],
            };
            match self.config.diagnostics_aggregation {
                DiagnosticsAggregation::LastTemplate => results = Some(diagnostics),
                DiagnosticsAggregation::AllTemplates => {
                    results.get_or_insert_with(Vec::new).extend(diagnostics)
                }
            }
        }
        results
    }

    pub fn get_completions_at(&mut self, file_name: &str, position: usize) -> Option<Vec<Completion>> {
        let (template, ast) = self.get_template_ast_at_position(file_name, position)?;
        let query = self.host.get_symbol_query(file_name);
        let info = TemplateInfo {
            file_name,
            template: &template,
            ast: &ast,
        };
        get_template_completions(
            &info,
            position - template.span.start,
            &self.config,
            query.as_deref(),
        )
    }

    /// The symbol at `position` with the span of the name, relative to the
    /// file.
    pub fn get_symbol_at(&mut self, file_name: &str, position: usize) -> Option<SymbolInfo> {
        let (template, ast) = self.get_template_ast_at_position(file_name, position)?;
        let query = self.host.get_symbol_query(file_name)?;
        let info = TemplateInfo {
            file_name,
            template: &template,
            ast: &ast,
        };
        locate_symbol(&info, position - template.span.start, query.as_ref())
    }

    /// Where the symbol at `position` is declared.
    pub fn get_definition_at(&mut self, file_name: &str, position: usize) -> Option<Definition> {
        let symbol = self.get_symbol_at(file_name, position)?;
        symbol.symbol.definition()
    }

    fn get_templates(&mut self, file_name: &str) -> Option<Vec<TemplateSource>> {
        let Some(version) = self.host.get_script_version(file_name) else {
            return self.host.get_templates(file_name);
        };
        if let Some(cached) = self.template_references.get(file_name) {
            if cached.version == version {
                tracing::debug!(file = file_name, %version, "template list cache hit");
                return cached.templates.clone();
            }
        }
        tracing::debug!(file = file_name, %version, "collecting templates");
        let templates = self.host.get_templates(file_name);
        self.template_references.insert(
            file_name.to_string(),
            TemplateReferences {
                version,
                templates: templates.clone(),
            },
        );
        templates
    }

    fn get_template_ast_at_position(
        &mut self,
        file_name: &str,
        position: usize,
    ) -> Option<(TemplateSource, Rc<AstResult>)> {
        let template = self.host.get_template_at(file_name, position)?;
        if position < template.span.start {
            return None;
        }
        let ast = self.get_template_ast(file_name, &template).ok()??;
        Some((template, ast))
    }

    fn get_template_ast(&mut self, file_name: &str, template: &TemplateSource) -> AstOutcome {
        let entry = self
            .ast_cache
            .entry(file_name.to_string())
            .or_insert_with(|| FileAsts {
                version: template.version.clone(),
                asts: IndexMap::new(),
            });
        if entry.version != template.version {
            tracing::debug!(
                file = file_name,
                old = %entry.version,
                new = %template.version,
                "file changed, dropping cached templates"
            );
            entry.version = template.version.clone();
            entry.asts.clear();
        }
        if let Some(outcome) = entry.asts.get(template) {
            tracing::debug!(file = file_name, start = template.span.start, "template cache hit");
            return outcome.clone();
        }

        tracing::debug!(file = file_name, start = template.span.start, "parsing template");
        let outcome = self.parse_template(template).map(|ast| ast.map(Rc::new));
        if let Err(error) = &outcome {
            tracing::warn!(
                file = file_name,
                component = %template.type_,
                %error,
                "template could not be processed"
            );
        }
        if let Some(entry) = self.ast_cache.get_mut(file_name) {
            entry.asts.insert(template.clone(), outcome.clone());
        }
        outcome
    }

    fn parse_template(&self, template: &TemplateSource) -> Result<Option<AstResult>, LanguageServiceError> {
        let resolver = self.host.resolver();
        let Some(directive) = resolver.maybe_get_directive_metadata(&template.type_)? else {
            return Ok(None);
        };
        let html = self
            .markup_parser
            .parse(&template.source, &self.config.template_url);
        let directives = resolver.get_view_directives_metadata(&template.type_)?;
        let pipes = resolver.get_view_pipes_metadata(&template.type_)?;
        let parsed = self
            .template_parser
            .parse(&html, &directive, &directives, &pipes, &[])?;
        Ok(Some(AstResult {
            html_ast: html.root_nodes,
            template_ast: parsed.template_ast,
            directive,
            directives,
            pipes,
            parse_errors: parsed.errors,
        }))
    }
}
