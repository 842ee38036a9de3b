//! Binding Parser
//!
//! Parses the expressions found in attribute bindings, events, template
//! microsyntax and interpolated text, and turns bound properties into
//! element property ASTs checked against the DOM schema.

use std::collections::HashMap;

use crate::compile_metadata::CompilePipeMetadata;
use crate::expression_parser::{ASTWithSource, AstVisitor, Parser, ParserError, walk_ast, AST};
use crate::parse_util::{ParseError, ParseSourceSpan};
use crate::schema::element_schema_registry::ElementSchemaRegistry;

use super::template_ast::{BoundElementPropertyAst, BoundEventAst, PropertyBindingType, VariableAst};

const PROPERTY_PARTS_SEPARATOR: char = '.';
const ATTRIBUTE_PREFIX: &str = "attr";
const CLASS_PREFIX: &str = "class";
const STYLE_PREFIX: &str = "style";

/// A property binding before it is assigned to a directive input or to the
/// element itself.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundProperty {
    pub name: String,
    pub expression: ASTWithSource,
    /// Plain attribute values only ever feed directive inputs.
    pub is_literal: bool,
    pub source_span: ParseSourceSpan,
}

/// `[name, value]` pairs the element is matched against.
pub type MatchableAttrs = Vec<(String, String)>;

pub struct BindingParser<'a> {
    expr_parser: Parser,
    pipes_by_name: HashMap<String, CompilePipeMetadata>,
    schema_registry: &'a dyn ElementSchemaRegistry,
    pub errors: Vec<ParseError>,
}

impl<'a> BindingParser<'a> {
    pub fn new(
        expr_parser: Parser,
        pipes: &[CompilePipeMetadata],
        schema_registry: &'a dyn ElementSchemaRegistry,
    ) -> Self {
        BindingParser {
            expr_parser,
            pipes_by_name: pipes
                .iter()
                .map(|pipe| (pipe.name.clone(), pipe.clone()))
                .collect(),
            schema_registry,
            errors: Vec::new(),
        }
    }

    /// Parses `{{ }}` text; `None` when the value has no interpolation.
    pub fn parse_interpolation(
        &mut self,
        value: &str,
        source_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
    ) -> Option<ASTWithSource> {
        let location = source_span.start.to_string();
        let ast = self.expr_parser.parse_interpolation(value, &location)?;
        self.report_expression_parser_errors(&ast.errors, source_span);
        self.check_pipes(&ast, source_span, value_span);
        Some(ast)
    }

    /// `*ngFor="let item of items"` and the `template="..."` attribute.
    pub fn parse_inline_template_binding(
        &mut self,
        prefix_token: &str,
        value: &str,
        source_span: &ParseSourceSpan,
        target_matchable_attrs: &mut MatchableAttrs,
        target_props: &mut Vec<BoundProperty>,
        target_vars: &mut Vec<VariableAst>,
    ) {
        let location = source_span.start.to_string();
        let result = self
            .expr_parser
            .parse_template_bindings(prefix_token, value, &location);
        self.report_expression_parser_errors(&result.errors, source_span);
        for warning in &result.warnings {
            self.errors
                .push(ParseError::warning(source_span.clone(), warning.clone()));
        }

        for binding in result.template_bindings {
            if binding.key_is_var {
                target_vars.push(VariableAst {
                    name: binding.key,
                    value: binding.name.unwrap_or_else(|| "$implicit".to_string()),
                    source_span: source_span.clone(),
                });
            } else if let Some(expression) = binding.expression {
                self.check_pipes(&expression, source_span, None);
                self.parse_property_ast(
                    &binding.key,
                    expression,
                    source_span,
                    target_matchable_attrs,
                    target_props,
                );
            } else {
                target_matchable_attrs.push((binding.key.clone(), String::new()));
                self.parse_literal_attr(&binding.key, "", source_span, target_props);
            }
        }
    }

    pub fn parse_literal_attr(
        &mut self,
        name: &str,
        value: &str,
        source_span: &ParseSourceSpan,
        target_props: &mut Vec<BoundProperty>,
    ) {
        target_props.push(BoundProperty {
            name: name.to_string(),
            expression: self.expr_parser.wrap_literal_primitive(value, ""),
            is_literal: true,
            source_span: source_span.clone(),
        });
    }

    /// `[name]="expression"`
    pub fn parse_property_binding(
        &mut self,
        name: &str,
        expression: &str,
        source_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
        target_matchable_attrs: &mut MatchableAttrs,
        target_props: &mut Vec<BoundProperty>,
    ) {
        let ast = self.parse_binding(expression, source_span, value_span);
        self.parse_property_ast(name, ast, source_span, target_matchable_attrs, target_props);
    }

    /// `name="a {{b}} c"`; returns false when the value is not interpolated.
    pub fn parse_property_interpolation(
        &mut self,
        name: &str,
        value: &str,
        source_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
        target_matchable_attrs: &mut MatchableAttrs,
        target_props: &mut Vec<BoundProperty>,
    ) -> bool {
        match self.parse_interpolation(value, source_span, value_span) {
            Some(ast) => {
                self.parse_property_ast(name, ast, source_span, target_matchable_attrs, target_props);
                true
            }
            None => false,
        }
    }

    /// `(name)="handler()"`, with an optional `target:` prefix.
    pub fn parse_event(
        &mut self,
        name: &str,
        expression: &str,
        source_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
        target_matchable_attrs: &mut MatchableAttrs,
        target_events: &mut Vec<BoundEventAst>,
    ) {
        let (target, event_name) = match name.split_once(':') {
            Some((target, event_name)) => (Some(target.trim().to_string()), event_name.trim()),
            None => (None, name),
        };
        let ast = self.parse_action(expression, source_span, value_span);
        target_matchable_attrs.push((name.to_string(), ast.source.clone()));
        target_events.push(BoundEventAst {
            name: event_name.to_string(),
            target,
            handler: ast,
            source_span: source_span.clone(),
        });
    }

    /// Resolves `attr.`, `class.` and `style.` prefixes and maps plain
    /// properties through the schema.
    pub fn create_element_property_ast(&mut self, bound_prop: &BoundProperty) -> BoundElementPropertyAst {
        let parts: Vec<&str> = bound_prop.name.split(PROPERTY_PARTS_SEPARATOR).collect();
        let mut unit = None;
        let mut resolved = None;

        if parts.len() > 1 {
            match parts[0] {
                ATTRIBUTE_PREFIX => {
                    self.validate_property_or_attribute_name(parts[1], &bound_prop.source_span, true);
                    resolved = Some((parts[1].to_string(), PropertyBindingType::Attribute));
                }
                CLASS_PREFIX => {
                    resolved = Some((parts[1].to_string(), PropertyBindingType::Class));
                }
                STYLE_PREFIX => {
                    unit = parts.get(2).map(|unit| unit.to_string());
                    resolved = Some((parts[1].to_string(), PropertyBindingType::Style));
                }
                _ => {}
            }
        }

        let (name, binding_type) = match resolved {
            Some(resolved) => resolved,
            None => {
                let name = self.schema_registry.get_mapped_prop_name(&bound_prop.name);
                self.validate_property_or_attribute_name(&name, &bound_prop.source_span, false);
                (name, PropertyBindingType::Property)
            }
        };

        BoundElementPropertyAst {
            name,
            binding_type,
            value: bound_prop.expression.clone(),
            unit,
            source_span: bound_prop.source_span.clone(),
        }
    }

    pub fn report_error(&mut self, message: impl Into<String>, source_span: &ParseSourceSpan) {
        self.errors
            .push(ParseError::new(source_span.clone(), message.into()));
    }

    fn parse_binding(
        &mut self,
        value: &str,
        source_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
    ) -> ASTWithSource {
        let location = source_span.start.to_string();
        let ast = self.expr_parser.parse_binding(value, &location);
        self.report_expression_parser_errors(&ast.errors, source_span);
        self.check_pipes(&ast, source_span, value_span);
        ast
    }

    fn parse_action(
        &mut self,
        value: &str,
        source_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
    ) -> ASTWithSource {
        let location = source_span.start.to_string();
        let ast = self.expr_parser.parse_action(value, &location);
        self.report_expression_parser_errors(&ast.errors, source_span);
        if matches!(ast.ast, AST::EmptyExpr(_)) {
            self.report_error("Empty expressions are not allowed", source_span);
            return self.expr_parser.wrap_literal_primitive("ERROR", &location);
        }
        self.check_pipes(&ast, source_span, value_span);
        ast
    }

    fn parse_property_ast(
        &mut self,
        name: &str,
        ast: ASTWithSource,
        source_span: &ParseSourceSpan,
        target_matchable_attrs: &mut MatchableAttrs,
        target_props: &mut Vec<BoundProperty>,
    ) {
        target_matchable_attrs.push((name.to_string(), ast.source.clone()));
        target_props.push(BoundProperty {
            name: name.to_string(),
            expression: ast,
            is_literal: false,
            source_span: source_span.clone(),
        });
    }

    fn report_expression_parser_errors(&mut self, errors: &[ParserError], source_span: &ParseSourceSpan) {
        for error in errors {
            self.report_error(error.message.clone(), source_span);
        }
    }

    /// Every pipe used in `ast` must be declared.
    fn check_pipes(
        &mut self,
        ast: &ASTWithSource,
        source_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
    ) {
        let mut collector = PipeCollector::default();
        collector.visit(&ast.ast);
        for (name, span) in collector.pipes {
            if self.pipes_by_name.contains_key(&name) {
                continue;
            }
            let span = match value_span {
                Some(value_span) => ParseSourceSpan::new(
                    value_span.start.move_by(span.start as isize),
                    value_span.start.move_by(span.end as isize),
                ),
                None => source_span.clone(),
            };
            self.report_error(format!("The pipe '{}' could not be found", name), &span);
        }
    }

    fn validate_property_or_attribute_name(&mut self, name: &str, source_span: &ParseSourceSpan, is_attr: bool) {
        if !name.to_lowercase().starts_with("on") {
            return;
        }
        let message = if is_attr {
            format!(
                "Binding to event attribute '{}' is disallowed for security reasons, please use ({})=...",
                name,
                &name[2..]
            )
        } else {
            format!(
                "Binding to event property '{}' is disallowed for security reasons, please use ({})=...\nIf '{}' is a directive input, make sure the directive is imported by the current module.",
                name,
                &name[2..],
                name
            )
        };
        self.report_error(message, source_span);
    }
}

/// Pipe names in first-use order with the span of their first use.
#[derive(Default)]
struct PipeCollector {
    pipes: Vec<(String, crate::expression_parser::ParseSpan)>,
}

impl AstVisitor for PipeCollector {
    fn visit(&mut self, ast: &AST) {
        if let AST::BindingPipe(pipe) = ast {
            if !self.pipes.iter().any(|(name, _)| *name == pipe.name) {
                self.pipes.push((pipe.name.clone(), pipe.span));
            }
        }
        walk_ast(self, ast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_metadata::{CompileTypeMetadata, StaticSymbol};
    use crate::parse_util::{ParseLocation, ParseSourceFile};
    use crate::schema::DomElementSchemaRegistry;

    fn span(content: &str) -> ParseSourceSpan {
        let file = ParseSourceFile::new(content, "test.html");
        ParseSourceSpan::new(
            ParseLocation::new(file.clone(), 0, 0, 0),
            ParseLocation::new(file, content.len(), 0, content.len()),
        )
    }

    fn pipe(name: &str) -> CompilePipeMetadata {
        CompilePipeMetadata::new(
            CompileTypeMetadata::new(StaticSymbol::new("pipes.ts", "SomePipe")),
            name,
        )
    }

    #[test]
    fn test_unknown_pipe_is_reported() {
        let registry = DomElementSchemaRegistry::new();
        let mut parser = BindingParser::new(Parser::new(), &[pipe("upper")], &registry);
        let mut attrs = Vec::new();
        let mut props = Vec::new();
        let source = span("[title]=\"a | upper | lower\"");
        parser.parse_property_binding("title", "a | upper | lower", &source, None, &mut attrs, &mut props);
        assert_eq!(parser.errors.len(), 1);
        assert_eq!(parser.errors[0].msg, "The pipe 'lower' could not be found");
        assert_eq!(attrs, vec![("title".to_string(), "a | upper | lower".to_string())]);
    }

    #[test]
    fn test_element_property_prefixes() {
        let registry = DomElementSchemaRegistry::new();
        let mut parser = BindingParser::new(Parser::new(), &[], &registry);
        let mut attrs = Vec::new();
        let mut props = Vec::new();
        let source = span("x");
        parser.parse_property_binding("style.width.px", "w", &source, None, &mut attrs, &mut props);
        parser.parse_property_binding("attr.role", "r", &source, None, &mut attrs, &mut props);
        parser.parse_property_binding("class", "c", &source, None, &mut attrs, &mut props);

        let style = parser.create_element_property_ast(&props[0]);
        assert_eq!(style.binding_type, PropertyBindingType::Style);
        assert_eq!(style.name, "width");
        assert_eq!(style.unit.as_deref(), Some("px"));

        let attr = parser.create_element_property_ast(&props[1]);
        assert_eq!(attr.binding_type, PropertyBindingType::Attribute);
        assert_eq!(attr.name, "role");

        let class = parser.create_element_property_ast(&props[2]);
        assert_eq!(class.binding_type, PropertyBindingType::Property);
        assert_eq!(class.name, "className");
    }

    #[test]
    fn test_event_targets() {
        let registry = DomElementSchemaRegistry::new();
        let mut parser = BindingParser::new(Parser::new(), &[], &registry);
        let mut attrs = Vec::new();
        let mut events = Vec::new();
        let source = span("x");
        parser.parse_event("window:resize", "onResize()", &source, None, &mut attrs, &mut events);
        assert_eq!(events[0].name, "resize");
        assert_eq!(events[0].target.as_deref(), Some("window"));
        assert_eq!(events[0].full_name(), "window:resize");
        assert!(parser.errors.is_empty());
    }

    #[test]
    fn test_empty_event_handler() {
        let registry = DomElementSchemaRegistry::new();
        let mut parser = BindingParser::new(Parser::new(), &[], &registry);
        let mut attrs = Vec::new();
        let mut events = Vec::new();
        parser.parse_event("click", "", &span("x"), None, &mut attrs, &mut events);
        assert_eq!(parser.errors[0].msg, "Empty expressions are not allowed");
    }

    #[test]
    fn test_template_binding_variables() {
        let registry = DomElementSchemaRegistry::new();
        let mut parser = BindingParser::new(Parser::new(), &[], &registry);
        let mut attrs = Vec::new();
        let mut props = Vec::new();
        let mut vars = Vec::new();
        parser.parse_inline_template_binding(
            "ngFor",
            "let item of items; let i = index",
            &span("x"),
            &mut attrs,
            &mut props,
            &mut vars,
        );
        let names: Vec<(&str, &str)> = vars.iter().map(|v| (v.name.as_str(), v.value.as_str())).collect();
        assert_eq!(names, vec![("item", "$implicit"), ("i", "index")]);
        let props: Vec<&str> = props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(props, vec!["ngFor", "ngForOf"]);
    }

    #[test]
    fn test_event_property_binding_is_rejected() {
        let registry = DomElementSchemaRegistry::new();
        let mut parser = BindingParser::new(Parser::new(), &[], &registry);
        let mut attrs = Vec::new();
        let mut props = Vec::new();
        parser.parse_property_binding("onclick", "x", &span("x"), None, &mut attrs, &mut props);
        parser.create_element_property_ast(&props[0]);
        assert!(parser.errors[0]
            .msg
            .starts_with("Binding to event property 'onclick' is disallowed"));
    }
}
