//! Template Parser
//!
//! Resolves a markup tree against the directives and pipes visible to a
//! component, producing the template AST. Problems in the template are
//! collected as [`ParseError`]s; only malformed directive selectors make
//! parsing fail as a whole.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::compile_metadata::{CompileDirectiveMetadata, CompilePipeMetadata};
use crate::directive_matching::{CssSelector, SelectorError, SelectorMatcher};
use crate::expression_parser::{Parser, AST};
use crate::ml_parser::ast::{Attribute, Element, Node, Text};
use crate::ml_parser::html_parser::HtmlParser;
use crate::ml_parser::parser::ParseTreeResult;
use crate::ml_parser::tags::{is_ng_template, split_ns_name};
use crate::parse_util::{ParseError, ParseErrorLevel, ParseSourceSpan};
use crate::schema::element_schema_registry::{ElementSchemaRegistry, SchemaMetadata};

use super::binding_parser::{BindingParser, BoundProperty, MatchableAttrs};
use super::template_ast::*;
use super::template_preparser::{preparse_element, PreparsedElementType};

// Group 1 = "bind-", 2 = "let-", 3 = "ref-/#", 4 = "on-", 5 = "bindon-",
// 6 = identifier after a keyword, 7 = "[(x)]", 8 = "[x]", 9 = "(x)".
static BIND_NAME_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:(bind-)|(let-)|(ref-|#)|(on-)|(bindon-))(.+))$|^\[\(([^\)]+)\)\]$|^\[([^\]]+)\]$|^\(([^\)]+)\)$")
        .expect("binding name pattern is valid")
});

const TEMPLATE_ATTR: &str = "template";
const TEMPLATE_ATTR_PREFIX: &str = "*";
const CLASS_ATTR: &str = "class";

#[derive(Debug, Clone, Default)]
pub struct TemplateParseResult {
    pub template_ast: Vec<TemplateAst>,
    /// Markup errors followed by binding and validation errors.
    pub errors: Vec<ParseError>,
}

impl TemplateParseResult {
    pub fn has_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|error| error.level == ParseErrorLevel::Error)
    }
}

pub struct TemplateParser<'a> {
    expr_parser: Parser,
    schema_registry: &'a dyn ElementSchemaRegistry,
    html_parser: HtmlParser,
}

impl<'a> TemplateParser<'a> {
    pub fn new(expr_parser: Parser, schema_registry: &'a dyn ElementSchemaRegistry) -> Self {
        TemplateParser {
            expr_parser,
            schema_registry,
            html_parser: HtmlParser::new(),
        }
    }

    /// Parses the markup of `template` and resolves it.
    pub fn parse(
        &self,
        component: &CompileDirectiveMetadata,
        template: &str,
        directives: &[CompileDirectiveMetadata],
        pipes: &[CompilePipeMetadata],
        schemas: &[SchemaMetadata],
        template_url: &str,
    ) -> Result<TemplateParseResult, SelectorError> {
        let html = self.html_parser.parse(template, template_url);
        self.try_parse_html(&html, component, directives, pipes, schemas)
    }

    /// Resolves an already parsed markup tree.
    pub fn try_parse_html(
        &self,
        html: &ParseTreeResult,
        _component: &CompileDirectiveMetadata,
        directives: &[CompileDirectiveMetadata],
        pipes: &[CompilePipeMetadata],
        schemas: &[SchemaMetadata],
    ) -> Result<TemplateParseResult, SelectorError> {
        let mut errors = html.errors.clone();
        let mut template_ast = Vec::new();

        if !html.root_nodes.is_empty() {
            let directives = remove_duplicates(directives, |d| &d.type_.reference);
            let pipes = remove_duplicates(pipes, |p| &p.type_.reference);

            let mut selector_matcher = SelectorMatcher::new();
            for (index, directive) in directives.iter().enumerate() {
                if let Some(selector) = &directive.selector {
                    selector_matcher.add_selectables(&CssSelector::parse(selector)?, index);
                }
            }

            let mut visitor = TemplateParseVisitor {
                directives: &directives,
                selector_matcher,
                binding_parser: BindingParser::new(self.expr_parser, &pipes, self.schema_registry),
                schema_registry: self.schema_registry,
                schemas,
                ng_content_count: 0,
                errors: Vec::new(),
            };
            template_ast = visitor.visit_nodes(&html.root_nodes);
            errors.extend(visitor.binding_parser.errors);
            errors.extend(visitor.errors);
        }

        assert_no_reference_duplication(&template_ast, &mut errors);
        Ok(TemplateParseResult {
            template_ast,
            errors,
        })
    }
}

/// Keeps the first declaration of each type.
fn remove_duplicates<T: Clone, K: PartialEq>(items: &[T], key: impl Fn(&T) -> &K) -> Vec<T> {
    let mut result: Vec<T> = Vec::new();
    for item in items {
        if !result.iter().any(|existing| key(existing) == key(item)) {
            result.push(item.clone());
        }
    }
    result
}

/// The selector an element is matched with: its local name, its matchable
/// attributes and the classes of its `class` attribute.
pub fn create_element_css_selector(element_name: &str, matchable_attrs: &[(String, String)]) -> CssSelector {
    let mut css_selector = CssSelector::new();
    css_selector.set_element(&ns_free_name(element_name));
    for (name, value) in matchable_attrs {
        css_selector.add_attribute(&ns_free_name(name), value);
        if name.to_lowercase() == CLASS_ATTR {
            for class_name in value.split_whitespace() {
                css_selector.add_class_name(class_name);
            }
        }
    }
    css_selector
}

fn ns_free_name(name: &str) -> String {
    split_ns_name(name, false)
        .map(|(_, name)| name)
        .unwrap_or_else(|_| name.to_string())
}

/// `data-` prefixed attributes bind like their plain names.
fn normalize_attribute_name(name: &str) -> &str {
    match name.get(..5) {
        Some(prefix) if name.len() > 5 && prefix.eq_ignore_ascii_case("data-") => &name[5..],
        _ => name,
    }
}

fn is_empty_expression(ast: &crate::expression_parser::ASTWithSource) -> bool {
    matches!(ast.ast, AST::EmptyExpr(_))
}

fn is_empty_text_node(node: &Node) -> bool {
    matches!(node, Node::Text(text) if text.value.trim().is_empty())
}

/// `#name="exportAs"` before it is resolved against the matched directives.
struct ElementOrDirectiveRef {
    name: String,
    value: String,
    source_span: ParseSourceSpan,
}

/// Bindings collected from the attributes of one element.
#[derive(Default)]
struct ElementBindings {
    matchable_attrs: MatchableAttrs,
    props: Vec<BoundProperty>,
    events: Vec<BoundEventAst>,
    refs: Vec<ElementOrDirectiveRef>,
    vars: Vec<VariableAst>,
    attrs: Vec<AttrAst>,
    template_matchable_attrs: MatchableAttrs,
    template_props: Vec<BoundProperty>,
    template_vars: Vec<VariableAst>,
    has_inline_template: bool,
}

struct TemplateParseVisitor<'p, 's> {
    directives: &'p [CompileDirectiveMetadata],
    selector_matcher: SelectorMatcher<usize>,
    binding_parser: BindingParser<'s>,
    schema_registry: &'s dyn ElementSchemaRegistry,
    schemas: &'p [SchemaMetadata],
    ng_content_count: usize,
    errors: Vec<ParseError>,
}

impl<'p, 's> TemplateParseVisitor<'p, 's> {
    fn report_error(&mut self, message: impl Into<String>, source_span: &ParseSourceSpan) {
        self.errors
            .push(ParseError::new(source_span.clone(), message.into()));
    }

    fn visit_nodes(&mut self, nodes: &[Node]) -> Vec<TemplateAst> {
        nodes.iter().filter_map(|node| self.visit_node(node)).collect()
    }

    fn visit_node(&mut self, node: &Node) -> Option<TemplateAst> {
        match node {
            Node::Element(element) => self.visit_element(element),
            Node::Text(text) => Some(self.visit_text(text)),
            Node::Attribute(attribute) => Some(TemplateAst::Attr(visit_attribute(attribute))),
            // Comments and ICU messages carry no bindings.
            Node::Comment(_) | Node::Expansion(_) | Node::ExpansionCase(_) => None,
        }
    }

    fn visit_text(&mut self, text: &Text) -> TemplateAst {
        match self
            .binding_parser
            .parse_interpolation(&text.value, &text.source_span, Some(&text.source_span))
        {
            Some(value) => TemplateAst::BoundText(BoundTextAst {
                value,
                source_span: text.source_span.clone(),
            }),
            None => TemplateAst::Text(TextAst {
                value: text.value.clone(),
                source_span: text.source_span.clone(),
            }),
        }
    }

    fn visit_element(&mut self, element: &Element) -> Option<TemplateAst> {
        let preparsed = preparse_element(element);
        if preparsed.is_dropped() {
            return None;
        }

        let is_template_element = is_ng_template(&element.name);
        let mut bindings = ElementBindings::default();
        for attr in &element.attrs {
            self.parse_attribute(is_template_element, attr, &mut bindings);
        }

        let element_selector = create_element_css_selector(&element.name, &bindings.matchable_attrs);
        let (directive_metas, match_element) = self.parse_directives(&element_selector);
        let mut references = Vec::new();
        let mut bound_directive_prop_names = HashSet::new();
        let directive_asts = self.create_directive_asts(
            is_template_element,
            &directive_metas,
            &bindings.props,
            &bindings.refs,
            &element.source_span,
            &mut references,
            &mut bound_directive_prop_names,
        );
        let element_props =
            self.create_element_property_asts(&element.name, &bindings.props, &bound_directive_prop_names);
        let providers = providers_of(&directive_asts, &element.source_span);

        let children = if preparsed.non_bindable {
            element.children.iter().filter_map(non_bindable_node).collect()
        } else {
            self.visit_nodes(&element.children)
        };

        let mut parsed = if preparsed.element_type == PreparsedElementType::NgContent {
            if !element.children.iter().all(is_empty_text_node) {
                self.report_error("<ng-content> element cannot have content.", &element.source_span);
            }
            let index = self.ng_content_count;
            self.ng_content_count += 1;
            TemplateAst::NgContent(NgContentAst {
                index,
                source_span: element.source_span.clone(),
            })
        } else if is_template_element {
            self.assert_all_events_published_by_directives(&directive_asts, &bindings.events);
            self.assert_no_components_nor_element_bindings_on_template(
                &directive_asts,
                &element_props,
                &element.source_span,
            );
            TemplateAst::EmbeddedTemplate(EmbeddedTemplateAst {
                attrs: std::mem::take(&mut bindings.attrs),
                outputs: std::mem::take(&mut bindings.events),
                references,
                variables: std::mem::take(&mut bindings.vars),
                directives: directive_asts,
                providers,
                children,
                source_span: element.source_span.clone(),
            })
        } else {
            self.assert_element_exists(match_element, element);
            self.assert_only_one_component(&directive_asts, &element.source_span);
            TemplateAst::Element(ElementAst {
                name: element.name.clone(),
                attrs: std::mem::take(&mut bindings.attrs),
                inputs: element_props,
                outputs: std::mem::take(&mut bindings.events),
                references,
                directives: directive_asts,
                providers,
                children,
                source_span: element.source_span.clone(),
                end_source_span: element.end_source_span.clone(),
            })
        };

        if bindings.has_inline_template {
            let template_selector =
                create_element_css_selector("ng-template", &bindings.template_matchable_attrs);
            let (template_directive_metas, _) = self.parse_directives(&template_selector);
            let mut template_bound_prop_names = HashSet::new();
            let template_directive_asts = self.create_directive_asts(
                true,
                &template_directive_metas,
                &bindings.template_props,
                &[],
                &element.source_span,
                &mut Vec::new(),
                &mut template_bound_prop_names,
            );
            let template_element_props = self.create_element_property_asts(
                &element.name,
                &bindings.template_props,
                &template_bound_prop_names,
            );
            self.assert_no_components_nor_element_bindings_on_template(
                &template_directive_asts,
                &template_element_props,
                &element.source_span,
            );
            let providers = providers_of(&template_directive_asts, &element.source_span);
            parsed = TemplateAst::EmbeddedTemplate(EmbeddedTemplateAst {
                attrs: Vec::new(),
                outputs: Vec::new(),
                references: Vec::new(),
                variables: std::mem::take(&mut bindings.template_vars),
                directives: template_directive_asts,
                providers,
                children: vec![parsed],
                source_span: element.source_span.clone(),
            });
        }

        Some(parsed)
    }

    fn parse_attribute(&mut self, is_template_element: bool, attr: &Attribute, bindings: &mut ElementBindings) {
        let has_binding = self.parse_attr(is_template_element, attr, bindings);

        let name = normalize_attribute_name(&attr.name);
        let template_binding = if name == TEMPLATE_ATTR {
            let value = attr.value.trim_start();
            let key_len = value
                .find(|c: char| c.is_whitespace() || c == ':' || c == ';')
                .unwrap_or(value.len());
            let rest = value[key_len..].trim_start().trim_start_matches(':');
            Some((value[..key_len].to_string(), rest.to_string()))
        } else {
            name.strip_prefix(TEMPLATE_ATTR_PREFIX)
                .map(|key| (key.to_string(), attr.value.clone()))
        };

        if let Some((prefix_token, source)) = &template_binding {
            if bindings.has_inline_template {
                self.report_error(
                    "Can't have multiple template bindings on one element. Use only one attribute named 'template' or prefixed with *",
                    &attr.source_span,
                );
            }
            bindings.has_inline_template = true;
            self.binding_parser.parse_inline_template_binding(
                prefix_token,
                source,
                &attr.source_span,
                &mut bindings.template_matchable_attrs,
                &mut bindings.template_props,
                &mut bindings.template_vars,
            );
        }

        if !has_binding && template_binding.is_none() {
            bindings.attrs.push(visit_attribute(attr));
            bindings
                .matchable_attrs
                .push((attr.name.clone(), attr.value.clone()));
        }
    }

    /// Returns whether the attribute is a binding rather than a plain value.
    fn parse_attr(&mut self, is_template_element: bool, attr: &Attribute, bindings: &mut ElementBindings) -> bool {
        let name = normalize_attribute_name(&attr.name);
        let value = attr.value.as_str();
        let span = &attr.source_span;
        let value_span = attr.value_span.as_ref();

        let has_binding = match BIND_NAME_REGEXP.captures(name) {
            Some(parts) => {
                let group = |index: usize| parts.get(index).map(|m| m.as_str());
                let ident = group(6).unwrap_or_default();
                if group(1).is_some() {
                    self.binding_parser.parse_property_binding(
                        ident,
                        value,
                        span,
                        value_span,
                        &mut bindings.matchable_attrs,
                        &mut bindings.props,
                    );
                } else if group(2).is_some() {
                    if is_template_element {
                        if ident.contains('-') {
                            self.report_error("\"-\" is not allowed in variable names", span);
                        }
                        bindings.vars.push(VariableAst {
                            name: ident.to_string(),
                            value: value.to_string(),
                            source_span: span.clone(),
                        });
                    } else {
                        self.report_error("\"let-\" is only supported on template elements.", span);
                    }
                } else if group(3).is_some() {
                    if ident.contains('-') {
                        self.report_error("\"-\" is not allowed in reference names", span);
                    }
                    bindings.refs.push(ElementOrDirectiveRef {
                        name: ident.to_string(),
                        value: value.to_string(),
                        source_span: span.clone(),
                    });
                } else if group(4).is_some() {
                    self.binding_parser.parse_event(
                        ident,
                        value,
                        span,
                        value_span,
                        &mut bindings.matchable_attrs,
                        &mut bindings.events,
                    );
                } else if group(5).is_some() {
                    self.parse_two_way_binding(ident, value, span, value_span, bindings);
                } else if let Some(banana) = group(7) {
                    self.parse_two_way_binding(banana, value, span, value_span, bindings);
                } else if let Some(property) = group(8) {
                    self.binding_parser.parse_property_binding(
                        property,
                        value,
                        span,
                        value_span,
                        &mut bindings.matchable_attrs,
                        &mut bindings.props,
                    );
                } else if let Some(event) = group(9) {
                    self.binding_parser.parse_event(
                        event,
                        value,
                        span,
                        value_span,
                        &mut bindings.matchable_attrs,
                        &mut bindings.events,
                    );
                }
                true
            }
            None => self.binding_parser.parse_property_interpolation(
                name,
                value,
                span,
                value_span,
                &mut bindings.matchable_attrs,
                &mut bindings.props,
            ),
        };

        if !has_binding {
            self.binding_parser
                .parse_literal_attr(name, value, span, &mut bindings.props);
        }
        has_binding
    }

    /// `[(x)]="y"` is `[x]="y"` plus `(xChange)="y=$event"`.
    fn parse_two_way_binding(
        &mut self,
        name: &str,
        expression: &str,
        span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
        bindings: &mut ElementBindings,
    ) {
        self.binding_parser.parse_property_binding(
            name,
            expression,
            span,
            value_span,
            &mut bindings.matchable_attrs,
            &mut bindings.props,
        );
        self.binding_parser.parse_event(
            &format!("{}Change", name),
            &format!("{}=$event", expression),
            span,
            None,
            &mut bindings.matchable_attrs,
            &mut bindings.events,
        );
    }

    /// Matched directives in declaration order, and whether any matched
    /// through an element selector.
    fn parse_directives(&self, selector: &CssSelector) -> (Vec<&'p CompileDirectiveMetadata>, bool) {
        let mut indices = Vec::new();
        let mut match_element = false;
        self.selector_matcher.match_selector(selector, |css_selector, index| {
            indices.push(*index);
            match_element = match_element || css_selector.has_element_selector();
        });
        indices.sort_unstable();
        indices.dedup();
        let directives = self.directives;
        (indices.into_iter().map(|index| &directives[index]).collect(), match_element)
    }

    #[allow(clippy::too_many_arguments)]
    fn create_directive_asts(
        &mut self,
        is_template_element: bool,
        directives: &[&CompileDirectiveMetadata],
        props: &[BoundProperty],
        element_or_directive_refs: &[ElementOrDirectiveRef],
        element_source_span: &ParseSourceSpan,
        target_references: &mut Vec<ReferenceAst>,
        target_bound_directive_prop_names: &mut HashSet<String>,
    ) -> Vec<DirectiveAst> {
        let mut matched_references = HashSet::new();
        let mut has_component = false;

        let directive_asts = directives
            .iter()
            .map(|directive| {
                has_component = has_component || directive.is_component;
                let inputs = create_directive_property_asts(directive, props, target_bound_directive_prop_names);
                for element_ref in element_or_directive_refs {
                    let exported = !element_ref.value.is_empty()
                        && directive.export_as.as_deref() == Some(element_ref.value.as_str());
                    if (element_ref.value.is_empty() && directive.is_component) || exported {
                        target_references.push(ReferenceAst {
                            name: element_ref.name.clone(),
                            value: directive.type_.reference.clone(),
                            source_span: element_ref.source_span.clone(),
                        });
                        matched_references.insert(element_ref.name.clone());
                    }
                }
                DirectiveAst {
                    directive: (*directive).clone(),
                    inputs,
                    source_span: element_source_span
                        .clone()
                        .with_details(format!("Directive {}", directive.name())),
                }
            })
            .collect();

        for element_ref in element_or_directive_refs {
            if !element_ref.value.is_empty() {
                if !matched_references.contains(&element_ref.name) {
                    self.report_error(
                        format!(
                            "There is no directive with \"exportAs\" set to \"{}\"",
                            element_ref.value
                        ),
                        &element_ref.source_span,
                    );
                }
            } else if !has_component {
                let value = if is_template_element {
                    template_ref_symbol()
                } else {
                    element_ref_symbol()
                };
                target_references.push(ReferenceAst {
                    name: element_ref.name.clone(),
                    value,
                    source_span: element_ref.source_span.clone(),
                });
            }
        }

        directive_asts
    }

    fn create_element_property_asts(
        &mut self,
        element_name: &str,
        props: &[BoundProperty],
        bound_directive_prop_names: &HashSet<String>,
    ) -> Vec<BoundElementPropertyAst> {
        let bound_props: Vec<BoundElementPropertyAst> = props
            .iter()
            .filter(|prop| !prop.is_literal && !bound_directive_prop_names.contains(&prop.name))
            .map(|prop| self.binding_parser.create_element_property_ast(prop))
            .collect();
        self.check_properties_in_schema(element_name, bound_props)
    }

    fn check_properties_in_schema(
        &mut self,
        element_name: &str,
        bound_props: Vec<BoundElementPropertyAst>,
    ) -> Vec<BoundElementPropertyAst> {
        let mut result = Vec::with_capacity(bound_props.len());
        for prop in bound_props {
            if prop.binding_type == PropertyBindingType::Property
                && !self
                    .schema_registry
                    .has_property(element_name, &prop.name, self.schemas)
            {
                let mut message = format!(
                    "Can't bind to '{}' since it isn't a known property of '{}'.",
                    prop.name, element_name
                );
                if element_name.starts_with("ng-") {
                    message.push_str(&format!(
                        "\n1. If '{}' is an Angular directive, then add 'CommonModule' to the '@NgModule.imports' of this component.\n2. To allow any property add 'NO_ERRORS_SCHEMA' to the '@NgModule.schemas' of this component.",
                        prop.name
                    ));
                } else if element_name.contains('-') {
                    message.push_str(&format!(
                        "\n1. If '{el}' is an Angular component and it has '{prop}' input, then verify that it is part of this module.\n2. If '{el}' is a Web Component then add 'CUSTOM_ELEMENTS_SCHEMA' to the '@NgModule.schemas' of this component to suppress this message.\n3. To allow any property add 'NO_ERRORS_SCHEMA' to the '@NgModule.schemas' of this component.",
                        el = element_name,
                        prop = prop.name
                    ));
                }
                self.report_error(message, &prop.source_span);
            }
            if !is_empty_expression(&prop.value) {
                result.push(prop);
            }
        }
        result
    }

    fn assert_element_exists(&mut self, match_element: bool, element: &Element) {
        let name = element.name.trim_start_matches(":xhtml:");
        if match_element || self.schema_registry.has_element(name, self.schemas) {
            return;
        }
        let mut message = format!(
            "'{name}' is not a known element:\n1. If '{name}' is an Angular component, then verify that it is part of this module.\n",
            name = name
        );
        if name.contains('-') {
            message.push_str(&format!(
                "2. If '{}' is a Web Component then add 'CUSTOM_ELEMENTS_SCHEMA' to the '@NgModule.schemas' of this component to suppress this message.",
                name
            ));
        } else {
            message.push_str(
                "2. To allow any element add 'NO_ERRORS_SCHEMA' to the '@NgModule.schemas' of this component.",
            );
        }
        self.report_error(message, &element.source_span);
    }

    fn assert_only_one_component(&mut self, directives: &[DirectiveAst], source_span: &ParseSourceSpan) {
        let names = component_names(directives);
        if names.len() > 1 {
            self.report_error(
                format!(
                    "More than one component matched on this element.\nMake sure that only one component's selector can match a given element.\nConflicting components: {}",
                    names.join(",")
                ),
                source_span,
            );
        }
    }

    fn assert_no_components_nor_element_bindings_on_template(
        &mut self,
        directives: &[DirectiveAst],
        element_props: &[BoundElementPropertyAst],
        source_span: &ParseSourceSpan,
    ) {
        let names = component_names(directives);
        if !names.is_empty() {
            self.report_error(
                format!("Components on an embedded template: {}", names.join(",")),
                source_span,
            );
        }
        for prop in element_props {
            self.report_error(
                format!(
                    "Property binding {} not used by any directive on an embedded template. Make sure that the property name is spelled correctly and all directives are listed in the \"@NgModule.declarations\".",
                    prop.name
                ),
                source_span,
            );
        }
    }

    fn assert_all_events_published_by_directives(&mut self, directives: &[DirectiveAst], events: &[BoundEventAst]) {
        let directive_events: HashSet<&str> = directives
            .iter()
            .flat_map(|directive| directive.directive.outputs.values())
            .map(String::as_str)
            .collect();
        for event in events {
            if event.target.is_some() || !directive_events.contains(event.name.as_str()) {
                self.report_error(
                    format!(
                        "Event binding {} not emitted by any directive on an embedded template. Make sure that the event name is spelled correctly and all directives are listed in the \"@NgModule.declarations\".",
                        event.full_name()
                    ),
                    &event.source_span,
                );
            }
        }
    }
}

fn visit_attribute(attribute: &Attribute) -> AttrAst {
    AttrAst {
        name: attribute.name.clone(),
        value: attribute.value.clone(),
        source_span: attribute.source_span.clone(),
    }
}

/// Inside `ngNonBindable` only the plain structure is kept.
fn non_bindable_node(node: &Node) -> Option<TemplateAst> {
    match node {
        Node::Element(element) => {
            let preparsed = preparse_element(element);
            if preparsed.is_dropped() {
                return None;
            }
            Some(TemplateAst::Element(ElementAst {
                name: element.name.clone(),
                attrs: element.attrs.iter().map(visit_attribute).collect(),
                inputs: Vec::new(),
                outputs: Vec::new(),
                references: Vec::new(),
                directives: Vec::new(),
                providers: Vec::new(),
                children: element.children.iter().filter_map(non_bindable_node).collect(),
                source_span: element.source_span.clone(),
                end_source_span: element.end_source_span.clone(),
            }))
        }
        Node::Text(text) => Some(TemplateAst::Text(TextAst {
            value: text.value.clone(),
            source_span: text.source_span.clone(),
        })),
        Node::Attribute(attribute) => Some(TemplateAst::Attr(visit_attribute(attribute))),
        Node::Comment(_) | Node::Expansion(_) | Node::ExpansionCase(_) => None,
    }
}

/// Feeds directive inputs from bound properties; a property binding wins
/// over a literal attribute of the same name.
fn create_directive_property_asts(
    directive: &CompileDirectiveMetadata,
    bound_props: &[BoundProperty],
    target_bound_directive_prop_names: &mut HashSet<String>,
) -> Vec<BoundDirectivePropertyAst> {
    let mut by_name: Vec<&BoundProperty> = Vec::new();
    for prop in bound_props {
        match by_name.iter().position(|existing| existing.name == prop.name) {
            Some(index) if by_name[index].is_literal => by_name[index] = prop,
            Some(_) => {}
            None => by_name.push(prop),
        }
    }

    let mut result = Vec::new();
    for (dir_prop, el_prop) in &directive.inputs {
        if let Some(bound_prop) = by_name.iter().find(|prop| &prop.name == el_prop) {
            target_bound_directive_prop_names.insert(bound_prop.name.clone());
            if !is_empty_expression(&bound_prop.expression) {
                result.push(BoundDirectivePropertyAst {
                    directive_name: dir_prop.clone(),
                    template_name: bound_prop.name.clone(),
                    value: bound_prop.expression.clone(),
                    source_span: bound_prop.source_span.clone(),
                });
            }
        }
    }
    result
}

fn providers_of(directives: &[DirectiveAst], source_span: &ParseSourceSpan) -> Vec<ProviderAst> {
    directives
        .iter()
        .map(|directive| ProviderAst {
            token: directive.directive.type_.reference.clone(),
            source_span: source_span.clone(),
        })
        .collect()
}

fn component_names(directives: &[DirectiveAst]) -> Vec<String> {
    directives
        .iter()
        .filter(|directive| directive.directive.is_component)
        .map(|directive| directive.directive.name().to_string())
        .collect()
}

/// Reference names must be unique within one template scope.
fn assert_no_reference_duplication(nodes: &[TemplateAst], errors: &mut Vec<ParseError>) {
    fn collect(nodes: &[TemplateAst], seen: &mut Vec<String>, errors: &mut Vec<ParseError>) {
        for node in nodes {
            let node = node.as_ref();
            for reference in node.references() {
                if seen.contains(&reference.name) {
                    errors.push(ParseError::new(
                        reference.source_span.clone(),
                        format!("Reference \"#{}\" is defined several times", reference.name),
                    ));
                } else {
                    seen.push(reference.name.clone());
                }
            }
            match node {
                TemplateAstRef::Element(element) => collect(&element.children, seen, errors),
                // Embedded templates open a new scope.
                TemplateAstRef::EmbeddedTemplate(template) => {
                    collect(&template.children, &mut Vec::new(), errors)
                }
                _ => {}
            }
        }
    }
    collect(nodes, &mut Vec::new(), errors);
}
