//! Locates the symbol named at a template position: the component or
//! directive of an element, the directive member behind a binding, a
//! template reference or variable, or a name read by an expression.

use angular_compiler::ml_parser::ast::{Attribute, NodeKind};
use angular_compiler::template_parser::{
    DirectiveAst, ElementAst, TemplateAstKind, TemplateAstRef,
};

use crate::expressions::{
    get_expression_symbol, get_template_scope, ExpressionAt, SymbolInfo, TemplateOrigin,
};
use crate::html_path::html_ast_path;
use crate::symbols::{SymbolKind, SymbolQuery};
use crate::template_path::{template_ast_path, PathBinding, TemplateAstPath};
use crate::types::{Span, TemplateInfo};
use crate::utils::{in_span, offset_span, span_of_source};

/// The symbol at `position` (relative to the template). The returned span
/// is relative to the file.
pub fn locate_symbol(
    info: &TemplateInfo<'_>,
    position: usize,
    query: &dyn SymbolQuery,
) -> Option<SymbolInfo> {
    let template_path = template_ast_path(&info.ast.template_ast, position);
    if template_path.is_empty() {
        return None;
    }
    let html_path = html_ast_path(&info.ast.html_ast, position);
    tracing::trace!(
        position,
        template_depth = template_path.len(),
        html_depth = html_path.len(),
        "locating symbol"
    );
    let origin = TemplateOrigin {
        file_name: info.file_name,
        offset: info.template.span.start,
    };
    let attribute = html_path
        .first(NodeKind::Attribute)
        .and_then(|node| node.as_attribute());

    let found = element_name_symbol(&template_path, query)
        .or_else(|| {
            let expression = ExpressionAt::find(&html_path, &template_path)?;
            if in_span(position, expression.span) {
                let scope = get_template_scope(
                    query,
                    &info.template.type_,
                    &info.ast.template_ast,
                    &template_path,
                    origin,
                    expression.is_event(),
                );
                let symbol = get_expression_symbol(
                    &scope,
                    &expression.binding.expression().ast,
                    position - expression.span.start,
                    query,
                )?;
                Some(SymbolInfo {
                    symbol: symbol.symbol,
                    span: offset_span(symbol.span, expression.span.start),
                })
            } else {
                binding_member_symbol(expression.binding, &template_path, attribute?, query)
            }
        })
        .or_else(|| declared_name_symbol(info, &template_path, origin, query))
        .or_else(|| selector_attribute_symbol(&template_path, attribute?, query))?;

    Some(SymbolInfo {
        symbol: found.symbol,
        span: offset_span(found.span, info.template.span.start),
    })
}

/// The component of an element, or the directive its name selects, when
/// the position is on the element name.
fn element_name_symbol(path: &TemplateAstPath<'_>, query: &dyn SymbolQuery) -> Option<SymbolInfo> {
    let element = path.first(TemplateAstKind::Element)?.as_element()?;
    let span = element_name_span(element);
    if !in_span(path.position, span) {
        return None;
    }
    let (directive, kind) = match element.directives.iter().find(|d| d.directive.is_component) {
        Some(component) => (component, SymbolKind::Component),
        None => (
            element
                .directives
                .iter()
                .find(|d| selects_element(d, &element.name))?,
            SymbolKind::Directive,
        ),
    };
    let symbol = query.get_type_symbol(&directive.directive.type_.reference)?;
    Some(SymbolInfo {
        symbol: symbol.with_kind(kind),
        span,
    })
}

fn element_name_span(element: &ElementAst) -> Span {
    // +1 for the opening angle bracket
    let start = element.source_span.start.offset + 1;
    Span::new(start, start + element.name.len())
}

fn selects_element(directive: &DirectiveAst, name: &str) -> bool {
    directive
        .directive
        .selector
        .as_deref()
        .and_then(|selector| angular_compiler::directive_matching::CssSelector::parse(selector).ok())
        .is_some_and(|selectors| {
            selectors
                .iter()
                .any(|selector| selector.element.as_deref() == Some(name))
        })
}

fn attribute_name_span(attribute: &Attribute) -> Span {
    let start = attribute.source_span.start.offset;
    Span::new(start, start + attribute.name.len())
}

/// The directive member a binding attribute name refers to: the output
/// behind an event, the input behind a directive property.
fn binding_member_symbol(
    binding: PathBinding<'_>,
    path: &TemplateAstPath<'_>,
    attribute: &Attribute,
    query: &dyn SymbolQuery,
) -> Option<SymbolInfo> {
    let span = attribute_name_span(attribute);
    if !in_span(path.position, span) {
        return None;
    }
    let (directive, field, kind) = match binding {
        PathBinding::Event(event) => {
            let (directive, field) = path.nodes().iter().rev().find_map(|node| {
                node.directives().iter().find_map(|directive| {
                    directive
                        .directive
                        .outputs
                        .iter()
                        .find(|(_, name)| **name == event.name)
                        .map(|(field, _)| (directive, field.as_str()))
                })
            })?;
            (directive, field, SymbolKind::Event)
        }
        PathBinding::DirectiveProperty(directive, property) => {
            (directive, property.directive_name.as_str(), SymbolKind::Property)
        }
        PathBinding::ElementProperty(_) | PathBinding::Text(_) => return None,
    };
    let owner = query.get_type_symbol(&directive.directive.type_.reference)?;
    let member = owner.members().get(field)?.clone();
    Some(SymbolInfo {
        symbol: member.with_kind(kind),
        span,
    })
}

/// A template reference or template variable under the position.
fn declared_name_symbol(
    info: &TemplateInfo<'_>,
    path: &TemplateAstPath<'_>,
    origin: TemplateOrigin<'_>,
    query: &dyn SymbolQuery,
) -> Option<SymbolInfo> {
    if let Some(TemplateAstRef::Reference(reference)) = path.first(TemplateAstKind::Reference) {
        let symbol = query.get_type_symbol(&reference.value)?;
        return Some(SymbolInfo {
            symbol: symbol.with_kind(SymbolKind::Directive),
            span: span_of_source(&reference.source_span),
        });
    }
    if let Some(TemplateAstRef::Variable(variable)) = path.first(TemplateAstKind::Variable) {
        let scope = get_template_scope(
            query,
            &info.template.type_,
            &info.ast.template_ast,
            path,
            origin,
            false,
        );
        let symbol = scope.get(&variable.name)?.clone();
        return Some(SymbolInfo {
            symbol,
            span: span_of_source(&variable.source_span),
        });
    }
    None
}

/// The directive selected by the plain attribute under the position.
fn selector_attribute_symbol(
    path: &TemplateAstPath<'_>,
    attribute: &Attribute,
    query: &dyn SymbolQuery,
) -> Option<SymbolInfo> {
    let span = attribute_name_span(attribute);
    if !in_span(path.position, span) {
        return None;
    }
    let name = attribute
        .name
        .trim_start_matches(['[', '(', '*'])
        .trim_end_matches([']', ')']);
    let directive = path.nodes().iter().rev().find_map(|node| match node {
        TemplateAstRef::Directive(directive) => {
            let selectors = directive
                .directive
                .selector
                .as_deref()
                .and_then(|s| angular_compiler::directive_matching::CssSelector::parse(s).ok())?;
            selectors
                .iter()
                .any(|selector| selector.attr_names().any(|attr| attr == name))
                .then_some(*directive)
        }
        _ => None,
    })?;
    let symbol = query.get_type_symbol(&directive.directive.type_.reference)?;
    Some(SymbolInfo {
        symbol: symbol.with_kind(SymbolKind::Directive),
        span,
    })
}
