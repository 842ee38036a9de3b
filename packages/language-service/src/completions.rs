//! Completions
//!
//! What can be typed at a template position: element names after `<`,
//! attribute names inside a start tag, named entities after `&` and, inside
//! a bound attribute value, the names visible to the expression.

use angular_compiler::directive_matching::{CssSelector, SelectorMatcher};
use angular_compiler::ml_parser::ast::{Element, NodeKind, NodeRef};
use angular_compiler::ml_parser::entities::NAMED_ENTITY_LIST;
use angular_compiler::ml_parser::{get_html_tag_definition, TagContentType};
use angular_compiler::template_parser::create_element_css_selector;
use angular_compiler::CompileDirectiveMetadata;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LanguageServiceConfig;
use crate::expressions::{get_expression_completions, get_template_scope, ExpressionAt, TemplateOrigin};
use crate::html_info::{attribute_names, element_names};
use crate::html_path::{html_ast_path, HtmlAstPath};
use crate::symbols::SymbolQuery;
use crate::template_path::template_ast_path;
use crate::types::{Completion, CompletionKind, TemplateInfo};
use crate::utils::{in_span, span_of, span_of_source};

/// Attributes that declare an embedded template take no part in matching.
static TEMPLATE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+:)?(template$|^\*)").expect("template attribute pattern is valid"));

/// Completions at `position`, relative to the start of the template.
pub fn get_template_completions(
    info: &TemplateInfo<'_>,
    position: usize,
    config: &LanguageServiceConfig,
    query: Option<&dyn SymbolQuery>,
) -> Option<Vec<Completion>> {
    let path = html_ast_path(&info.ast.html_ast, position);
    tracing::trace!(position, depth = path.len(), "completion path");
    let tail = path.tail()?;

    match tail {
        NodeRef::Element(element) => {
            let start_tag = span_of_source(&element.source_span);
            // +1 for the opening angle bracket
            if position <= start_tag.start + element.name.len() + 1 {
                element_completions(info, config)
            } else if position < start_tag.end {
                attribute_completions(info, &path)
            } else {
                None
            }
        }
        NodeRef::Attribute(attribute) => {
            let value = attribute.value_span.as_ref().map(span_of_source);
            match value {
                Some(value) if in_span(position, value) => {
                    member_completions(info, &path, position, query)
                }
                Some(value) if position == value.end && !value.is_empty() => {
                    member_completions(info, &path, position, query)
                        .or_else(|| attribute_completions(info, &path))
                }
                _ => attribute_completions(info, &path),
            }
        }
        NodeRef::Text(_) => {
            let span = span_of(&tail);
            let text = info.template.source.get(span.start..span.end).unwrap_or_default();
            entity_completions(text, position - span.start).or_else(|| {
                match path.first(NodeKind::Element).and_then(|node| node.as_element()) {
                    Some(element) => {
                        let definition = get_html_tag_definition(&element.name);
                        if definition.get_content_type(None) == TagContentType::ParsableData {
                            element_completions(info, config)
                        } else {
                            None
                        }
                    }
                    None => element_completions(info, config),
                }
            })
        }
        NodeRef::Comment(_) | NodeRef::Expansion(_) | NodeRef::ExpansionCase(_) => None,
    }
}

/// Byte ranges of the entity references being typed in `value`.
///
/// Scans for `&[A-Za-z]*;?(?!\d)`, which `regex` cannot express.
/// A candidate is `&`, letters and an optional `;`, and must not be
/// followed by a digit; a candidate that would be gives up trailing
/// characters until it is not.
fn entity_candidates(value: &str) -> Vec<(usize, usize)> {
    let bytes = value.as_bytes();
    let followed_by_digit = |end: usize| bytes.get(end).is_some_and(u8::is_ascii_digit);
    let mut result = Vec::new();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] != b'&' {
            index += 1;
            continue;
        }
        let mut end = index + 1;
        while bytes.get(end).is_some_and(u8::is_ascii_alphabetic) {
            end += 1;
        }
        if bytes.get(end) == Some(&b';') {
            end += 1;
        }
        while end > index && followed_by_digit(end) {
            end -= 1;
        }
        if end > index {
            result.push((index, end));
            index = end;
        } else {
            index += 1;
        }
    }
    result
}

/// Every named entity, when `position` is inside an entity reference.
fn entity_completions(value: &str, position: usize) -> Option<Vec<Completion>> {
    entity_candidates(value)
        .into_iter()
        .any(|(start, end)| position >= start && position < end)
        .then(|| {
            NAMED_ENTITY_LIST
                .iter()
                .map(|(name, _)| {
                    Completion::new(CompletionKind::Entity, format!("&{};", name), *name)
                })
                .collect()
        })
}

fn element_completions(
    info: &TemplateInfo<'_>,
    config: &LanguageServiceConfig,
) -> Option<Vec<Completion>> {
    let html_names = element_names()
        .into_iter()
        .filter(|name| !config.hidden_elements.iter().any(|hidden| hidden == name));

    let directive_elements: Vec<String> = if config.include_directive_elements {
        get_selectors(info)
            .into_iter()
            .filter(|(selector, _)| selector.has_element_selector())
            .filter_map(|(selector, _)| selector.element)
            .collect()
    } else {
        Vec::new()
    };

    Some(
        directive_elements
            .into_iter()
            .chain(html_names)
            .map(|name| Completion::new(CompletionKind::Element, format!("<{}", name), name))
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrInfo {
    name: String,
    input: bool,
    output: bool,
}

impl AttrInfo {
    fn plain(name: &str) -> Self {
        AttrInfo {
            name: name.to_string(),
            input: false,
            output: false,
        }
    }
}

fn attribute_completions(info: &TemplateInfo<'_>, path: &HtmlAstPath<'_>) -> Option<Vec<Completion>> {
    let tail = path.tail()?;
    let item = match tail {
        NodeRef::Element(_) => Some(tail),
        _ => path.parent_of(tail),
    };
    let element = item?.as_element()?;

    let mut attributes: Vec<AttrInfo> = attribute_names(&element.name)
        .iter()
        .map(|name| AttrInfo::plain(name))
        .collect();

    let selectors = get_selectors(info);
    if !selectors.is_empty() {
        // Attributes any selector for this element could select on.
        let mut attrs: Vec<AttrInfo> = selectors
            .iter()
            .filter(|(selector, _)| {
                selector.element.is_none() || selector.element.as_deref() == Some(&element.name)
            })
            .flat_map(|(selector, _)| selector.attr_names())
            .filter(|name| !name.is_empty())
            .map(AttrInfo::plain)
            .collect();

        // Inputs and outputs of the directives matching the element.
        let mut matcher = SelectorMatcher::new();
        for (index, (selector, _)) in selectors.iter().enumerate() {
            matcher.add_selectable(selector.clone(), index);
        }
        matcher.match_selector(&element_css_selector(element), |_, index| {
            let Some((_, directive)) = selectors.get(*index) else {
                return;
            };
            attrs.extend(directive.inputs.keys().map(|name| AttrInfo {
                name: name.clone(),
                input: true,
                output: false,
            }));
            attrs.extend(directive.outputs.keys().map(|name| AttrInfo {
                name: name.clone(),
                input: false,
                output: true,
            }));
        });

        attributes.extend(fold_attrs(attrs).into_iter().flat_map(expanded_attr));
    }

    Some(
        attributes
            .into_iter()
            .map(|attr| Completion::new(CompletionKind::Attribute, name_of_attr(&attr), attr.name))
            .collect(),
    )
}

/// Names in scope of the binding expression under `position`.
fn member_completions<'a>(
    info: &TemplateInfo<'a>,
    html_path: &HtmlAstPath<'a>,
    position: usize,
    query: Option<&dyn SymbolQuery>,
) -> Option<Vec<Completion>> {
    let query = query?;
    let template_path = template_ast_path(&info.ast.template_ast, position);
    let expression = ExpressionAt::find(html_path, &template_path)?;
    let origin = TemplateOrigin {
        file_name: info.file_name,
        offset: info.template.span.start,
    };
    let scope = get_template_scope(
        query,
        &info.template.type_,
        &info.ast.template_ast,
        &template_path,
        origin,
        expression.is_event(),
    );
    let symbols = get_expression_completions(
        &scope,
        &expression.binding.expression().ast,
        position.saturating_sub(expression.span.start),
        query,
    );
    Some(
        symbols
            .iter()
            .filter(|(_, symbol)| symbol.is_public())
            .map(|(name, _)| Completion::new(CompletionKind::Member, name, name))
            .collect(),
    )
}

/// The parsed selectors of every directive in the template's scope.
fn get_selectors<'a>(info: &TemplateInfo<'a>) -> Vec<(CssSelector, &'a CompileDirectiveMetadata)> {
    let mut result = Vec::new();
    for directive in &info.ast.directives {
        let Some(selector) = directive.selector.as_deref() else {
            continue;
        };
        match CssSelector::parse(selector) {
            Ok(selectors) => result.extend(selectors.into_iter().map(|s| (s, directive))),
            Err(error) => tracing::debug!(directive = directive.name(), %error, "skipping selector"),
        }
    }
    result
}

fn element_css_selector(element: &Element) -> CssSelector {
    let attrs: Vec<(String, String)> = element
        .attrs
        .iter()
        .filter(|attr| !TEMPLATE_ATTR.is_match(&attr.name))
        .map(|attr| (attr.name.clone(), attr.value.clone()))
        .collect();
    create_element_css_selector(&element.name, &attrs)
}

/// Merges entries with the same name, keeping the first position.
fn fold_attrs(attrs: Vec<AttrInfo>) -> Vec<AttrInfo> {
    let mut folded: IndexMap<String, AttrInfo> = IndexMap::new();
    for attr in attrs {
        match folded.get_mut(&attr.name) {
            Some(existing) => {
                existing.input |= attr.input;
                existing.output |= attr.output;
            }
            None => {
                folded.insert(attr.name.clone(), attr);
            }
        }
    }
    folded.into_values().collect()
}

/// An attribute that is both input and output also completes as each.
fn expanded_attr(attr: AttrInfo) -> Vec<AttrInfo> {
    if attr.input && attr.output {
        let input = AttrInfo {
            name: attr.name.clone(),
            input: true,
            output: false,
        };
        let output = AttrInfo {
            name: attr.name.clone(),
            input: false,
            output: true,
        };
        vec![attr, input, output]
    } else {
        vec![attr]
    }
}

fn name_of_attr(attr: &AttrInfo) -> String {
    let mut name = attr.name.as_str();
    if attr.output {
        name = name.strip_suffix("Events").unwrap_or(name);
        name = name.strip_suffix("Changed").unwrap_or(name);
    }
    let mut result = name.to_string();
    if attr.input {
        result = format!("[{}]", result);
    }
    if attr.output {
        result = format!("({})", result);
    }
    result
}
