//! The path through the template AST to a template position.

use angular_compiler::expression_parser::ASTWithSource;
use angular_compiler::ml_parser::ast::VisitAction;
use angular_compiler::template_parser::{
    template_visit_all, BoundDirectivePropertyAst, BoundElementPropertyAst, BoundEventAst,
    BoundTextAst, DirectiveAst, TemplateAst, TemplateAstKind, TemplateAstRef, TemplateAstVisitor,
};
use angular_compiler::ParseSourceSpan;

use crate::ast_path::{AstPath, PathNode};
use crate::utils::{in_span, span_of, span_of_source};

impl PathNode for TemplateAstRef<'_> {
    type Kind = TemplateAstKind;

    fn node_kind(&self) -> TemplateAstKind {
        self.kind()
    }
}

pub type TemplateAstPath<'a> = AstPath<TemplateAstRef<'a>>;

/// Every template node whose extent contains `position`, outermost first.
///
/// Providers never appear on the path. A directive appears when its host
/// element does, but the nodes it owns are not searched.
pub fn template_ast_path(nodes: &[TemplateAst], position: usize) -> TemplateAstPath<'_> {
    let mut builder = PathBuilder {
        path: AstPath::new(position),
    };
    template_visit_all(&mut builder, nodes);
    builder.path
}

struct PathBuilder<'a> {
    path: TemplateAstPath<'a>,
}

impl<'a> TemplateAstVisitor<'a> for PathBuilder<'a> {
    type Output = ();

    fn visit(&mut self, node: TemplateAstRef<'a>) -> VisitAction {
        if !in_span(self.path.position, span_of(&node)) {
            return VisitAction::SkipChildren;
        }
        match node {
            TemplateAstRef::Provider(_) => VisitAction::SkipChildren,
            TemplateAstRef::Directive(_) => {
                self.path.push(node);
                VisitAction::SkipChildren
            }
            _ => {
                self.path.push(node);
                VisitAction::Continue
            }
        }
    }
}

/// A bound expression under a template position.
#[derive(Debug, Clone, Copy)]
pub enum PathBinding<'a> {
    Text(&'a BoundTextAst),
    Event(&'a BoundEventAst),
    ElementProperty(&'a BoundElementPropertyAst),
    DirectiveProperty(&'a DirectiveAst, &'a BoundDirectivePropertyAst),
}

impl<'a> PathBinding<'a> {
    pub fn expression(&self) -> &'a ASTWithSource {
        match self {
            PathBinding::Text(text) => &text.value,
            PathBinding::Event(event) => &event.handler,
            PathBinding::ElementProperty(property) => &property.value,
            PathBinding::DirectiveProperty(_, property) => &property.value,
        }
    }

    pub fn source_span(&self) -> &'a ParseSourceSpan {
        match self {
            PathBinding::Text(text) => &text.source_span,
            PathBinding::Event(event) => &event.source_span,
            PathBinding::ElementProperty(property) => &property.source_span,
            PathBinding::DirectiveProperty(_, property) => &property.source_span,
        }
    }
}

/// The binding whose attribute (or text) holds the path position.
///
/// Directive inputs are not on the path, and a `*` attribute belongs to
/// the enclosing embedded template rather than to the element at the
/// tail, so the search walks from the tail outwards.
pub fn binding_at<'a>(path: &TemplateAstPath<'a>) -> Option<PathBinding<'a>> {
    let position = path.position;
    let contains = |span: &ParseSourceSpan| in_span(position, span_of_source(span));
    let directive_input = |directives: &'a [DirectiveAst]| {
        directives.iter().find_map(|directive| {
            directive
                .inputs
                .iter()
                .find(|input| contains(&input.source_span))
                .map(|input| PathBinding::DirectiveProperty(directive, input))
        })
    };

    for node in path.nodes().iter().rev() {
        let found = match *node {
            TemplateAstRef::BoundText(text) => Some(PathBinding::Text(text)),
            TemplateAstRef::BoundEvent(event) => Some(PathBinding::Event(event)),
            TemplateAstRef::BoundElementProperty(property) => {
                Some(PathBinding::ElementProperty(property))
            }
            TemplateAstRef::Directive(directive) => {
                directive_input(std::slice::from_ref(directive))
            }
            TemplateAstRef::Element(element) => element
                .inputs
                .iter()
                .find(|input| contains(&input.source_span))
                .map(PathBinding::ElementProperty)
                .or_else(|| {
                    element
                        .outputs
                        .iter()
                        .find(|output| contains(&output.source_span))
                        .map(PathBinding::Event)
                })
                .or_else(|| directive_input(&element.directives)),
            TemplateAstRef::EmbeddedTemplate(template) => template
                .outputs
                .iter()
                .find(|output| contains(&output.source_span))
                .map(PathBinding::Event)
                .or_else(|| directive_input(&template.directives)),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}
