//! Template AST
//!
//! The result of resolving a markup tree against directive and pipe
//! metadata. Node spans are the spans of the markup they came from.
//!
//! As with the markup AST, traversal goes through borrowed references
//! ([`TemplateAstRef`]) so nodes stored in typed fields (attributes,
//! bindings, directives) can be visited and compared by identity.

use crate::compile_metadata::{CompileDirectiveMetadata, StaticSymbol};
use crate::expression_parser::ASTWithSource;
use crate::ml_parser::ast::VisitAction;
use crate::parse_util::ParseSourceSpan;

pub const ANGULAR_CORE: &str = "@angular/core";

/// Token of a reference to a plain element.
pub fn element_ref_symbol() -> StaticSymbol {
    StaticSymbol::new(ANGULAR_CORE, "ElementRef")
}

/// Token of a reference to an `<ng-template>`.
pub fn template_ref_symbol() -> StaticSymbol {
    StaticSymbol::new(ANGULAR_CORE, "TemplateRef")
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateAst {
    Text(TextAst),
    BoundText(BoundTextAst),
    Attr(AttrAst),
    BoundElementProperty(BoundElementPropertyAst),
    BoundEvent(BoundEventAst),
    Reference(ReferenceAst),
    Variable(VariableAst),
    Element(ElementAst),
    EmbeddedTemplate(EmbeddedTemplateAst),
    BoundDirectiveProperty(BoundDirectivePropertyAst),
    Directive(DirectiveAst),
    Provider(ProviderAst),
    NgContent(NgContentAst),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAst {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

/// Text containing `{{ }}`; `value` is an interpolation whose spans are
/// relative to the start of the text node.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundTextAst {
    pub value: ASTWithSource,
    pub source_span: ParseSourceSpan,
}

/// A plain attribute, also one that only fed a directive input.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrAst {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyBindingType {
    Property,
    Attribute,
    Class,
    Style,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundElementPropertyAst {
    pub name: String,
    pub binding_type: PropertyBindingType,
    pub value: ASTWithSource,
    pub unit: Option<String>,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundEventAst {
    pub name: String,
    /// `window`, `document` or `body` for `(window:resize)`.
    pub target: Option<String>,
    pub handler: ASTWithSource,
    pub source_span: ParseSourceSpan,
}

impl BoundEventAst {
    pub fn full_name(&self) -> String {
        match &self.target {
            Some(target) => format!("{}:{}", target, self.name),
            None => self.name.clone(),
        }
    }
}

/// `#name` or `ref-name`; `value` is the referenced token.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceAst {
    pub name: String,
    pub value: StaticSymbol,
    pub source_span: ParseSourceSpan,
}

/// A template-local variable: `let-x="y"` or a microsyntax `let`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAst {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementAst {
    pub name: String,
    pub attrs: Vec<AttrAst>,
    pub inputs: Vec<BoundElementPropertyAst>,
    pub outputs: Vec<BoundEventAst>,
    pub references: Vec<ReferenceAst>,
    pub directives: Vec<DirectiveAst>,
    pub providers: Vec<ProviderAst>,
    pub children: Vec<TemplateAst>,
    pub source_span: ParseSourceSpan,
    pub end_source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedTemplateAst {
    pub attrs: Vec<AttrAst>,
    pub outputs: Vec<BoundEventAst>,
    pub references: Vec<ReferenceAst>,
    pub variables: Vec<VariableAst>,
    pub directives: Vec<DirectiveAst>,
    pub providers: Vec<ProviderAst>,
    pub children: Vec<TemplateAst>,
    pub source_span: ParseSourceSpan,
}

/// A directive input fed from a property binding or a literal attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundDirectivePropertyAst {
    pub directive_name: String,
    pub template_name: String,
    pub value: ASTWithSource,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveAst {
    pub directive: CompileDirectiveMetadata,
    pub inputs: Vec<BoundDirectivePropertyAst>,
    pub source_span: ParseSourceSpan,
}

/// The injectable a directive contributes to its element.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderAst {
    pub token: StaticSymbol,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NgContentAst {
    pub index: usize,
    pub source_span: ParseSourceSpan,
}

impl TemplateAst {
    pub fn as_ref(&self) -> TemplateAstRef<'_> {
        match self {
            TemplateAst::Text(n) => TemplateAstRef::Text(n),
            TemplateAst::BoundText(n) => TemplateAstRef::BoundText(n),
            TemplateAst::Attr(n) => TemplateAstRef::Attr(n),
            TemplateAst::BoundElementProperty(n) => TemplateAstRef::BoundElementProperty(n),
            TemplateAst::BoundEvent(n) => TemplateAstRef::BoundEvent(n),
            TemplateAst::Reference(n) => TemplateAstRef::Reference(n),
            TemplateAst::Variable(n) => TemplateAstRef::Variable(n),
            TemplateAst::Element(n) => TemplateAstRef::Element(n),
            TemplateAst::EmbeddedTemplate(n) => TemplateAstRef::EmbeddedTemplate(n),
            TemplateAst::BoundDirectiveProperty(n) => TemplateAstRef::BoundDirectiveProperty(n),
            TemplateAst::Directive(n) => TemplateAstRef::Directive(n),
            TemplateAst::Provider(n) => TemplateAstRef::Provider(n),
            TemplateAst::NgContent(n) => TemplateAstRef::NgContent(n),
        }
    }

    pub fn source_span(&self) -> &ParseSourceSpan {
        self.as_ref().source_span()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateAstKind {
    Text,
    BoundText,
    Attr,
    BoundElementProperty,
    BoundEvent,
    Reference,
    Variable,
    Element,
    EmbeddedTemplate,
    BoundDirectiveProperty,
    Directive,
    Provider,
    NgContent,
}

/// A borrowed template node. Equality is identity.
#[derive(Debug, Clone, Copy)]
pub enum TemplateAstRef<'a> {
    Text(&'a TextAst),
    BoundText(&'a BoundTextAst),
    Attr(&'a AttrAst),
    BoundElementProperty(&'a BoundElementPropertyAst),
    BoundEvent(&'a BoundEventAst),
    Reference(&'a ReferenceAst),
    Variable(&'a VariableAst),
    Element(&'a ElementAst),
    EmbeddedTemplate(&'a EmbeddedTemplateAst),
    BoundDirectiveProperty(&'a BoundDirectivePropertyAst),
    Directive(&'a DirectiveAst),
    Provider(&'a ProviderAst),
    NgContent(&'a NgContentAst),
}

impl<'a> TemplateAstRef<'a> {
    pub fn kind(&self) -> TemplateAstKind {
        match self {
            TemplateAstRef::Text(_) => TemplateAstKind::Text,
            TemplateAstRef::BoundText(_) => TemplateAstKind::BoundText,
            TemplateAstRef::Attr(_) => TemplateAstKind::Attr,
            TemplateAstRef::BoundElementProperty(_) => TemplateAstKind::BoundElementProperty,
            TemplateAstRef::BoundEvent(_) => TemplateAstKind::BoundEvent,
            TemplateAstRef::Reference(_) => TemplateAstKind::Reference,
            TemplateAstRef::Variable(_) => TemplateAstKind::Variable,
            TemplateAstRef::Element(_) => TemplateAstKind::Element,
            TemplateAstRef::EmbeddedTemplate(_) => TemplateAstKind::EmbeddedTemplate,
            TemplateAstRef::BoundDirectiveProperty(_) => TemplateAstKind::BoundDirectiveProperty,
            TemplateAstRef::Directive(_) => TemplateAstKind::Directive,
            TemplateAstRef::Provider(_) => TemplateAstKind::Provider,
            TemplateAstRef::NgContent(_) => TemplateAstKind::NgContent,
        }
    }

    pub fn source_span(&self) -> &'a ParseSourceSpan {
        match self {
            TemplateAstRef::Text(n) => &n.source_span,
            TemplateAstRef::BoundText(n) => &n.source_span,
            TemplateAstRef::Attr(n) => &n.source_span,
            TemplateAstRef::BoundElementProperty(n) => &n.source_span,
            TemplateAstRef::BoundEvent(n) => &n.source_span,
            TemplateAstRef::Reference(n) => &n.source_span,
            TemplateAstRef::Variable(n) => &n.source_span,
            TemplateAstRef::Element(n) => &n.source_span,
            TemplateAstRef::EmbeddedTemplate(n) => &n.source_span,
            TemplateAstRef::BoundDirectiveProperty(n) => &n.source_span,
            TemplateAstRef::Directive(n) => &n.source_span,
            TemplateAstRef::Provider(n) => &n.source_span,
            TemplateAstRef::NgContent(n) => &n.source_span,
        }
    }

    pub fn end_source_span(&self) -> Option<&'a ParseSourceSpan> {
        match self {
            TemplateAstRef::Element(n) => n.end_source_span.as_ref(),
            _ => None,
        }
    }

    /// Nested child nodes (not attributes or bindings).
    pub fn content(&self) -> Vec<TemplateAstRef<'a>> {
        match self {
            TemplateAstRef::Element(e) => e.children.iter().map(TemplateAst::as_ref).collect(),
            TemplateAstRef::EmbeddedTemplate(t) => {
                t.children.iter().map(TemplateAst::as_ref).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Every structural child in declaration order.
    pub fn children(&self) -> Vec<TemplateAstRef<'a>> {
        let mut children = Vec::new();
        match self {
            TemplateAstRef::Element(e) => {
                children.extend(e.attrs.iter().map(TemplateAstRef::Attr));
                children.extend(e.inputs.iter().map(TemplateAstRef::BoundElementProperty));
                children.extend(e.outputs.iter().map(TemplateAstRef::BoundEvent));
                children.extend(e.references.iter().map(TemplateAstRef::Reference));
                children.extend(e.directives.iter().map(TemplateAstRef::Directive));
                children.extend(e.providers.iter().map(TemplateAstRef::Provider));
                children.extend(e.children.iter().map(TemplateAst::as_ref));
            }
            TemplateAstRef::EmbeddedTemplate(t) => {
                children.extend(t.attrs.iter().map(TemplateAstRef::Attr));
                children.extend(t.outputs.iter().map(TemplateAstRef::BoundEvent));
                children.extend(t.references.iter().map(TemplateAstRef::Reference));
                children.extend(t.variables.iter().map(TemplateAstRef::Variable));
                children.extend(t.directives.iter().map(TemplateAstRef::Directive));
                children.extend(t.providers.iter().map(TemplateAstRef::Provider));
                children.extend(t.children.iter().map(TemplateAst::as_ref));
            }
            TemplateAstRef::Directive(d) => {
                children.extend(d.inputs.iter().map(TemplateAstRef::BoundDirectiveProperty));
            }
            _ => {}
        }
        children
    }

    pub fn as_element(&self) -> Option<&'a ElementAst> {
        match self {
            TemplateAstRef::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_embedded_template(&self) -> Option<&'a EmbeddedTemplateAst> {
        match self {
            TemplateAstRef::EmbeddedTemplate(t) => Some(t),
            _ => None,
        }
    }

    /// Directives attached to an element or embedded template.
    pub fn directives(&self) -> &'a [DirectiveAst] {
        match self {
            TemplateAstRef::Element(e) => &e.directives,
            TemplateAstRef::EmbeddedTemplate(t) => &t.directives,
            _ => &[],
        }
    }

    pub fn references(&self) -> &'a [ReferenceAst] {
        match self {
            TemplateAstRef::Element(e) => &e.references,
            TemplateAstRef::EmbeddedTemplate(t) => &t.references,
            _ => &[],
        }
    }

    fn addr(&self) -> *const () {
        match self {
            TemplateAstRef::Text(n) => *n as *const TextAst as *const (),
            TemplateAstRef::BoundText(n) => *n as *const BoundTextAst as *const (),
            TemplateAstRef::Attr(n) => *n as *const AttrAst as *const (),
            TemplateAstRef::BoundElementProperty(n) => {
                *n as *const BoundElementPropertyAst as *const ()
            }
            TemplateAstRef::BoundEvent(n) => *n as *const BoundEventAst as *const (),
            TemplateAstRef::Reference(n) => *n as *const ReferenceAst as *const (),
            TemplateAstRef::Variable(n) => *n as *const VariableAst as *const (),
            TemplateAstRef::Element(n) => *n as *const ElementAst as *const (),
            TemplateAstRef::EmbeddedTemplate(n) => *n as *const EmbeddedTemplateAst as *const (),
            TemplateAstRef::BoundDirectiveProperty(n) => {
                *n as *const BoundDirectivePropertyAst as *const ()
            }
            TemplateAstRef::Directive(n) => *n as *const DirectiveAst as *const (),
            TemplateAstRef::Provider(n) => *n as *const ProviderAst as *const (),
            TemplateAstRef::NgContent(n) => *n as *const NgContentAst as *const (),
        }
    }
}

impl PartialEq for TemplateAstRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for TemplateAstRef<'_> {}

/// Visitor over template nodes. The pre-visit hook can prune a subtree;
/// the defaults recurse through [`TemplateAstRef::children`] for the
/// container variants and do nothing for leaves.
pub trait TemplateAstVisitor<'a> {
    type Output;

    fn visit(&mut self, _node: TemplateAstRef<'a>) -> VisitAction {
        VisitAction::Continue
    }

    fn visit_ng_content(&mut self, _ast: &'a NgContentAst) -> Option<Self::Output> {
        None
    }

    fn visit_embedded_template(&mut self, ast: &'a EmbeddedTemplateAst) -> Option<Self::Output> {
        template_visit_each_child(self, TemplateAstRef::EmbeddedTemplate(ast));
        None
    }

    fn visit_element(&mut self, ast: &'a ElementAst) -> Option<Self::Output> {
        template_visit_each_child(self, TemplateAstRef::Element(ast));
        None
    }

    fn visit_reference(&mut self, _ast: &'a ReferenceAst) -> Option<Self::Output> {
        None
    }

    fn visit_variable(&mut self, _ast: &'a VariableAst) -> Option<Self::Output> {
        None
    }

    fn visit_event(&mut self, _ast: &'a BoundEventAst) -> Option<Self::Output> {
        None
    }

    fn visit_element_property(&mut self, _ast: &'a BoundElementPropertyAst) -> Option<Self::Output> {
        None
    }

    fn visit_attr(&mut self, _ast: &'a AttrAst) -> Option<Self::Output> {
        None
    }

    fn visit_bound_text(&mut self, _ast: &'a BoundTextAst) -> Option<Self::Output> {
        None
    }

    fn visit_text(&mut self, _ast: &'a TextAst) -> Option<Self::Output> {
        None
    }

    fn visit_directive(&mut self, ast: &'a DirectiveAst) -> Option<Self::Output> {
        template_visit_each_child(self, TemplateAstRef::Directive(ast));
        None
    }

    fn visit_directive_property(
        &mut self,
        _ast: &'a BoundDirectivePropertyAst,
    ) -> Option<Self::Output> {
        None
    }

    fn visit_provider(&mut self, _ast: &'a ProviderAst) -> Option<Self::Output> {
        None
    }
}

pub fn template_visit_node<'a, V>(visitor: &mut V, node: TemplateAstRef<'a>) -> Option<V::Output>
where
    V: TemplateAstVisitor<'a> + ?Sized,
{
    if visitor.visit(node) == VisitAction::SkipChildren {
        return None;
    }
    match node {
        TemplateAstRef::Text(n) => visitor.visit_text(n),
        TemplateAstRef::BoundText(n) => visitor.visit_bound_text(n),
        TemplateAstRef::Attr(n) => visitor.visit_attr(n),
        TemplateAstRef::BoundElementProperty(n) => visitor.visit_element_property(n),
        TemplateAstRef::BoundEvent(n) => visitor.visit_event(n),
        TemplateAstRef::Reference(n) => visitor.visit_reference(n),
        TemplateAstRef::Variable(n) => visitor.visit_variable(n),
        TemplateAstRef::Element(n) => visitor.visit_element(n),
        TemplateAstRef::EmbeddedTemplate(n) => visitor.visit_embedded_template(n),
        TemplateAstRef::BoundDirectiveProperty(n) => visitor.visit_directive_property(n),
        TemplateAstRef::Directive(n) => visitor.visit_directive(n),
        TemplateAstRef::Provider(n) => visitor.visit_provider(n),
        TemplateAstRef::NgContent(n) => visitor.visit_ng_content(n),
    }
}

pub fn template_visit_all<'a, V>(visitor: &mut V, nodes: &'a [TemplateAst]) -> Vec<V::Output>
where
    V: TemplateAstVisitor<'a> + ?Sized,
{
    nodes
        .iter()
        .filter_map(|node| template_visit_node(visitor, node.as_ref()))
        .collect()
}

pub fn template_visit_each_child<'a, V>(visitor: &mut V, node: TemplateAstRef<'a>) -> Vec<V::Output>
where
    V: TemplateAstVisitor<'a> + ?Sized,
{
    node.children()
        .into_iter()
        .filter_map(|child| template_visit_node(visitor, child))
        .collect()
}
