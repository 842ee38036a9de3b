//! Markup AST
//!
//! Nodes produced by the HTML parser. Every node carries the span of the
//! source it was parsed from. Elements keep their start tag span as
//! `source_span`; the end tag span is only present when an explicit end tag
//! (or `/>`) closed the element.
//!
//! Traversal goes through [`Visitor`]. The [`Visitor::visit`] hook runs
//! before the per-variant method and can prune a subtree by returning
//! [`VisitAction::SkipChildren`]. The default per-variant methods only
//! recurse into structural children, so a visitor overrides just the
//! variants it cares about.

use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(Text),
    Element(Element),
    Attribute(Attribute),
    Comment(Comment),
    Expansion(Expansion),
    ExpansionCase(ExpansionCase),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
    /// Span of the value without its quotes.
    pub value_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub source_span: ParseSourceSpan,
    pub start_source_span: ParseSourceSpan,
    pub end_source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub value: Option<String>,
    pub source_span: ParseSourceSpan,
}

/// ICU message: `{count, plural, =0 {none} other {many}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub switch_value: String,
    pub expansion_type: String,
    pub cases: Vec<ExpansionCase>,
    pub source_span: ParseSourceSpan,
    pub switch_value_source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionCase {
    pub value: String,
    pub expression: Vec<Node>,
    pub source_span: ParseSourceSpan,
    pub value_source_span: ParseSourceSpan,
    pub exp_source_span: ParseSourceSpan,
}

impl Element {
    /// The attribute with the given name, if present.
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|attr| attr.name == name)
    }
}

impl Node {
    pub fn as_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Text(n) => NodeRef::Text(n),
            Node::Element(n) => NodeRef::Element(n),
            Node::Attribute(n) => NodeRef::Attribute(n),
            Node::Comment(n) => NodeRef::Comment(n),
            Node::Expansion(n) => NodeRef::Expansion(n),
            Node::ExpansionCase(n) => NodeRef::ExpansionCase(n),
        }
    }

    pub fn source_span(&self) -> &ParseSourceSpan {
        self.as_ref().source_span()
    }
}

/// The discriminant of a markup node, used to search paths by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Element,
    Attribute,
    Comment,
    Expansion,
    ExpansionCase,
}

/// A borrowed markup node.
///
/// Attributes and expansion cases live outside the [`Node`] list of their
/// parents, so traversal and paths work on references. Two references are
/// equal when they point at the same node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Text(&'a Text),
    Element(&'a Element),
    Attribute(&'a Attribute),
    Comment(&'a Comment),
    Expansion(&'a Expansion),
    ExpansionCase(&'a ExpansionCase),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Text(_) => NodeKind::Text,
            NodeRef::Element(_) => NodeKind::Element,
            NodeRef::Attribute(_) => NodeKind::Attribute,
            NodeRef::Comment(_) => NodeKind::Comment,
            NodeRef::Expansion(_) => NodeKind::Expansion,
            NodeRef::ExpansionCase(_) => NodeKind::ExpansionCase,
        }
    }

    pub fn source_span(&self) -> &'a ParseSourceSpan {
        match self {
            NodeRef::Text(n) => &n.source_span,
            NodeRef::Element(n) => &n.source_span,
            NodeRef::Attribute(n) => &n.source_span,
            NodeRef::Comment(n) => &n.source_span,
            NodeRef::Expansion(n) => &n.source_span,
            NodeRef::ExpansionCase(n) => &n.source_span,
        }
    }

    pub fn end_source_span(&self) -> Option<&'a ParseSourceSpan> {
        match self {
            NodeRef::Element(n) => n.end_source_span.as_ref(),
            _ => None,
        }
    }

    /// Structural children in source order: attributes then child nodes for
    /// elements, cases for expansions, the case body for expansion cases.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match self {
            NodeRef::Element(e) => e
                .attrs
                .iter()
                .map(NodeRef::Attribute)
                .chain(e.children.iter().map(Node::as_ref))
                .collect(),
            NodeRef::Expansion(e) => e.cases.iter().map(NodeRef::ExpansionCase).collect(),
            NodeRef::ExpansionCase(c) => c.expression.iter().map(Node::as_ref).collect(),
            _ => Vec::new(),
        }
    }

    /// The nested nodes (not attributes) used to extend a node's extent.
    pub fn content(&self) -> Vec<NodeRef<'a>> {
        match self {
            NodeRef::Element(e) => e.children.iter().map(Node::as_ref).collect(),
            NodeRef::Expansion(e) => e.cases.iter().map(NodeRef::ExpansionCase).collect(),
            NodeRef::ExpansionCase(c) => c.expression.iter().map(Node::as_ref).collect(),
            _ => Vec::new(),
        }
    }

    pub fn as_element(&self) -> Option<&'a Element> {
        match self {
            NodeRef::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&'a Attribute> {
        match self {
            NodeRef::Attribute(a) => Some(a),
            _ => None,
        }
    }

    fn addr(&self) -> *const () {
        match self {
            NodeRef::Text(n) => *n as *const Text as *const (),
            NodeRef::Element(n) => *n as *const Element as *const (),
            NodeRef::Attribute(n) => *n as *const Attribute as *const (),
            NodeRef::Comment(n) => *n as *const Comment as *const (),
            NodeRef::Expansion(n) => *n as *const Expansion as *const (),
            NodeRef::ExpansionCase(n) => *n as *const ExpansionCase as *const (),
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for NodeRef<'_> {}

/// Returned by [`Visitor::visit`] before a node's own method runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    Continue,
    /// Skip the node's method and therefore its whole subtree.
    SkipChildren,
}

pub trait Visitor<'a> {
    type Output;

    fn visit(&mut self, _node: NodeRef<'a>) -> VisitAction {
        VisitAction::Continue
    }

    fn visit_element(&mut self, element: &'a Element) -> Option<Self::Output> {
        visit_each_child(self, NodeRef::Element(element));
        None
    }

    fn visit_attribute(&mut self, _attribute: &'a Attribute) -> Option<Self::Output> {
        None
    }

    fn visit_text(&mut self, _text: &'a Text) -> Option<Self::Output> {
        None
    }

    fn visit_comment(&mut self, _comment: &'a Comment) -> Option<Self::Output> {
        None
    }

    fn visit_expansion(&mut self, expansion: &'a Expansion) -> Option<Self::Output> {
        visit_each_child(self, NodeRef::Expansion(expansion));
        None
    }

    fn visit_expansion_case(&mut self, _case: &'a ExpansionCase) -> Option<Self::Output> {
        None
    }
}

/// Dispatches one node: runs the pre-visit hook, then the variant method.
pub fn visit_node<'a, V>(visitor: &mut V, node: NodeRef<'a>) -> Option<V::Output>
where
    V: Visitor<'a> + ?Sized,
{
    if visitor.visit(node) == VisitAction::SkipChildren {
        return None;
    }
    match node {
        NodeRef::Text(n) => visitor.visit_text(n),
        NodeRef::Element(n) => visitor.visit_element(n),
        NodeRef::Attribute(n) => visitor.visit_attribute(n),
        NodeRef::Comment(n) => visitor.visit_comment(n),
        NodeRef::Expansion(n) => visitor.visit_expansion(n),
        NodeRef::ExpansionCase(n) => visitor.visit_expansion_case(n),
    }
}

/// Visits a sibling list, keeping the results that were produced.
pub fn visit_all<'a, V>(visitor: &mut V, nodes: &'a [Node]) -> Vec<V::Output>
where
    V: Visitor<'a> + ?Sized,
{
    nodes
        .iter()
        .filter_map(|node| visit_node(visitor, node.as_ref()))
        .collect()
}

/// Visits the structural children of `node` with `visitor`.
pub fn visit_each_child<'a, V>(visitor: &mut V, node: NodeRef<'a>) -> Vec<V::Output>
where
    V: Visitor<'a> + ?Sized,
{
    node.children()
        .into_iter()
        .filter_map(|child| visit_node(visitor, child))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml_parser::html_parser::HtmlParser;

    struct NameCollector(Vec<String>);

    impl<'a> Visitor<'a> for NameCollector {
        type Output = ();

        fn visit_element(&mut self, element: &'a Element) -> Option<()> {
            self.0.push(element.name.clone());
            visit_each_child(self, NodeRef::Element(element));
            None
        }

        fn visit_attribute(&mut self, attribute: &'a Attribute) -> Option<()> {
            self.0.push(format!("@{}", attribute.name));
            None
        }
    }

    struct SkipSpans;

    impl<'a> Visitor<'a> for SkipSpans {
        type Output = String;

        fn visit(&mut self, node: NodeRef<'a>) -> VisitAction {
            match node {
                NodeRef::Element(e) if e.name == "span" => VisitAction::SkipChildren,
                _ => VisitAction::Continue,
            }
        }

        fn visit_text(&mut self, text: &'a Text) -> Option<String> {
            Some(text.value.clone())
        }
    }

    #[test]
    fn test_visit_all_recurses_through_structure() {
        let result = HtmlParser::new().parse("<div a=\"1\"><p b>x</p></div><hr>", "");
        let mut collector = NameCollector(Vec::new());
        visit_all(&mut collector, &result.root_nodes);
        assert_eq!(collector.0, vec!["div", "@a", "p", "@b", "hr"]);
    }

    #[test]
    fn test_visit_all_drops_absent_results() {
        let result = HtmlParser::new().parse("a<!--c-->b", "");
        let texts = visit_all(&mut SkipSpans, &result.root_nodes);
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_skip_children_prunes_subtree() {
        let result = HtmlParser::new().parse("<div>a<span>b</span>c</div>", "");
        let texts = visit_all(&mut SkipSpans, &result.root_nodes);
        // The element default returns no result, so collect through a child walk.
        assert!(texts.is_empty());
        let root = result.root_nodes[0].as_ref();
        let inner = visit_each_child(&mut SkipSpans, root);
        assert_eq!(inner, vec!["a", "c"]);
    }

    #[test]
    fn test_node_ref_identity() {
        let result = HtmlParser::new().parse("<b></b><b></b>", "");
        let first = result.root_nodes[0].as_ref();
        let second = result.root_nodes[1].as_ref();
        assert_eq!(first, result.root_nodes[0].as_ref());
        assert_ne!(first, second);
        assert_eq!(first.kind(), NodeKind::Element);
    }
}
