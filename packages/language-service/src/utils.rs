//! Span helpers shared by the path builders and the query code.

use angular_compiler::ml_parser::ast::NodeRef;
use angular_compiler::template_parser::TemplateAstRef;
use angular_compiler::ParseSourceSpan;

use crate::types::Span;

/// A node with a start span, an optional end-tag span and nested content.
pub trait SpanHolder: Sized {
    fn source_span(&self) -> &ParseSourceSpan;

    fn end_source_span(&self) -> Option<&ParseSourceSpan>;

    fn last_child(&self) -> Option<Self>;
}

impl SpanHolder for NodeRef<'_> {
    fn source_span(&self) -> &ParseSourceSpan {
        NodeRef::source_span(self)
    }

    fn end_source_span(&self) -> Option<&ParseSourceSpan> {
        NodeRef::end_source_span(self)
    }

    fn last_child(&self) -> Option<Self> {
        self.content().pop()
    }
}

impl SpanHolder for TemplateAstRef<'_> {
    fn source_span(&self) -> &ParseSourceSpan {
        TemplateAstRef::source_span(self)
    }

    fn end_source_span(&self) -> Option<&ParseSourceSpan> {
        TemplateAstRef::end_source_span(self)
    }

    fn last_child(&self) -> Option<Self> {
        self.content().pop()
    }
}

pub fn span_of_source(span: &ParseSourceSpan) -> Span {
    Span::new(span.start.offset, span.end.offset)
}

/// The extent of a node: up to the end of its end tag when it has one,
/// else up to the end of its last child, else its own span.
pub fn span_of<T: SpanHolder>(node: &T) -> Span {
    let start = node.source_span().start.offset;
    if let Some(end_span) = node.end_source_span() {
        Span::new(start, end_span.end.offset)
    } else if let Some(last) = node.last_child() {
        Span::new(start, span_of(&last).end.max(start))
    } else {
        span_of_source(node.source_span())
    }
}

pub fn in_span(position: usize, span: Span) -> bool {
    position >= span.start && position < span.end
}

pub fn offset_span(span: Span, amount: usize) -> Span {
    Span::new(span.start + amount, span.end + amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use angular_compiler::ml_parser::ast::Node;
    use angular_compiler::ml_parser::html_parser::HtmlParser;

    #[test]
    fn test_in_span_is_half_open() {
        let span = Span::new(3, 6);
        assert!(!in_span(2, span));
        assert!(in_span(3, span));
        assert!(in_span(5, span));
        assert!(!in_span(6, span));
        assert!(!in_span(4, Span::new(4, 4)));
    }

    #[test]
    fn test_offset_span() {
        assert_eq!(offset_span(Span::new(1, 4), 10), Span::new(11, 14));
    }

    #[test]
    fn test_span_of_element_with_end_tag() {
        let result = HtmlParser::new().parse("<div><b>x</b></div>", "test.html");
        let div = result.root_nodes[0].as_ref();
        assert_eq!(span_of_source(div.source_span()), Span::new(0, 5));
        assert_eq!(span_of(&div), Span::new(0, 19));
    }

    #[test]
    fn test_span_of_implicitly_closed_element_uses_last_child() {
        let result = HtmlParser::new().parse("<ul><li>one<li>two</ul>", "test.html");
        let ul = match &result.root_nodes[0] {
            Node::Element(ul) => ul,
            other => panic!("expected an element, got {:?}", other),
        };
        let first_li = ul.children[0].as_ref();
        assert!(first_li.end_source_span().is_none());
        assert_eq!(span_of(&first_li), Span::new(4, 11));
    }

    #[test]
    fn test_span_of_leaf() {
        let result = HtmlParser::new().parse("hello", "test.html");
        assert_eq!(span_of(&result.root_nodes[0].as_ref()), Span::new(0, 5));
    }
}
