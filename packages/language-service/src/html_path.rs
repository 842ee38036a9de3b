//! The path through the markup tree to a template position.

use angular_compiler::ml_parser::ast::{
    visit_all, visit_each_child, ExpansionCase, Node, NodeKind, NodeRef, VisitAction, Visitor,
};

use crate::ast_path::{AstPath, PathNode};
use crate::utils::{in_span, span_of};

impl PathNode for NodeRef<'_> {
    type Kind = NodeKind;

    fn node_kind(&self) -> NodeKind {
        self.kind()
    }
}

pub type HtmlAstPath<'a> = AstPath<NodeRef<'a>>;

/// Every markup node whose extent contains `position`, outermost first.
pub fn html_ast_path(nodes: &[Node], position: usize) -> HtmlAstPath<'_> {
    let mut builder = PathBuilder {
        path: AstPath::new(position),
    };
    visit_all(&mut builder, nodes);
    builder.path
}

struct PathBuilder<'a> {
    path: HtmlAstPath<'a>,
}

impl<'a> Visitor<'a> for PathBuilder<'a> {
    type Output = ();

    fn visit(&mut self, node: NodeRef<'a>) -> VisitAction {
        if in_span(self.path.position, span_of(&node)) {
            self.path.push(node);
            VisitAction::Continue
        } else {
            VisitAction::SkipChildren
        }
    }

    fn visit_expansion_case(&mut self, case: &'a ExpansionCase) -> Option<()> {
        visit_each_child(self, NodeRef::ExpansionCase(case));
        None
    }
}
