#![allow(dead_code)]

//! Helpers for markup parser tests: flatten a parse tree into rows of
//! `[kind, payload, depth]`, optionally with the covered source.

use angular_compiler::ml_parser::ast::*;
use angular_compiler::ml_parser::parser::ParseTreeResult;
use angular_compiler::parse_util::{ParseError, ParseLocation};

struct Humanizer {
    rows: Vec<Vec<String>>,
    depth: usize,
    with_spans: bool,
}

impl Humanizer {
    fn push(&mut self, mut row: Vec<String>, span: &str) {
        row.push(self.depth.to_string());
        if self.with_spans {
            row.push(span.to_string());
        }
        self.rows.push(row);
    }

    fn nested(&mut self, node: NodeRef<'_>) {
        self.depth += 1;
        for child in node.children() {
            visit_node(self, child);
        }
        self.depth -= 1;
    }
}

impl<'a> Visitor<'a> for Humanizer {
    type Output = ();

    fn visit_element(&mut self, element: &'a Element) -> Option<()> {
        self.push(
            vec!["Element".into(), element.name.clone()],
            element.source_span.text(),
        );
        self.nested(NodeRef::Element(element));
        None
    }

    fn visit_attribute(&mut self, attribute: &'a Attribute) -> Option<()> {
        self.push(
            vec!["Attribute".into(), attribute.name.clone(), attribute.value.clone()],
            attribute.source_span.text(),
        );
        None
    }

    fn visit_text(&mut self, text: &'a Text) -> Option<()> {
        self.push(vec!["Text".into(), text.value.clone()], text.source_span.text());
        None
    }

    fn visit_comment(&mut self, comment: &'a Comment) -> Option<()> {
        self.push(
            vec!["Comment".into(), comment.value.clone().unwrap_or_default()],
            comment.source_span.text(),
        );
        None
    }

    fn visit_expansion(&mut self, expansion: &'a Expansion) -> Option<()> {
        self.push(
            vec![
                "Expansion".into(),
                expansion.switch_value.clone(),
                expansion.expansion_type.clone(),
            ],
            expansion.source_span.text(),
        );
        self.nested(NodeRef::Expansion(expansion));
        None
    }

    fn visit_expansion_case(&mut self, case: &'a ExpansionCase) -> Option<()> {
        self.push(vec!["ExpansionCase".into(), case.value.clone()], case.source_span.text());
        self.nested(NodeRef::ExpansionCase(case));
        None
    }
}

fn humanize(result: &ParseTreeResult, with_spans: bool) -> Result<Vec<Vec<String>>, String> {
    if !result.errors.is_empty() {
        let messages: Vec<String> = result.errors.iter().map(|e| e.to_string()).collect();
        return Err(format!("Unexpected parse errors:\n{}", messages.join("\n")));
    }
    let mut humanizer = Humanizer {
        rows: Vec::new(),
        depth: 0,
        with_spans,
    };
    visit_all(&mut humanizer, &result.root_nodes);
    Ok(humanizer.rows)
}

pub fn humanize_dom(result: &ParseTreeResult) -> Result<Vec<Vec<String>>, String> {
    humanize(result, false)
}

pub fn humanize_dom_source_spans(result: &ParseTreeResult) -> Result<Vec<Vec<String>>, String> {
    humanize(result, true)
}

pub fn humanize_line_column(location: &ParseLocation) -> String {
    format!("{}:{}", location.line, location.col)
}

/// `[covered source, message, line:col]` per error.
pub fn humanize_errors(errors: &[ParseError]) -> Vec<Vec<String>> {
    errors
        .iter()
        .map(|e| {
            vec![
                e.span.text().to_string(),
                e.msg.clone(),
                humanize_line_column(&e.span.start),
            ]
        })
        .collect()
}

pub fn row(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
