//! Markup tree builder
//!
//! Folds the lexer's token stream into a [`Node`] tree. Open elements live
//! on a stack and are attached to their parent when they close, either by
//! their end tag, by a child that implicitly closes them (`<p>` followed by
//! `<div>`), or by an ancestor's end tag.

use super::ast::{Attribute, Comment, Element, Expansion, ExpansionCase, Node, Text};
use super::html_tags::HtmlTagDefinition;
use super::lexer::{tokenize, TokenizeOptions};
use super::tags::split_ns_name;
use super::tokens::{Token, TokenType};
use crate::parse_util::{ParseError, ParseLocation, ParseSourceFile, ParseSourceSpan};

pub type TagDefinitionResolver = fn(&str) -> &'static HtmlTagDefinition;

#[derive(Debug, Clone)]
pub struct ParseTreeResult {
    pub root_nodes: Vec<Node>,
    pub errors: Vec<ParseError>,
}

impl ParseTreeResult {
    pub fn new(root_nodes: Vec<Node>, errors: Vec<ParseError>) -> Self {
        ParseTreeResult { root_nodes, errors }
    }
}

pub struct Parser {
    get_tag_definition: TagDefinitionResolver,
}

impl Parser {
    pub fn new(get_tag_definition: TagDefinitionResolver) -> Self {
        Parser { get_tag_definition }
    }

    pub fn parse(&self, source: &str, url: &str, options: TokenizeOptions) -> ParseTreeResult {
        let file = ParseSourceFile::new(source, url);
        let tokenized = tokenize(file, options);

        let mut builder = TreeBuilder::new(tokenized.tokens, self.get_tag_definition);
        builder.build();

        let mut errors = tokenized.errors;
        errors.extend(builder.errors);
        ParseTreeResult::new(builder.root_nodes, errors)
    }
}

struct TreeBuilder {
    tokens: Vec<Token>,
    index: usize,
    get_tag_definition: TagDefinitionResolver,
    element_stack: Vec<Element>,
    root_nodes: Vec<Node>,
    errors: Vec<ParseError>,
}

impl TreeBuilder {
    fn new(tokens: Vec<Token>, get_tag_definition: TagDefinitionResolver) -> Self {
        TreeBuilder {
            tokens,
            index: 0,
            get_tag_definition,
            element_stack: Vec::new(),
            root_nodes: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn build(&mut self) {
        while self.peek_type() != TokenType::Eof {
            match self.peek_type() {
                TokenType::TagOpenStart => self.consume_start_tag(),
                TokenType::TagClose => self.consume_end_tag(),
                TokenType::CommentStart => self.consume_comment(),
                TokenType::Text => self.consume_text(),
                TokenType::ExpansionFormStart => self.consume_expansion(),
                _ => {
                    self.advance();
                }
            }
        }

        // Elements still open at EOF are closed implicitly.
        while !self.element_stack.is_empty() {
            self.pop_to(self.element_stack.len() - 1);
        }
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.index.min(last)]
    }

    fn peek_type(&self) -> TokenType {
        if self.tokens.is_empty() {
            TokenType::Eof
        } else {
            self.peek().token_type
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        token
    }

    fn advance_if(&mut self, token_type: TokenType) -> Option<Token> {
        if self.peek_type() == token_type {
            Some(self.advance())
        } else {
            None
        }
    }

    fn tag_definition(&self, name: &str) -> &'static HtmlTagDefinition {
        (self.get_tag_definition)(name)
    }

    fn add_error(&mut self, msg: String, span: ParseSourceSpan) {
        self.errors.push(ParseError::new(span, msg));
    }

    fn add_to_parent(&mut self, node: Node) {
        match self.element_stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root_nodes.push(node),
        }
    }

    /// Closes the element at `index` and everything opened after it.
    fn pop_to(&mut self, index: usize) {
        while self.element_stack.len() > index {
            if let Some(element) = self.element_stack.pop() {
                self.add_to_parent(Node::Element(element));
            }
        }
    }

    fn consume_text(&mut self) {
        let token = self.advance();
        let mut text = token.value().to_string();

        if text.starts_with('\n') {
            if let Some(parent) = self.element_stack.last() {
                if parent.children.is_empty() && self.tag_definition(&parent.name).ignore_first_lf {
                    text.remove(0);
                }
            }
        }

        if !text.is_empty() {
            self.add_to_parent(Node::Text(Text {
                value: text,
                source_span: token.source_span,
            }));
        }
    }

    fn consume_comment(&mut self) {
        let start = self.advance();
        let text = self.advance_if(TokenType::RawText);
        let end = self.advance_if(TokenType::CommentEnd);

        let end_loc = end
            .as_ref()
            .or(text.as_ref())
            .map(|t| t.source_span.end.clone())
            .unwrap_or_else(|| start.source_span.end.clone());
        let value = text.map(|t| t.value().trim().to_string());

        self.add_to_parent(Node::Comment(Comment {
            value,
            source_span: ParseSourceSpan::new(start.source_span.start.clone(), end_loc),
        }));
    }

    fn consume_attr(&mut self) -> Attribute {
        let name_token = self.advance();
        let mut end = name_token.source_span.end.clone();
        let mut value = String::new();
        let mut value_span = None;

        if let Some(quote) = self.advance_if(TokenType::AttrQuote) {
            end = quote.source_span.end.clone();
        }
        if let Some(value_token) = self.advance_if(TokenType::AttrValue) {
            value = value_token.value().to_string();
            end = value_token.source_span.end.clone();
            value_span = Some(value_token.source_span);
        }
        if let Some(quote) = self.advance_if(TokenType::AttrQuote) {
            end = quote.source_span.end.clone();
        }

        Attribute {
            name: name_token.value().to_string(),
            value,
            source_span: ParseSourceSpan::new(name_token.source_span.start, end),
            value_span,
        }
    }

    fn consume_start_tag(&mut self) {
        let start = self.advance();
        let name = start.value().to_string();

        let mut attrs = Vec::new();
        while self.peek_type() == TokenType::AttrName {
            attrs.push(self.consume_attr());
        }
        let last_end = attrs
            .last()
            .map(|attr: &Attribute| attr.source_span.end.clone())
            .unwrap_or_else(|| start.source_span.end.clone());

        let tag_def = self.tag_definition(&name);
        let mut self_closing = false;
        let end_loc: ParseLocation = match self.peek_type() {
            TokenType::TagOpenEndVoid => {
                let end = self.advance();
                self_closing = true;
                let foreign = matches!(split_ns_name(&name, false), Ok((Some(_), _)));
                if !(tag_def.can_self_close || tag_def.is_void || foreign) {
                    self.add_error(
                        format!(
                            "Only void, custom and foreign elements can be self closed \"{}\"",
                            name
                        ),
                        start.source_span.clone(),
                    );
                }
                end.source_span.end
            }
            TokenType::TagOpenEnd => self.advance().source_span.end,
            TokenType::IncompleteTagOpen => {
                self.advance();
                self.add_error(
                    format!("Opening tag \"{}\" not terminated.", name),
                    start.source_span.clone(),
                );
                last_end
            }
            _ => last_end,
        };

        let span = ParseSourceSpan::new(start.source_span.start.clone(), end_loc);
        let element = Element {
            name: name.clone(),
            attrs,
            children: Vec::new(),
            source_span: span.clone(),
            start_source_span: span.clone(),
            end_source_span: if self_closing { Some(span) } else { None },
        };
        self.push_element(element, self_closing || tag_def.is_void);
    }

    fn push_element(&mut self, element: Element, closed: bool) {
        let parent_closed = self
            .element_stack
            .last()
            .map(|parent| self.tag_definition(&parent.name).is_closed_by_child(&element.name))
            .unwrap_or(false);
        if parent_closed {
            self.pop_to(self.element_stack.len() - 1);
        }

        if closed {
            self.add_to_parent(Node::Element(element));
        } else {
            self.element_stack.push(element);
        }
    }

    fn consume_end_tag(&mut self) {
        let token = self.advance();
        let name = token.value().to_string();

        if self.tag_definition(&name).is_void {
            self.add_error(
                format!("Void elements do not have end tags \"{}\"", name),
                token.source_span,
            );
            return;
        }

        let mut matched = None;
        for index in (0..self.element_stack.len()).rev() {
            let open = &self.element_stack[index];
            if open.name == name {
                matched = Some(index);
                break;
            }
            if !self.tag_definition(&open.name).closed_by_parent {
                break;
            }
        }

        match matched {
            Some(index) => {
                self.element_stack[index].end_source_span = Some(token.source_span);
                self.pop_to(index);
            }
            None => self.add_error(
                format!(
                    "Unexpected closing tag \"{}\". It may happen when the tag has already been closed by another tag. For more info see https://www.w3.org/TR/html5/syntax.html#closing-elements-that-have-implied-end-tags",
                    name
                ),
                token.source_span,
            ),
        }
    }

    fn consume_expansion(&mut self) {
        let start = self.advance();
        let switch_value = self.advance_if(TokenType::ExpansionFormPart);
        let expansion_type = self.advance_if(TokenType::ExpansionFormPart);
        let (switch_value, expansion_type) = match (switch_value, expansion_type) {
            (Some(switch_value), Some(expansion_type)) => (switch_value, expansion_type),
            _ => {
                self.add_error("Invalid ICU message. Missing '}'.".to_string(), start.source_span);
                return;
            }
        };

        let mut cases = Vec::new();
        while self.peek_type() == TokenType::ExpansionCaseValue {
            match self.consume_expansion_case() {
                Some(case) => cases.push(case),
                None => return,
            }
        }

        let end = match self.advance_if(TokenType::ExpansionFormEnd) {
            Some(end) => end,
            None => {
                self.add_error("Invalid ICU message. Missing '}'.".to_string(), start.source_span);
                return;
            }
        };

        self.add_to_parent(Node::Expansion(Expansion {
            switch_value: switch_value.value().to_string(),
            expansion_type: expansion_type.value().to_string(),
            cases,
            source_span: ParseSourceSpan::new(start.source_span.start, end.source_span.end),
            switch_value_source_span: switch_value.source_span,
        }));
    }

    fn consume_expansion_case(&mut self) -> Option<ExpansionCase> {
        let value = self.advance();

        let exp_start = match self.advance_if(TokenType::ExpansionCaseExpStart) {
            Some(token) => token,
            None => {
                self.add_error("Invalid ICU message. Missing '{'.".to_string(), value.source_span);
                return None;
            }
        };

        let mut expression_tokens = self.collect_expansion_exp_tokens(&exp_start)?;
        let exp_end = self.advance();
        expression_tokens.push(Token::new(TokenType::Eof, vec![], exp_end.source_span.clone()));

        let mut nested = TreeBuilder::new(expression_tokens, self.get_tag_definition);
        nested.build();
        self.errors.append(&mut nested.errors);

        Some(ExpansionCase {
            value: value.value().to_string(),
            expression: nested.root_nodes,
            source_span: ParseSourceSpan::new(
                value.source_span.start.clone(),
                exp_end.source_span.end.clone(),
            ),
            value_source_span: value.source_span,
            exp_source_span: ParseSourceSpan::new(exp_start.source_span.start, exp_end.source_span.end),
        })
    }

    /// Collects the tokens of one case body, leaving the closing
    /// `ExpansionCaseExpEnd` as the next token.
    fn collect_expansion_exp_tokens(&mut self, start: &Token) -> Option<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut stack = vec![TokenType::ExpansionCaseExpStart];

        loop {
            match self.peek_type() {
                TokenType::ExpansionFormStart | TokenType::ExpansionCaseExpStart => {
                    stack.push(self.peek_type());
                }
                TokenType::ExpansionCaseExpEnd => {
                    if stack.last() == Some(&TokenType::ExpansionCaseExpStart) {
                        stack.pop();
                        if stack.is_empty() {
                            return Some(tokens);
                        }
                    } else {
                        self.add_error(
                            "Invalid ICU message. Missing '}'.".to_string(),
                            start.source_span.clone(),
                        );
                        return None;
                    }
                }
                TokenType::ExpansionFormEnd => {
                    if stack.last() == Some(&TokenType::ExpansionFormStart) {
                        stack.pop();
                    } else {
                        self.add_error(
                            "Invalid ICU message. Missing '}'.".to_string(),
                            start.source_span.clone(),
                        );
                        return None;
                    }
                }
                TokenType::Eof => {
                    self.add_error(
                        "Invalid ICU message. Missing '}'.".to_string(),
                        start.source_span.clone(),
                    );
                    return None;
                }
                _ => {}
            }
            tokens.push(self.advance());
        }
    }
}
