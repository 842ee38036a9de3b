/**
 * Angular Expression Parser
 *
 * Recursive descent parser for binding expressions, event handlers,
 * interpolations and the `*directive` microsyntax. Problems are recorded as
 * [`ParserError`]s; the parser recovers by skipping to the next statement.
 */
use super::ast::*;
use super::lexer::{Lexer, Token};
use crate::chars;
use once_cell::sync::Lazy;
use regex::Regex;

static INTERPOLATION_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").expect("interpolation pattern is valid"));

const INTERPOLATION_START: &str = "{{";
const INTERPOLATION_END: &str = "}}";

/// Text and expression pieces of an interpolated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitInterpolation {
    pub strings: Vec<String>,
    pub expressions: Vec<String>,
    /// Offset of each expression within the input.
    pub offsets: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBindingParseResult {
    pub template_bindings: Vec<TemplateBinding>,
    pub warnings: Vec<String>,
    pub errors: Vec<ParserError>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            lexer: Lexer::new(),
        }
    }

    /// Parses an event handler; chains and assignments are allowed.
    pub fn parse_action(&self, input: &str, location: &str) -> ASTWithSource {
        let mut errors = Vec::new();
        check_no_interpolation(input, location, &mut errors);
        let source = strip_comments(input);
        let tokens = self.lexer.tokenize(source);
        let ast = ParseAST::new(input, location, tokens, source.len(), true, &mut errors, 0)
            .parse_chain();
        ASTWithSource::new(ast, input, location, errors)
    }

    /// Parses a property binding expression.
    pub fn parse_binding(&self, input: &str, location: &str) -> ASTWithSource {
        let mut errors = Vec::new();
        check_no_interpolation(input, location, &mut errors);
        let source = strip_comments(input);
        let tokens = self.lexer.tokenize(source);
        let ast = ParseAST::new(input, location, tokens, source.len(), false, &mut errors, 0)
            .parse_chain();
        ASTWithSource::new(ast, input, location, errors)
    }

    /// Parses text containing `{{ }}`; `None` when there is no interpolation.
    pub fn parse_interpolation(&self, input: &str, location: &str) -> Option<ASTWithSource> {
        let mut errors = Vec::new();
        let split = split_interpolation(input, location, &mut errors)?;

        let mut expressions = Vec::with_capacity(split.expressions.len());
        for (expression, offset) in split.expressions.iter().zip(&split.offsets) {
            let source = strip_comments(expression);
            let tokens = self.lexer.tokenize(source);
            let ast = ParseAST::new(input, location, tokens, source.len(), false, &mut errors, *offset)
                .parse_chain();
            expressions.push(ast);
        }

        let ast = AST::Interpolation(Interpolation {
            span: ParseSpan::new(0, input.len()),
            strings: split.strings,
            expressions,
        });
        Some(ASTWithSource::new(ast, input, location, errors))
    }

    /// Wraps a plain attribute value bound to a directive input.
    pub fn wrap_literal_primitive(&self, input: &str, location: &str) -> ASTWithSource {
        let ast = AST::LiteralPrimitive(LiteralPrimitive {
            span: ParseSpan::new(0, input.len()),
            value: LiteralValue::String(input.to_string()),
        });
        ASTWithSource::new(ast, input, location, Vec::new())
    }

    /// Parses `*tplKey="..."`, e.g. `let item of items; let i = index`.
    pub fn parse_template_bindings(
        &self,
        tpl_key: &str,
        input: &str,
        location: &str,
    ) -> TemplateBindingParseResult {
        let mut errors = Vec::new();
        let tokens = self.lexer.tokenize(input);
        let (template_bindings, warnings) =
            ParseAST::new(input, location, tokens, input.len(), false, &mut errors, 0)
                .parse_template_bindings(tpl_key);
        TemplateBindingParseResult {
            template_bindings,
            warnings,
            errors,
        }
    }
}

/// Splits `input` around `{{ }}`. Blank expressions are reported and
/// replaced by `$implicit`.
pub fn split_interpolation(
    input: &str,
    location: &str,
    errors: &mut Vec<ParserError>,
) -> Option<SplitInterpolation> {
    let parts = split_parts(input);
    if parts.len() <= 1 {
        return None;
    }

    let mut strings = Vec::new();
    let mut expressions = Vec::new();
    let mut offsets = Vec::new();
    let mut offset = 0;
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 0 {
            strings.push(part.to_string());
            offset += part.len();
        } else if !part.trim().is_empty() {
            offset += INTERPOLATION_START.len();
            expressions.push(part.to_string());
            offsets.push(offset);
            offset += part.len() + INTERPOLATION_END.len();
        } else {
            errors.push(ParserError::new(
                "Blank expressions are not allowed in interpolated strings",
                input,
                &format!("at column {} in", interpolation_error_column(&parts, i)),
                location,
            ));
            expressions.push("$implicit".to_string());
            offsets.push(offset);
        }
    }

    Some(SplitInterpolation {
        strings,
        expressions,
        offsets,
    })
}

/// Alternating text and expression parts, as a capturing split would return.
fn split_parts(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for captures in INTERPOLATION_REGEXP.captures_iter(input) {
        let (whole, inner) = match (captures.get(0), captures.get(1)) {
            (Some(whole), Some(inner)) => (whole, inner),
            _ => continue,
        };
        parts.push(&input[last..whole.start()]);
        parts.push(inner.as_str());
        last = whole.end();
    }
    parts.push(&input[last..]);
    parts
}

fn interpolation_error_column(parts: &[&str], part_in_err_idx: usize) -> usize {
    parts[..part_in_err_idx]
        .iter()
        .enumerate()
        .map(|(j, part)| {
            if j % 2 == 0 {
                part.len()
            } else {
                INTERPOLATION_START.len() + part.len() + INTERPOLATION_END.len()
            }
        })
        .sum()
}

fn check_no_interpolation(input: &str, location: &str, errors: &mut Vec<ParserError>) {
    let parts = split_parts(input);
    if parts.len() > 1 {
        errors.push(ParserError::new(
            &format!(
                "Got interpolation ({}{}) where expression was expected",
                INTERPOLATION_START, INTERPOLATION_END
            ),
            input,
            &format!("at column {} in", interpolation_error_column(&parts, 1)),
            location,
        ));
    }
}

/// Drops a trailing `//` comment that is not inside a string literal.
fn strip_comments(input: &str) -> &str {
    let mut outer_quote: Option<char> = None;
    let mut prev = chars::EOF;
    for (i, ch) in input.char_indices() {
        if ch == chars::SLASH && prev == chars::SLASH && outer_quote.is_none() {
            return &input[..i - 1];
        }
        if outer_quote == Some(ch) {
            outer_quote = None;
        } else if outer_quote.is_none() && chars::is_quote(ch) {
            outer_quote = Some(ch);
        }
        prev = ch;
    }
    input
}

struct ParseAST<'a> {
    input: &'a str,
    location: &'a str,
    tokens: Vec<Token>,
    input_length: usize,
    parse_action: bool,
    errors: &'a mut Vec<ParserError>,
    offset: usize,
    index: usize,
    rparens_expected: usize,
    rbraces_expected: usize,
    rbrackets_expected: usize,
}

impl<'a> ParseAST<'a> {
    fn new(
        input: &'a str,
        location: &'a str,
        tokens: Vec<Token>,
        input_length: usize,
        parse_action: bool,
        errors: &'a mut Vec<ParserError>,
        offset: usize,
    ) -> Self {
        ParseAST {
            input,
            location,
            tokens,
            input_length,
            parse_action,
            errors,
            offset,
            index: 0,
            rparens_expected: 0,
            rbraces_expected: 0,
            rbrackets_expected: 0,
        }
    }

    fn next(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next_text(&self) -> String {
        self.next().map(|t| t.to_string()).unwrap_or_default()
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn input_index(&self) -> usize {
        match self.next() {
            Some(token) => token.index + self.offset,
            None => self.input_length + self.offset,
        }
    }

    /// End of the last consumed token.
    fn last_end(&self) -> usize {
        match self.index.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.end + self.offset,
            None => self.offset,
        }
    }

    fn span(&self, start: usize) -> ParseSpan {
        ParseSpan::new(start, self.last_end().max(start))
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn optional_character(&mut self, code: char) -> bool {
        if self.next().map_or(false, |t| t.is_character(code)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.next().map_or(false, |t| t.is_keyword_of(keyword))
    }

    fn expect_character(&mut self, code: char) {
        if !self.optional_character(code) {
            self.error(&format!("Missing expected {}", code));
        }
    }

    fn optional_operator(&mut self, op: &str) -> bool {
        if self.next().map_or(false, |t| t.is_operator(op)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_identifier_or_keyword(&mut self) -> String {
        match self.next() {
            Some(token) if token.is_identifier() || token.is_keyword() => {
                let text = token.str_value.clone();
                self.advance();
                text
            }
            _ => {
                let text = self.next_text();
                self.error(&format!(
                    "Unexpected token {}, expected identifier or keyword",
                    text
                ));
                String::new()
            }
        }
    }

    fn expect_identifier_or_keyword_or_string(&mut self) -> String {
        match self.next() {
            Some(token) if token.is_identifier() || token.is_keyword() || token.is_string() => {
                let text = token.str_value.clone();
                self.advance();
                text
            }
            _ => {
                let text = self.next_text();
                self.error(&format!(
                    "Unexpected token {}, expected identifier, keyword, or string",
                    text
                ));
                String::new()
            }
        }
    }

    fn parse_chain(mut self) -> AST {
        let start = self.input_index();
        let mut exprs = Vec::new();
        while !self.at_end() {
            exprs.push(self.parse_pipe());
            if self.optional_character(chars::SEMICOLON) {
                if !self.parse_action {
                    self.error("Binding expression cannot contain chained expression");
                }
                while self.optional_character(chars::SEMICOLON) {}
            } else if !self.at_end() {
                let text = self.next_text();
                self.error(&format!("Unexpected token '{}'", text));
            }
        }
        match exprs.len() {
            0 => AST::empty(self.span(start)),
            1 => exprs.remove(0),
            _ => AST::Chain(Chain {
                span: self.span(start),
                expressions: exprs,
            }),
        }
    }

    fn parse_pipe(&mut self) -> AST {
        let mut result = self.parse_expression();
        if self.optional_operator("|") {
            if self.parse_action {
                self.error("Cannot have a pipe in an action expression");
            }
            loop {
                let name_start = self.input_index();
                let name = self.expect_identifier_or_keyword();
                let name_span = self.span(name_start);
                let mut args = Vec::new();
                while self.optional_character(chars::COLON) {
                    args.push(self.parse_expression());
                }
                let span = self.span(result.span().start);
                result = AST::BindingPipe(BindingPipe {
                    span,
                    name_span,
                    exp: Box::new(result),
                    name,
                    args,
                });
                if !self.optional_operator("|") {
                    break;
                }
            }
        }
        result
    }

    fn parse_expression(&mut self) -> AST {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> AST {
        let start = self.input_index();
        let result = self.parse_logical_or();
        if !self.optional_operator("?") {
            return result;
        }
        let yes = self.parse_pipe();
        let no = if self.optional_character(chars::COLON) {
            self.parse_pipe()
        } else {
            let end = self.input_index();
            let expression = self
                .input
                .get(start..end)
                .unwrap_or_default()
                .to_string();
            self.error(&format!(
                "Conditional expression {} requires all 3 expressions",
                expression
            ));
            AST::empty(self.span(start))
        };
        AST::Conditional(Conditional {
            span: self.span(start),
            condition: Box::new(result),
            true_exp: Box::new(yes),
            false_exp: Box::new(no),
        })
    }

    fn binary(&self, operation: &str, left: AST, right: AST) -> AST {
        AST::Binary(Binary {
            span: self.span(left.span().start),
            operation: operation.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Left-associative binary level over `operators`.
    fn parse_binary_level(
        &mut self,
        operators: &[&str],
        operand: fn(&mut Self) -> AST,
    ) -> AST {
        let mut result = operand(self);
        loop {
            let operator = match self.next() {
                Some(token) => operators.iter().find(|op| token.is_operator(op)).copied(),
                None => None,
            };
            match operator {
                Some(op) => {
                    self.advance();
                    let right = operand(self);
                    result = self.binary(op, result, right);
                }
                None => return result,
            }
        }
    }

    fn parse_logical_or(&mut self) -> AST {
        self.parse_binary_level(&["||"], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> AST {
        self.parse_binary_level(&["&&"], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> AST {
        self.parse_binary_level(&["==", "===", "!=", "!=="], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> AST {
        self.parse_binary_level(&["<", ">", "<=", ">="], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> AST {
        self.parse_binary_level(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> AST {
        self.parse_binary_level(&["*", "%", "/"], Self::parse_prefix)
    }

    fn parse_prefix(&mut self) -> AST {
        let start = self.input_index();
        let operator = match self.next() {
            Some(t) if t.is_operator("+") => "+",
            Some(t) if t.is_operator("-") => "-",
            Some(t) if t.is_operator("!") => "!",
            _ => return self.parse_call_chain(),
        };
        self.advance();
        let result = self.parse_prefix();
        let zero = AST::LiteralPrimitive(LiteralPrimitive {
            span: ParseSpan::new(start, start),
            value: LiteralValue::Number(0.0),
        });
        let span = self.span(start);
        match operator {
            "+" => AST::Binary(Binary {
                span,
                operation: "-".to_string(),
                left: Box::new(result),
                right: Box::new(zero),
            }),
            "-" => AST::Binary(Binary {
                span,
                operation: "-".to_string(),
                left: Box::new(zero),
                right: Box::new(result),
            }),
            _ => AST::PrefixNot(PrefixNot {
                span,
                expression: Box::new(result),
            }),
        }
    }

    fn parse_call_chain(&mut self) -> AST {
        let mut result = self.parse_primary();
        loop {
            if self.optional_character(chars::PERIOD) {
                result = self.parse_access_member_or_method_call(result, false);
            } else if self.optional_operator("?.") {
                result = self.parse_access_member_or_method_call(result, true);
            } else if self.optional_character(chars::LBRACKET) {
                self.rbrackets_expected += 1;
                let key = self.parse_pipe();
                self.rbrackets_expected -= 1;
                self.expect_character(chars::RBRACKET);
                let start = result.span().start;
                if self.optional_operator("=") {
                    let value = self.parse_conditional();
                    result = AST::KeyedWrite(KeyedWrite {
                        span: self.span(start),
                        receiver: Box::new(result),
                        key: Box::new(key),
                        value: Box::new(value),
                    });
                } else {
                    result = AST::KeyedRead(KeyedRead {
                        span: self.span(start),
                        receiver: Box::new(result),
                        key: Box::new(key),
                    });
                }
            } else if self.optional_character(chars::LPAREN) {
                self.rparens_expected += 1;
                let args = self.parse_call_arguments();
                self.rparens_expected -= 1;
                self.expect_character(chars::RPAREN);
                result = AST::FunctionCall(FunctionCall {
                    span: self.span(result.span().start),
                    target: Box::new(result),
                    args,
                });
            } else if self.optional_operator("!") {
                result = AST::NonNullAssert(NonNullAssert {
                    span: self.span(result.span().start),
                    expression: Box::new(result),
                });
            } else {
                return result;
            }
        }
    }

    fn parse_primary(&mut self) -> AST {
        let start = self.input_index();
        let token = match self.next() {
            Some(token) => token.clone(),
            None => {
                let message = format!("Unexpected end of expression: {}", self.input);
                self.error(&message);
                return AST::empty(self.span(start));
            }
        };

        if token.is_character(chars::LPAREN) {
            self.advance();
            self.rparens_expected += 1;
            let result = self.parse_pipe();
            self.rparens_expected -= 1;
            self.expect_character(chars::RPAREN);
            return result;
        }

        if token.is_keyword() {
            let value = match token.str_value.as_str() {
                "null" => Some(LiteralValue::Null),
                "undefined" => Some(LiteralValue::Undefined),
                "true" => Some(LiteralValue::Boolean(true)),
                "false" => Some(LiteralValue::Boolean(false)),
                "this" => None,
                _ => {
                    self.error(&format!("Unexpected token {}", token));
                    return AST::empty(self.span(start));
                }
            };
            self.advance();
            return match value {
                Some(value) => AST::LiteralPrimitive(LiteralPrimitive {
                    span: self.span(start),
                    value,
                }),
                None => AST::ImplicitReceiver(ImplicitReceiver {
                    span: self.span(start),
                }),
            };
        }

        if token.is_character(chars::LBRACKET) {
            self.advance();
            self.rbrackets_expected += 1;
            let expressions = self.parse_expression_list(chars::RBRACKET);
            self.rbrackets_expected -= 1;
            self.expect_character(chars::RBRACKET);
            return AST::LiteralArray(LiteralArray {
                span: self.span(start),
                expressions,
            });
        }

        if token.is_character(chars::LBRACE) {
            return self.parse_literal_map();
        }

        if token.is_identifier() {
            let receiver = AST::ImplicitReceiver(ImplicitReceiver {
                span: ParseSpan::new(start, start),
            });
            return self.parse_access_member_or_method_call(receiver, false);
        }

        if token.is_number() {
            self.advance();
            return AST::LiteralPrimitive(LiteralPrimitive {
                span: self.span(start),
                value: LiteralValue::Number(token.num_value),
            });
        }

        if token.is_string() {
            self.advance();
            return AST::LiteralPrimitive(LiteralPrimitive {
                span: self.span(start),
                value: LiteralValue::String(token.str_value),
            });
        }

        if token.is_error() {
            self.errors.push(ParserError::new(
                &token.str_value,
                self.input,
                &self.location_text(),
                self.location,
            ));
            self.advance();
            return AST::empty(self.span(start));
        }

        self.error(&format!("Unexpected token {}", token));
        AST::empty(self.span(start))
    }

    fn parse_expression_list(&mut self, terminator: char) -> Vec<AST> {
        let mut result = Vec::new();
        if !self.next().map_or(false, |t| t.is_character(terminator)) {
            loop {
                result.push(self.parse_pipe());
                if !self.optional_character(chars::COMMA) {
                    break;
                }
            }
        }
        result
    }

    fn parse_literal_map(&mut self) -> AST {
        let start = self.input_index();
        let mut keys = Vec::new();
        let mut values = Vec::new();
        self.expect_character(chars::LBRACE);
        if !self.optional_character(chars::RBRACE) {
            self.rbraces_expected += 1;
            loop {
                let quoted = self.next().map_or(false, |t| t.is_string());
                let key = self.expect_identifier_or_keyword_or_string();
                keys.push(LiteralMapKey { key, quoted });
                self.expect_character(chars::COLON);
                values.push(self.parse_pipe());
                if !self.optional_character(chars::COMMA) {
                    break;
                }
            }
            self.rbraces_expected -= 1;
            self.expect_character(chars::RBRACE);
        }
        AST::LiteralMap(LiteralMap {
            span: self.span(start),
            keys,
            values,
        })
    }

    fn parse_access_member_or_method_call(&mut self, receiver: AST, is_safe: bool) -> AST {
        let start = receiver.span().start;
        let name_start = self.input_index();
        let id = self.expect_identifier_or_keyword();
        let name_span = self.span(name_start);

        if self.optional_character(chars::LPAREN) {
            self.rparens_expected += 1;
            let args = self.parse_call_arguments();
            self.expect_character(chars::RPAREN);
            self.rparens_expected -= 1;
            let span = self.span(start);
            return if is_safe {
                AST::SafeMethodCall(SafeMethodCall {
                    span,
                    name_span,
                    receiver: Box::new(receiver),
                    name: id,
                    args,
                })
            } else {
                AST::MethodCall(MethodCall {
                    span,
                    name_span,
                    receiver: Box::new(receiver),
                    name: id,
                    args,
                })
            };
        }

        if is_safe {
            if self.optional_operator("=") {
                self.error("The '?.' operator cannot be used in the assignment");
                return AST::empty(self.span(start));
            }
            return AST::SafePropertyRead(SafePropertyRead {
                span: self.span(start),
                name_span,
                receiver: Box::new(receiver),
                name: id,
            });
        }

        if self.optional_operator("=") {
            if !self.parse_action {
                self.error("Bindings cannot contain assignments");
                return AST::empty(self.span(start));
            }
            let value = self.parse_conditional();
            return AST::PropertyWrite(PropertyWrite {
                span: self.span(start),
                name_span,
                receiver: Box::new(receiver),
                name: id,
                value: Box::new(value),
            });
        }

        AST::PropertyRead(PropertyRead {
            span: self.span(start),
            name_span,
            receiver: Box::new(receiver),
            name: id,
        })
    }

    fn parse_call_arguments(&mut self) -> Vec<AST> {
        if self.next().map_or(false, |t| t.is_character(chars::RPAREN)) {
            return Vec::new();
        }
        let mut positionals = Vec::new();
        loop {
            positionals.push(self.parse_pipe());
            if !self.optional_character(chars::COMMA) {
                break;
            }
        }
        positionals
    }

    /// Identifier, keyword or string, with `-` joined parts (`ng-for`).
    fn expect_template_binding_key(&mut self) -> String {
        let mut result = String::new();
        loop {
            result.push_str(&self.expect_identifier_or_keyword_or_string());
            if !self.optional_operator("-") {
                break;
            }
            result.push('-');
        }
        result
    }

    fn parse_template_bindings(mut self, tpl_key: &str) -> (Vec<TemplateBinding>, Vec<String>) {
        let mut bindings = Vec::new();
        let warnings = Vec::new();
        let mut first_binding = true;

        loop {
            let start = self.input_index();
            let mut key_is_var = false;
            let raw_key;
            let mut key;
            if first_binding {
                raw_key = tpl_key.to_string();
                key = tpl_key.to_string();
                first_binding = false;
            } else {
                key_is_var = self.peek_keyword("let");
                if key_is_var {
                    self.advance();
                }
                raw_key = self.expect_template_binding_key();
                key = if key_is_var {
                    raw_key.clone()
                } else {
                    format!("{}{}", tpl_key, capitalize(&raw_key))
                };
                self.optional_character(chars::COLON);
            }

            let mut name = None;
            let mut expression = None;
            if key_is_var {
                name = Some(if self.optional_operator("=") {
                    self.expect_template_binding_key()
                } else {
                    "$implicit".to_string()
                });
            } else if self.peek_keyword("as") {
                self.advance();
                name = Some(raw_key);
                key = self.expect_template_binding_key();
                key_is_var = true;
            } else if !self.at_end() && !self.peek_keyword("let") {
                let expr_start = self.input_index();
                let ast = self.parse_pipe();
                let source = self
                    .input
                    .get(expr_start..self.last_end().max(expr_start))
                    .unwrap_or_default()
                    .to_string();
                expression = Some(ASTWithSource::new(ast, &source, self.location, Vec::new()));
            }

            bindings.push(TemplateBinding {
                span: self.span(start),
                key: key.clone(),
                key_is_var,
                name,
                expression,
            });

            if self.peek_keyword("as") && !key_is_var {
                let let_start = self.input_index();
                self.advance();
                let let_name = self.expect_template_binding_key();
                bindings.push(TemplateBinding {
                    span: self.span(let_start),
                    key: let_name,
                    key_is_var: true,
                    name: Some(key),
                    expression: None,
                });
            }

            if !self.optional_character(chars::SEMICOLON) {
                self.optional_character(chars::COMMA);
            }
            if self.at_end() {
                break;
            }
        }

        (bindings, warnings)
    }

    fn location_text(&self) -> String {
        match self.next() {
            Some(token) => format!("at column {} in", token.index + 1),
            None => "at the end of the expression".to_string(),
        }
    }

    fn error(&mut self, message: &str) {
        let error = ParserError::new(message, self.input, &self.location_text(), self.location);
        self.errors.push(error);
        self.skip();
    }

    /// Skips to the next statement or to the closing delimiter the current
    /// construct expects. Lexer errors found on the way are recorded.
    fn skip(&mut self) {
        while let Some(token) = self.next() {
            if token.is_character(chars::SEMICOLON)
                || (self.rparens_expected > 0 && token.is_character(chars::RPAREN))
                || (self.rbraces_expected > 0 && token.is_character(chars::RBRACE))
                || (self.rbrackets_expected > 0 && token.is_character(chars::RBRACKET))
            {
                break;
            }
            if token.is_error() {
                let error = ParserError::new(
                    &token.str_value,
                    self.input,
                    &self.location_text(),
                    self.location,
                );
                self.errors.push(error);
            }
            self.advance();
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut rest = text.chars();
    match rest.next() {
        Some(first) => first.to_uppercase().chain(rest).collect(),
        None => String::new(),
    }
}
