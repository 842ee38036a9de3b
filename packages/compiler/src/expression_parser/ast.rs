/**
 * Angular Expression AST
 *
 * Spans are byte offsets relative to the parsed input string (the attribute
 * value or the interpolated text), not to the template.
 */
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseSpan {
    pub start: usize,
    pub end: usize,
}

impl ParseSpan {
    pub fn new(start: usize, end: usize) -> Self {
        ParseSpan { start, end }
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= self.start && position < self.end
    }
}

/// A problem found while lexing or parsing an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserError {
    pub message: String,
    pub input: String,
    pub err_location: String,
    pub ctx_location: String,
}

impl ParserError {
    pub fn new(message: &str, input: &str, err_location: &str, ctx_location: &str) -> Self {
        ParserError {
            message: format!(
                "Parser Error: {} {} [{}] in {}",
                message, err_location, input, ctx_location
            ),
            input: input.to_string(),
            err_location: err_location.to_string(),
            ctx_location: ctx_location.to_string(),
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AST {
    EmptyExpr(EmptyExpr),
    ImplicitReceiver(ImplicitReceiver),
    Chain(Chain),
    Conditional(Conditional),
    PropertyRead(PropertyRead),
    PropertyWrite(PropertyWrite),
    SafePropertyRead(SafePropertyRead),
    KeyedRead(KeyedRead),
    KeyedWrite(KeyedWrite),
    BindingPipe(BindingPipe),
    LiteralPrimitive(LiteralPrimitive),
    LiteralArray(LiteralArray),
    LiteralMap(LiteralMap),
    Interpolation(Interpolation),
    Binary(Binary),
    PrefixNot(PrefixNot),
    NonNullAssert(NonNullAssert),
    MethodCall(MethodCall),
    SafeMethodCall(SafeMethodCall),
    FunctionCall(FunctionCall),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyExpr {
    pub span: ParseSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImplicitReceiver {
    pub span: ParseSpan,
}

/// `a; b` in event handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub span: ParseSpan,
    pub expressions: Vec<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub span: ParseSpan,
    pub condition: Box<AST>,
    pub true_exp: Box<AST>,
    pub false_exp: Box<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRead {
    pub span: ParseSpan,
    pub name_span: ParseSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyWrite {
    pub span: ParseSpan,
    pub name_span: ParseSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub value: Box<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SafePropertyRead {
    pub span: ParseSpan,
    pub name_span: ParseSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRead {
    pub span: ParseSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyedWrite {
    pub span: ParseSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
    pub value: Box<AST>,
}

/// `value | name:arg1:arg2`
#[derive(Debug, Clone, PartialEq)]
pub struct BindingPipe {
    pub span: ParseSpan,
    pub name_span: ParseSpan,
    pub exp: Box<AST>,
    pub name: String,
    pub args: Vec<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralPrimitive {
    pub span: ParseSpan,
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralArray {
    pub span: ParseSpan,
    pub expressions: Vec<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMapKey {
    pub key: String,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMap {
    pub span: ParseSpan,
    pub keys: Vec<LiteralMapKey>,
    pub values: Vec<AST>,
}

/// Text with `{{ }}` holes; `strings` has one more entry than `expressions`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    pub span: ParseSpan,
    pub strings: Vec<String>,
    pub expressions: Vec<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub span: ParseSpan,
    pub operation: String,
    pub left: Box<AST>,
    pub right: Box<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixNot {
    pub span: ParseSpan,
    pub expression: Box<AST>,
}

/// `expr!`
#[derive(Debug, Clone, PartialEq)]
pub struct NonNullAssert {
    pub span: ParseSpan,
    pub expression: Box<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub span: ParseSpan,
    pub name_span: ParseSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub args: Vec<AST>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SafeMethodCall {
    pub span: ParseSpan,
    pub name_span: ParseSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub args: Vec<AST>,
}

/// Call of a computed target: `fns[0](a)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub span: ParseSpan,
    pub target: Box<AST>,
    pub args: Vec<AST>,
}

impl AST {
    pub fn empty(span: ParseSpan) -> Self {
        AST::EmptyExpr(EmptyExpr { span })
    }

    pub fn span(&self) -> ParseSpan {
        match self {
            AST::EmptyExpr(e) => e.span,
            AST::ImplicitReceiver(e) => e.span,
            AST::Chain(e) => e.span,
            AST::Conditional(e) => e.span,
            AST::PropertyRead(e) => e.span,
            AST::PropertyWrite(e) => e.span,
            AST::SafePropertyRead(e) => e.span,
            AST::KeyedRead(e) => e.span,
            AST::KeyedWrite(e) => e.span,
            AST::BindingPipe(e) => e.span,
            AST::LiteralPrimitive(e) => e.span,
            AST::LiteralArray(e) => e.span,
            AST::LiteralMap(e) => e.span,
            AST::Interpolation(e) => e.span,
            AST::Binary(e) => e.span,
            AST::PrefixNot(e) => e.span,
            AST::NonNullAssert(e) => e.span,
            AST::MethodCall(e) => e.span,
            AST::SafeMethodCall(e) => e.span,
            AST::FunctionCall(e) => e.span,
        }
    }

    pub fn is_implicit_receiver(&self) -> bool {
        matches!(self, AST::ImplicitReceiver(_))
    }

    /// Direct sub-expressions in source order.
    pub fn children(&self) -> Vec<&AST> {
        match self {
            AST::EmptyExpr(_) | AST::ImplicitReceiver(_) | AST::LiteralPrimitive(_) => Vec::new(),
            AST::Chain(e) => e.expressions.iter().collect(),
            AST::Conditional(e) => vec![&*e.condition, &*e.true_exp, &*e.false_exp],
            AST::PropertyRead(e) => vec![&*e.receiver],
            AST::PropertyWrite(e) => vec![&*e.receiver, &*e.value],
            AST::SafePropertyRead(e) => vec![&*e.receiver],
            AST::KeyedRead(e) => vec![&*e.receiver, &*e.key],
            AST::KeyedWrite(e) => vec![&*e.receiver, &*e.key, &*e.value],
            AST::BindingPipe(e) => std::iter::once(&*e.exp).chain(e.args.iter()).collect(),
            AST::LiteralArray(e) => e.expressions.iter().collect(),
            AST::LiteralMap(e) => e.values.iter().collect(),
            AST::Interpolation(e) => e.expressions.iter().collect(),
            AST::Binary(e) => vec![&*e.left, &*e.right],
            AST::PrefixNot(e) => vec![&*e.expression],
            AST::NonNullAssert(e) => vec![&*e.expression],
            AST::MethodCall(e) => std::iter::once(&*e.receiver).chain(e.args.iter()).collect(),
            AST::SafeMethodCall(e) => std::iter::once(&*e.receiver).chain(e.args.iter()).collect(),
            AST::FunctionCall(e) => std::iter::once(&*e.target).chain(e.args.iter()).collect(),
        }
    }
}

/// Walks an expression tree. Override `visit` to observe nodes and call
/// [`walk_ast`] to keep descending.
pub trait AstVisitor {
    fn visit(&mut self, ast: &AST) {
        walk_ast(self, ast);
    }
}

pub fn walk_ast<V: AstVisitor + ?Sized>(visitor: &mut V, ast: &AST) {
    for child in ast.children() {
        visitor.visit(child);
    }
}

/// A parsed expression together with its source text and any errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ASTWithSource {
    pub ast: AST,
    pub source: String,
    pub location: String,
    pub errors: Vec<ParserError>,
}

impl ASTWithSource {
    pub fn new(ast: AST, source: &str, location: &str, errors: Vec<ParserError>) -> Self {
        ASTWithSource {
            ast,
            source: source.to_string(),
            location: location.to_string(),
            errors,
        }
    }

    pub fn span(&self) -> ParseSpan {
        self.ast.span()
    }
}

/// One entry of the `*dir="..."` microsyntax.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBinding {
    pub span: ParseSpan,
    pub key: String,
    pub key_is_var: bool,
    pub name: Option<String>,
    pub expression: Option<ASTWithSource>,
}
